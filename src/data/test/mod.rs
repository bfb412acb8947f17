use chrono::{NaiveDate, NaiveDateTime};

use crate::config::RoleConfig;

mod member_store;

/// Builds a UTC timestamp for test fixtures.
pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

/// Role configuration shared by the store tests.
pub(crate) fn test_roles() -> RoleConfig {
    RoleConfig {
        member: 100,
        guest: 200,
        committee: 300,
        strikes: [401, 402, 403],
    }
}
