//! Recurring background jobs.

pub mod unban;
