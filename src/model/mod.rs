//! Domain models for members, strikes and guild snapshots.
//!
//! These types are independent of Serenity so the member store and the services
//! that drive it can be exercised without a Discord connection.

pub mod guild;
pub mod member;
pub mod strike;
