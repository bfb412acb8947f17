//! Persistence layer for member records.
//!
//! The member store is a single CSV file rewritten in full on every committed change.
//! `codec` handles the file format and `member_store` owns the in-memory table and
//! the rules for mutating it.

pub mod codec;
pub mod member_store;

#[cfg(test)]
pub(crate) mod test;
