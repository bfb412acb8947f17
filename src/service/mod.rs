//! Moderation and membership services.
//!
//! Services combine the member store with the moderation actions collaborator. Each
//! operation takes the store lock, performs one store mutation (which persists before
//! returning), releases the lock and only then carries out the Discord side effects.
//! A failed write therefore never leaves a ban or role change on Discord that the store
//! does not know about.

pub mod actions;
pub mod discord;
pub mod member;
pub mod strike;

#[cfg(test)]
pub(crate) mod test;
