//! SocietyBot Test Utils
//!
//! Provides shared testing utilities for the bot. This crate offers a builder for
//! creating test contexts that own a temporary directory with a member store file,
//! and factories for Serenity objects.
//!
//! # Overview
//!
//! The test utilities consist of these components:
//! - **TestBuilder**: Fluent builder for seeding a member store file
//! - **TestContext**: Test environment owning the temporary directory
//! - **TestError**: Error types that can occur during test setup
//! - **serenity**: Factories for Serenity `User` and `Member` objects
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[test]
//! fn loads_members() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_row("1,Alice,member,0,,,,,")
//!         .build()?;
//!
//!     let (store, _) = MemberStore::load(test.store_path()).unwrap();
//!     // Perform store operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod serenity;
