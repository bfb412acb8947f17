use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the member store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file could not be read, written or replaced.
    ///
    /// Fatal to the mutation in progress; the in-memory table is rolled back to the
    /// last state that reached disk.
    #[error("Failed to access member store {path}: {source}")]
    Persistence {
        /// Path of the file that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed on the store file.
    #[error("Failed to encode member store {path}: {source}")]
    Codec {
        /// Path of the file that failed
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// No record exists for the member.
    #[error("Member {0} is not in the member store")]
    NotFound(u64),

    /// A strike was issued without a reason.
    #[error("A strike for member {0} needs a reason")]
    MissingReason(u64),

    /// A ban expiry was set on a member whose strike level does not carry a ban.
    #[error("Member {member_id} has {strike_count} strike(s) and cannot carry that ban")]
    InvalidBanExpiry {
        /// Member the expiry was aimed at
        member_id: u64,
        /// The member's current strike count
        strike_count: u8,
    },
}

/// A persisted row that could not be decoded into a member record.
///
/// Malformed rows are skipped during load and never surface as a `StoreError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("invalid member id '{0}'")]
    InvalidId(String),

    #[error("invalid membership status '{0}'")]
    InvalidStatus(String),

    #[error("invalid strike count '{0}'")]
    InvalidStrikeCount(String),

    #[error("invalid ban expiry '{0}'")]
    InvalidBanExpiry(String),

    #[error("row is not valid UTF-8 CSV: {0}")]
    Unreadable(String),
}
