//! Storage error types for bounty-storage.
//!
//! [`StorageError`] covers every failure the record store can report. None of
//! these are "not found": absence is expressed with `Option` or an empty
//! result so callers decide what a missing row means.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An underlying SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// An identifier did not match the store's key format (UUID).
    #[error("malformed program id: {0:?}")]
    MalformedId(String),

    /// A persisted row could not be decoded.
    #[error("invalid persisted data: {reason}")]
    InvalidData { reason: String },

    /// A referential integrity rule was violated.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },

    /// The in-memory backend's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}
