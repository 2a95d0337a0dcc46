// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the trip engine.

use thiserror::Error;

use crate::remote::RemoteError;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the repository.
///
/// Remote mirror failures never show up here; they are logged and dropped by
/// the sync coordinator. `Remote` is only produced by an explicit pull.
#[derive(Debug, Error)]
pub enum Error {
    /// Local storage failure (disk full, corruption, constraint violation)
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking writer
    #[error("Local store lock poisoned")]
    LockPoisoned,

    /// Record rejected before it reached storage
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Transaction written against a trip that does not exist locally
    #[error("Trip '{0}' does not exist")]
    UnknownTrip(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking storage task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),
}

impl Error {
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
