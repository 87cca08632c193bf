//! Error types shared by the simulation core and the pattern loader.

use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Most operations are total: out-of-bounds edits are ignored and an undo
/// with nothing to undo is a no-op. Only pattern ingestion and configuration
/// can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifeError {
    /// RLE text did not carry a usable header or its body does not fit.
    #[error("malformed pattern: {reason}")]
    MalformedPattern { reason: String },

    /// A configuration value was rejected at construction time.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl LifeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        LifeError::MalformedPattern {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        LifeError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;
