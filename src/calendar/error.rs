//! Error types for event storage and mutation.

use thiserror::Error;

use super::event::EventId;

/// Failure at the storage boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored events are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[cfg(test)]
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Corrupt data degrades to an empty collection instead of blocking writes.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt(_))
    }
}

/// Errors surfaced by repository operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CalendarError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CalendarError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for repository operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
