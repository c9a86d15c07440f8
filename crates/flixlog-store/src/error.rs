use thiserror::Error;

/// Errors produced by the journal store and its persistence backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller input was rejected before any persistence I/O took place.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced show or annotation is not in the current collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// SQLite error from the database backend.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or supplied JSON could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Any other backend failure (lock poisoning, injected faults, ...).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn show_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "Show",
            id: id.to_string(),
        }
    }

    pub fn annotation_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "Annotation",
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unwrap the outcome of a best-effort operation: a failure is logged and
/// swallowed, never propagated to the caller.
pub(crate) fn best_effort<T>(operation: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "best-effort operation failed, continuing");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = StoreError::show_not_found("abc");
        assert_eq!(err.to_string(), "Show not found: abc");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn best_effort_swallows_errors() {
        let failed: Result<u32> = Err(StoreError::Backend("down".into()));
        assert_eq!(best_effort("lookup", failed), None);
        assert_eq!(best_effort("lookup", Ok(3)), Some(3));
    }
}
