//! Error types
//!
//! Failures that originate from a transform are never represented here: they
//! are delivered to listeners as data. `HubError` only covers what the hub
//! itself can report to a producer or to the log.

/// Error type for hub operations
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The hub has already completed, failed or been force-closed
    #[error("hub is closed")]
    Closed,

    /// A fallback delivery thread could not be started
    #[error("failed to spawn delivery thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result alias for hub operations
pub type Result<T> = std::result::Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(HubError::Closed.to_string(), "hub is closed");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = HubError::from(io);
        assert!(matches!(err, HubError::Spawn(_)));
        assert_eq!(
            err.to_string(),
            "failed to spawn delivery thread: no threads left"
        );
    }
}
