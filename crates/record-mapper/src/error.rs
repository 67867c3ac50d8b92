//! Error types for the mapping core.

use thiserror::Error;

/// Main error type for metadata resolution, statement synthesis, and
/// interceptor execution.
#[derive(Error, Debug)]
pub enum MapperError {
    /// Static declaration defect (missing table binding, empty key set,
    /// invalid identifier, unbound mapper, bad config). Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid per-call input (absent record or condition, empty selective
    /// field set).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator invocation failed (decryption service, actor
    /// supplier). Propagated unmodified; the core does not retry.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// IO error (config file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error (config parsing).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MapperError {
    /// Create a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        MapperError::Configuration(message.into())
    }

    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        MapperError::Validation(message.into())
    }

    /// Create a Collaborator error.
    pub fn collaborator(message: impl Into<String>) -> Self {
        MapperError::Collaborator(message.into())
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(
            MapperError::configuration("x"),
            MapperError::Configuration(_)
        ));
        assert!(matches!(
            MapperError::validation("x"),
            MapperError::Validation(_)
        ));
        assert!(matches!(
            MapperError::collaborator("x"),
            MapperError::Collaborator(_)
        ));
    }

    #[test]
    fn test_display_includes_message() {
        let err = MapperError::configuration("no table binding for Order");
        assert_eq!(
            err.to_string(),
            "Configuration error: no table binding for Order"
        );
    }
}
