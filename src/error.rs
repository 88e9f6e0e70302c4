//! Error types for the lineal crate

use thiserror::Error;

/// Result type alias for lineal operations
pub type Result<T> = std::result::Result<T, LinealError>;

/// Main error type for the lineal crate
#[derive(Error, Debug)]
pub enum LinealError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LinealError {
    fn from(err: serde_json::Error) -> Self {
        LinealError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LinealError::ValidationError("training set is empty".to_string());
        assert_eq!(err.to_string(), "Validation error: training set is empty");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LinealError = io_err.into();
        assert!(matches!(err, LinealError::IoError(_)));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = LinealError::InvalidParameter {
            name: "cost".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter: cost = 0, must be positive"
        );
    }
}
