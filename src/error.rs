//! Top-level error handling.
//!
//! Workflow composition has its own structured error types under
//! [`crate::workflow::error`]; this module wraps them together with
//! the file and serialization failures the crate surface can hit.

use crate::workflow::error::WorkflowError;
use thiserror::Error;

/// Main error type for qsmflow operations.
#[derive(Error, Debug)]
pub enum QsmFlowError {
    /// Errors loading or saving run configurations
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors composing or validating a workflow graph
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Errors serializing a graph description
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for qsmflow operations.
pub type Result<T> = std::result::Result<T, QsmFlowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::error::ConfigurationError;

    #[test]
    fn test_error_display() {
        let err = QsmFlowError::Config("missing file".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing file");
    }

    #[test]
    fn test_workflow_error_wraps() {
        let err: QsmFlowError =
            WorkflowError::Configuration(ConfigurationError::InversionNotSelected).into();
        assert!(err.to_string().contains("no inversion algorithm selected"));
    }
}
