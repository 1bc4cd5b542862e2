//! Error types for the connectogram library.
//!
//! Data-quality problems in node lists are not errors by themselves (see
//! [`crate::validation`]); they only become a [`ConnectogramError`] when a
//! caller asks for strict validation.

use thiserror::Error;

use crate::validation::Diagnostic;

#[derive(Error, Debug)]
pub enum ConnectogramError {
    /// Strict validation rejected the input
    #[error("Validation failed with {} error(s): {}", .0.len(), summarize(.0))]
    Validation(Vec<Diagnostic>),

    /// Connectivity matrix cannot be turned into nodes
    #[error("Invalid connectivity matrix: {0}")]
    InvalidMatrix(String),

    /// Input file has an unsupported shape or content
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Plan file is inconsistent
    #[error("Invalid plan: {0}")]
    Plan(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConnectogramError {
    /// Check if the error was caused by the supplied data
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConnectogramError::Validation(_)
                | ConnectogramError::InvalidMatrix(_)
                | ConnectogramError::InvalidInput(_)
                | ConnectogramError::Plan(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectogramError::Validation(_) => "VALIDATION_FAILED",
            ConnectogramError::InvalidMatrix(_) | ConnectogramError::InvalidInput(_) => {
                "INVALID_INPUT"
            }
            ConnectogramError::Plan(_) => "INVALID_PLAN",
            ConnectogramError::Io(_) => "IO_ERROR",
            ConnectogramError::Json(_)
            | ConnectogramError::Yaml(_)
            | ConnectogramError::Csv(_) => "PARSE_ERROR",
        }
    }
}

/// Result type alias for connectogram operations
pub type ConnectogramResult<T> = Result<T, ConnectogramError>;
