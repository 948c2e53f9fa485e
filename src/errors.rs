use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::InstanceId;

/// Unified error type for the domain, aggregation and storage layers.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Obligation not found: {0}")]
    ObligationNotFound(InstanceId),
    #[error("{kind} not found: {id}")]
    EntityNotFound { kind: &'static str, id: String },
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

/// User-facing shell error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_storage_errors() {
        let err: BudgetError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, BudgetError::StorageError(ref message) if message.contains("disk full")));
    }

    #[test]
    fn entity_not_found_names_the_kind() {
        let err = BudgetError::EntityNotFound {
            kind: "Household",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "Household not found: abc");
    }
}
