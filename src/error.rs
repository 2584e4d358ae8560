use thiserror::Error;

/// Main error type for the Rusty Range crate.
/// Aggregates errors from the store collaborator and the internal modules.
#[derive(Error, Debug)]
pub enum RustyRangeError {
    #[error("{0}")]
    WithContextError(String),

    // Construction errors
    #[error("Sheet '{name}' not found")]
    SheetNotFound { name: String },

    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),

    // Query and codec errors
    #[error("Invalid col name(s) found: {}", .0.join(","))]
    InvalidColumns(Vec<String>),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Operator '{operator}' expects {expected}")]
    OperandMismatch {
        operator: &'static str,
        expected: &'static str,
    },

    // Store collaborator errors
    #[error("{0}")]
    StoreError(#[from] anyhow::Error),

    // Database module errors
    #[error("{0}")]
    RangeError(#[from] crate::database::range::RangeError),
}

pub type Result<T> = std::result::Result<T, RustyRangeError>;

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyRangeError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_columns_lists_every_name() {
        let error = RustyRangeError::InvalidColumns(vec!["bogus1".to_owned(), "bogus2".to_owned()]);
        assert_eq!(error.to_string(), "Invalid col name(s) found: bogus1,bogus2");
    }

    #[test]
    fn with_prefix_keeps_original_message() {
        let result: Result<()> = Err(RustyRangeError::UnknownOperator("like".to_owned()));
        let error = result.with_prefix("Failed to query 'Sheet1'").unwrap_err();
        assert_eq!(error.to_string(), "Failed to query 'Sheet1': Unknown operator 'like'");
    }
}
