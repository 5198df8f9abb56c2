use thiserror::Error;

/// Result type for bandit agent operations
pub type Result<T> = std::result::Result<T, BanditError>;

/// Main error type for the bandit agents
#[derive(Debug, Error)]
pub enum BanditError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action index outside the current action set
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Time step beyond the pre-allocated history
    #[error("Time step {time_step} is outside the horizon of {horizon} steps")]
    TimeStepOutOfRange {
        time_step: usize,
        horizon: usize,
    },

    /// Observation presented out of sequence
    #[error("Time step {time_step} is out of order: expected {expected}")]
    OutOfOrder {
        time_step: usize,
        expected: String,
    },

    /// The action set has no rows
    #[error("Action set is empty")]
    EmptyActionSet,

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl BanditError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        BanditError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        BanditError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
