//! Error types for ratecard-core
//!
//! Only two kinds of failure exist in the calculation layer: a derived metric
//! whose precondition does not hold (`InvalidInput`), and scenario loading.
//! Zero denominators that occur during normal editing (no revenue yet, no
//! churn, no investment) are guarded in the functions themselves and never
//! surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ratecard operations
#[derive(Error, Debug)]
pub enum CalcError {
    // ===================
    // Calculation Errors
    // ===================
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unknown plan: {id}")]
    UnknownPlan { id: String },

    // ===================
    // Scenario Errors
    // ===================
    #[error("Failed to read scenario file: {path}")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario in {path}: {message}")]
    ScenarioParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },
}

impl CalcError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// True for precondition failures the caller should render as
    /// "not achievable" instead of an error message
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. })
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = CalcError::invalid_input("contribution margin must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input: contribution margin must be positive"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_unknown_plan_is_not_invalid_input() {
        let err = CalcError::UnknownPlan {
            id: "enterprise".to_string(),
        };
        assert!(!err.is_invalid_input());
        assert_eq!(err.to_string(), "Unknown plan: enterprise");
    }
}
