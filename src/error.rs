//! Error types for hillsim.
//!
//! A finished run never fails: it always ends in a `GroundState`. Errors only
//! come from setting a run up (parameters, hills, scenario files) and from the
//! expression compiler.

use thiserror::Error;

use crate::expression::ExprError;

/// Result type alias for hillsim operations.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// A numeric parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// The hill cannot be evaluated for the given parameters.
    #[error("invalid hill: {0}")]
    InvalidHill(String),

    /// Scenario configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Expression(#[from] ExprError),

    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    #[must_use]
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
