use thiserror::Error;

/// Errors raised while classifying or rendering a sample set.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Unequal number of values (reference: {reference}) (prediction: {prediction})")]
    LengthMismatch { reference: usize, prediction: usize },

    #[error("No samples supplied (reference: 0) (prediction: 0)")]
    EmptyInput,

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Failed to export chart: {0}")]
    Export(String),
}

impl GridError {
    /// Input-shape errors abort before any counting or drawing happens.
    pub fn is_input_shape(&self) -> bool {
        matches!(self, GridError::LengthMismatch { .. } | GridError::EmptyInput)
    }
}

/// Rejected style configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Invalid color '{0}' (expected a named color or #rrggbb)")]
    InvalidColor(String),

    #[error("Invalid {axis} limits: ({low}, {high})")]
    InvalidLimits {
        axis: &'static str,
        low: f64,
        high: f64,
    },

    #[error("{field} must be within [0, 1], found {value}")]
    OpacityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be positive and finite, found {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Failed to parse style: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        StyleError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for StyleError {
    fn from(err: serde_yaml::Error) -> Self {
        StyleError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
