use std::result::Result as StdResult;

use thiserror::Error;

/// Validation failures raised while building domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = StdResult<T, CoreError>;
