// ABOUTME: Function name validation shared by both providers.
// ABOUTME: Accepts the intersection-friendly charset of SCF and Function Compute.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FunctionNameError {
    #[error("function name cannot be empty")]
    Empty,

    #[error("function name exceeds maximum length of 128 characters")]
    TooLong,

    #[error("function name must start with a letter or underscore")]
    InvalidStart,

    #[error("invalid character in function name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn new(value: &str) -> Result<Self, FunctionNameError> {
        let first = value.chars().next().ok_or(FunctionNameError::Empty)?;

        if value.len() > 128 {
            return Err(FunctionNameError::TooLong);
        }

        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(FunctionNameError::InvalidStart);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                return Err(FunctionNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
