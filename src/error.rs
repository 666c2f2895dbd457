// ABOUTME: Application-wide error types for faasup.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::build::BuildError;
use crate::deploy::DeployError;
use crate::provider::ApiError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("credentials not found: {0}")]
    MissingCredentials(String),

    #[error("invalid credentials file {path}: {reason}")]
    InvalidCredentials { path: PathBuf, reason: String },

    #[error("failed to read env file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
