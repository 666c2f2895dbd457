// ABOUTME: Container repository addresses without a tag.
// ABOUTME: Derives the registry repo name and the Aliyun region from the address.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository cannot be empty")]
    Empty,

    #[error("repository must not contain whitespace: {0:?}")]
    Whitespace(String),

    #[error("repository must not carry a tag or digest: {0}")]
    Tagged(String),

    #[error("invalid repository name {0}: expected at least <namespace>/<name>")]
    MissingNamespace(String),

    #[error("no region in repository {0}")]
    MissingRegion(String),
}

/// A repository such as `ccr.ccs.tencentyun.com/space/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository(String);

impl Repository {
    pub fn parse(input: &str) -> Result<Self, RepositoryError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RepositoryError::Empty);
        }

        if input.chars().any(char::is_whitespace) {
            return Err(RepositoryError::Whitespace(input.to_string()));
        }

        // A colon is only allowed in the host part (registry port)
        let last_segment = input.rsplit('/').next().unwrap_or(input);
        if input.contains('@') || last_segment.contains(':') {
            return Err(RepositoryError::Tagged(input.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `<namespace>/<name>` pair the registry API addresses.
    pub fn repo_name(&self) -> Result<String, RepositoryError> {
        extract_repo_name(&self.0)
    }

    /// Region embedded in an Aliyun registry host.
    ///
    /// `registry.cn-zhangjiakou.aliyuncs.com/space/name` yields `cn-zhangjiakou`.
    pub fn aliyun_region(&self) -> Result<&str, RepositoryError> {
        let parts: Vec<&str> = self.0.splitn(3, '.').collect();
        match parts.as_slice() {
            [_, region, _] if !region.is_empty() => Ok(*region),
            _ => Err(RepositoryError::MissingRegion(self.0.clone())),
        }
    }
}

/// Keep the last two slash separated segments of `repository`.
pub fn extract_repo_name(repository: &str) -> Result<String, RepositoryError> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.len() < 2 {
        return Err(RepositoryError::MissingNamespace(repository.to_string()));
    }

    let tail = &parts[parts.len() - 2..];
    Ok(format!("{}/{}", tail[0], tail[1]))
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
