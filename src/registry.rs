// ABOUTME: Registry readiness polling for freshly pushed image tags.
// ABOUTME: Tolerates registry propagation lag before a function is pointed at the tag.

use async_trait::async_trait;
use std::time::Duration;

use crate::poll::{PollError, Probe, Ticker};
use crate::provider::ApiError;
use crate::types::{Repository, RepositoryError};

/// Tag lookups against a remote image registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Whether `tag` is queryable in `repo_name` (`<namespace>/<name>`).
    async fn tag_exists(&self, repo_name: &str, tag: &str) -> Result<bool, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error(transparent)]
    InvalidRepository(#[from] RepositoryError),

    #[error("docker image {image} not ready after {}s", waited.as_secs())]
    NotReady { image: String, waited: Duration },

    #[error("wait for docker image was cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Poll the registry until `repository:tag` exists.
///
/// A repository without a namespace fails before any query is made.
pub async fn wait_image_ready<R: RegistryClient + ?Sized>(
    client: &R,
    repository: &Repository,
    tag: &str,
    ticker: &Ticker,
) -> Result<(), ReadinessError> {
    let repo_name = repository.repo_name()?;
    let repo_name = repo_name.as_str();

    ticker
        .poll("docker image ready", move || async move {
            match client.tag_exists(repo_name, tag).await {
                Ok(true) => Ok(Probe::Ready(())),
                Ok(false) => Ok(Probe::Pending("missing")),
                Err(e) => Err(ReadinessError::Api(e)),
            }
        })
        .await
        .map_err(|e| match e {
            PollError::TimedOut { waited, .. } => ReadinessError::NotReady {
                image: format!("{repository}:{tag}"),
                waited,
            },
            PollError::Cancelled => ReadinessError::Cancelled,
            PollError::Probe(e) => e,
        })
}
