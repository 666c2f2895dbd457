// ABOUTME: Remote function control plane abstraction and lifecycle waiting.
// ABOUTME: Status is re-read after every mutation because providers apply changes asynchronously.

mod status;

pub use status::FunctionStatus;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::poll::{PollError, Probe, Ticker};
use crate::provider::ApiError;
use crate::types::{EnvVars, FunctionName, ImageRef};

/// Descriptor of a deployed function as reported by its provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub status: FunctionStatus,
    /// Image the function currently runs, when the provider reports one.
    pub image: Option<String>,
    pub environment: EnvVars,
}

/// Operations the deploy orchestrator needs from a provider.
#[async_trait]
pub trait FunctionClient: Send + Sync {
    /// Read the current descriptor, including lifecycle status.
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionInfo, ApiError>;

    /// Point the function at a new image. Providers that accept environment
    /// variables in the same call receive them in `environment`.
    async fn update_code(
        &self,
        name: &FunctionName,
        image: &ImageRef,
        environment: Option<&EnvVars>,
    ) -> Result<(), ApiError>;

    /// Replace the function's environment variables.
    async fn update_config(&self, name: &FunctionName, environment: &EnvVars)
    -> Result<(), ApiError>;

    /// Promote the current code to a new version, returning its identifier.
    async fn publish(&self, name: &FunctionName) -> Result<Option<String>, ApiError>;
}

/// Errors from waiting on a function to become Active.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("function not active after {}s, status={last}", waited.as_secs())]
    Timeout {
        last: FunctionStatus,
        waited: Duration,
    },

    #[error("function failed, status={status}")]
    Failed { status: FunctionStatus },

    #[error("wait for function was cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Poll `name` until it is Active.
///
/// Returns immediately on Active or on any failed state. A failed state never
/// waits out the remaining time.
pub async fn wait_active<F: FunctionClient + ?Sized>(
    client: &F,
    name: &FunctionName,
    ticker: &Ticker,
) -> Result<FunctionInfo, WaitError> {
    ticker
        .poll("function active", move || async move {
            let info = client.get_function(name).await.map_err(WaitError::Api)?;
            if info.status.is_active() {
                Ok(Probe::Ready(info))
            } else if info.status.is_failed() {
                Err(WaitError::Failed {
                    status: info.status,
                })
            } else {
                Ok(Probe::Pending(info.status))
            }
        })
        .await
        .map_err(|e| match e {
            PollError::TimedOut { last, waited } => WaitError::Timeout { last, waited },
            PollError::Cancelled => WaitError::Cancelled,
            PollError::Probe(e) => e,
        })
}
