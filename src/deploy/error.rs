// ABOUTME: Error types for deployment operations.
// ABOUTME: Every variant names the step it came from; declining the prompt is not an error.

use std::fmt;
use std::time::Duration;

use crate::build::BuildError;
use crate::function::{FunctionStatus, WaitError};
use crate::provider::ApiError;
use crate::registry::ReadinessError;

/// Deploy steps, used as error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Build,
    Push,
    Confirm,
    Precondition,
    ImageReady,
    UpdateCode,
    UpdateConfig,
    Publish,
    Finish,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Build => "build",
            Step::Push => "push",
            Step::Confirm => "confirm",
            Step::Precondition => "status check",
            Step::ImageReady => "image readiness",
            Step::UpdateCode => "code update",
            Step::UpdateConfig => "config update",
            Step::Publish => "publish",
            Step::Finish => "final read",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Missing collaborator, malformed repository and similar setup faults.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("build failed: {0}")]
    Build(#[source] BuildError),

    #[error("push failed: {0}")]
    Push(#[source] BuildError),

    #[error("confirmation prompt failed: {0}")]
    Confirmation(#[source] std::io::Error),

    /// Function was not Active before the first mutation.
    #[error("function {function} is not active, status={status}")]
    Precondition {
        function: String,
        status: FunctionStatus,
    },

    #[error("{step}: function not active after {}s, status={status}", waited.as_secs())]
    TransitionTimeout {
        step: Step,
        status: FunctionStatus,
        waited: Duration,
    },

    #[error("{step}: function failed, status={status}")]
    TransitionFailed { step: Step, status: FunctionStatus },

    #[error("image {image} not ready after {}s", waited.as_secs())]
    ImageNotReady { image: String, waited: Duration },

    #[error("{step}: {source}")]
    Api {
        step: Step,
        #[source]
        source: ApiError,
    },

    #[error("{step}: cancelled")]
    Cancelled { step: Step },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Setup or input fault, nothing was attempted remotely.
    Configuration,
    /// Local build or push tooling failed.
    Tooling,
    /// Function in the wrong state.
    FunctionState,
    /// A bounded wait ran out.
    Timeout,
    /// The provider API rejected or failed a call.
    Remote,
    /// The run was aborted.
    Cancelled,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Configuration(_) => DeployErrorKind::Configuration,
            DeployError::Build(_) | DeployError::Push(_) | DeployError::Confirmation(_) => {
                DeployErrorKind::Tooling
            }
            DeployError::Precondition { .. } | DeployError::TransitionFailed { .. } => {
                DeployErrorKind::FunctionState
            }
            DeployError::TransitionTimeout { .. } | DeployError::ImageNotReady { .. } => {
                DeployErrorKind::Timeout
            }
            DeployError::Api { .. } => DeployErrorKind::Remote,
            DeployError::Cancelled { .. } => DeployErrorKind::Cancelled,
        }
    }

    /// Step that failed, when known.
    pub fn step(&self) -> Option<Step> {
        match self {
            DeployError::Build(_) => Some(Step::Build),
            DeployError::Push(_) => Some(Step::Push),
            DeployError::Confirmation(_) => Some(Step::Confirm),
            DeployError::Precondition { .. } => Some(Step::Precondition),
            DeployError::ImageNotReady { .. } => Some(Step::ImageReady),
            DeployError::TransitionTimeout { step, .. }
            | DeployError::TransitionFailed { step, .. }
            | DeployError::Api { step, .. }
            | DeployError::Cancelled { step } => Some(*step),
            DeployError::Configuration(_) => None,
        }
    }

    pub(crate) fn api(step: Step) -> impl FnOnce(ApiError) -> DeployError {
        move |source| DeployError::Api { step, source }
    }

    pub(crate) fn from_wait(step: Step, err: WaitError) -> DeployError {
        match err {
            WaitError::Timeout { last, waited } => DeployError::TransitionTimeout {
                step,
                status: last,
                waited,
            },
            WaitError::Failed { status } => DeployError::TransitionFailed { step, status },
            WaitError::Cancelled => DeployError::Cancelled { step },
            WaitError::Api(source) => DeployError::Api { step, source },
        }
    }
}

impl From<ReadinessError> for DeployError {
    fn from(err: ReadinessError) -> Self {
        match err {
            ReadinessError::InvalidRepository(e) => DeployError::Configuration(e.to_string()),
            ReadinessError::NotReady { image, waited } => {
                DeployError::ImageNotReady { image, waited }
            }
            ReadinessError::Cancelled => DeployError::Cancelled {
                step: Step::ImageReady,
            },
            ReadinessError::Api(source) => DeployError::Api {
                step: Step::ImageReady,
                source,
            },
        }
    }
}
