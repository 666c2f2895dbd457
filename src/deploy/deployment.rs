// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: The tagged image is chosen once and carried unchanged through every state.

use serde::Serialize;

use crate::build::BuildResult;
use crate::function::FunctionInfo;
use crate::provider::Provider;
use crate::types::{BuildId, EnvVars, FunctionName, ImageRef, Repository};

use super::Capabilities;

/// Everything one deploy invocation needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub provider: Provider,
    pub region: String,
    pub function: FunctionName,
    pub repository: Repository,
    /// Deploy an existing image instead of building one.
    pub build_id: Option<BuildId>,
    /// `None` leaves the remote environment untouched; `Some(empty)` clears it.
    pub environment: Option<EnvVars>,
    pub auto_confirm: bool,
}

/// Final state of a successful deploy.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    /// `repository:buildId`.
    pub image: ImageRef,
    /// Present when this run built the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub function: FunctionInfo,
}

/// Result of a deploy that did not fail.
#[derive(Debug, Clone)]
pub enum DeployOutcome {
    Deployed(Box<DeployReport>),
    /// Operator declined at the prompt. No remote mutation happened.
    Canceled,
}

/// A deployment in progress, parameterized by its current state.
///
/// `image` is the `repository:buildId` reference used for push and readiness.
/// `submitted` is what the code update sends; it differs only by an appended
/// digest on providers that pin one.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) capabilities: Capabilities,
    pub(crate) image: ImageRef,
    pub(crate) submitted: ImageRef,
    pub(crate) build: Option<BuildResult>,
    pub(crate) state: S,
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Tagged image reference, `repository:buildId`.
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Reference submitted with the code update.
    pub fn submitted_image(&self) -> &ImageRef {
        &self.submitted
    }

    pub fn function(&self) -> &FunctionName {
        &self.request.function
    }

    /// Build output, when this run built the image.
    pub fn build(&self) -> Option<&BuildResult> {
        self.build.as_ref()
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}
