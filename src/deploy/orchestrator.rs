// ABOUTME: Deploy orchestrator composing build, push, gate and remote mutations.
// ABOUTME: Runs the typestate transitions in order and fails fast on the first error.

use tokio_util::sync::CancellationToken;

use crate::build::{BuildSpec, ImageTool};
use crate::config::Timeouts;
use crate::confirm::Confirm;
use crate::diagnostics::Diagnostics;
use crate::function::FunctionClient;
use crate::poll::Ticker;
use crate::registry::RegistryClient;

use super::error::DeployError;
use super::state::Resolved;
use super::transitions::Gate;
use super::{DeployOutcome, Deployment, DeploymentRequest};

/// Collaborators for one deployment run.
pub struct Deployer<'a> {
    images: &'a dyn ImageTool,
    functions: &'a dyn FunctionClient,
    registry: Option<&'a dyn RegistryClient>,
    gate: &'a dyn Confirm,
    timeouts: Timeouts,
    cancel: Option<CancellationToken>,
}

impl<'a> Deployer<'a> {
    pub fn new(
        images: &'a dyn ImageTool,
        functions: &'a dyn FunctionClient,
        gate: &'a dyn Confirm,
    ) -> Self {
        Self {
            images,
            functions,
            registry: None,
            gate,
            timeouts: Timeouts::default(),
            cancel: None,
        }
    }

    /// Registry used for readiness polling on providers that need it.
    pub fn with_registry(mut self, registry: &'a dyn RegistryClient) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Abort any in-progress wait when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn ticker(&self, timeout: std::time::Duration) -> Ticker {
        Ticker::new(timeout).with_cancellation(self.cancel.clone())
    }

    /// Run one deployment to completion.
    ///
    /// Declining the prompt returns `DeployOutcome::Canceled` before any
    /// remote mutation.
    pub async fn deploy(
        &self,
        request: DeploymentRequest,
        spec: &BuildSpec,
        diag: &mut Diagnostics,
    ) -> Result<DeployOutcome, DeployError> {
        tracing::info!(
            provider = %request.provider,
            region = %request.region,
            function = %request.function,
            "Deploy"
        );

        let image_ticker = self.ticker(self.timeouts.image_ready);
        let function_ticker = self.ticker(self.timeouts.function_active);

        let deployment = Deployment::<Resolved>::resolve(request, self.images, spec, diag).await?;
        let deployment = deployment.push(self.images).await?;

        let deployment = match deployment.confirm(self.gate).await? {
            Gate::Proceed(deployment) => deployment,
            Gate::Declined => {
                tracing::info!("Deploy canceled");
                return Ok(DeployOutcome::Canceled);
            }
        };

        let report = deployment
            .check_active(self.functions)
            .await?
            .ensure_image_ready(self.registry, &image_ticker)
            .await?
            .update_code(self.functions, &function_ticker)
            .await?
            .update_config(self.functions, &function_ticker)
            .await?
            .publish(self.functions)
            .await?
            .finish(self.functions, diag)
            .await?;

        tracing::info!("Deploy succeeded, status={}", report.function.status);
        Ok(DeployOutcome::Deployed(Box::new(report)))
    }
}
