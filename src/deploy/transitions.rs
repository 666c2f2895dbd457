// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::build::{self, BuildSpec, ImageTool};
use crate::confirm::Confirm;
use crate::diagnostics::{Diagnostics, Warning};
use crate::function::{FunctionClient, FunctionStatus, wait_active};
use crate::poll::Ticker;
use crate::registry::{RegistryClient, wait_image_ready};
use crate::types::ImageRef;

use super::error::{DeployError, Step};
use super::state::{
    CodeUpdated, Checked, Configured, Confirmed, ImageReady, Published, Pushed, Resolved,
};
use super::{DeployReport, Deployment, DeploymentRequest};

/// Outcome of the confirmation prompt.
#[derive(Debug)]
pub enum Gate {
    Proceed(Deployment<Confirmed>),
    Declined,
}

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            capabilities: self.capabilities,
            image: self.image,
            submitted: self.submitted,
            build: self.build,
            state,
        }
    }
}

// =============================================================================
// Request -> Resolved
// =============================================================================

impl Deployment<Resolved> {
    /// Fix the image reference for this run.
    ///
    /// A preset build id is used as-is; otherwise a new image is built and its
    /// generated build id becomes the tag.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Build` if the build command fails.
    #[must_use = "deployment state must be used"]
    pub async fn resolve<T: ImageTool + ?Sized>(
        request: DeploymentRequest,
        tool: &T,
        spec: &BuildSpec,
        diag: &mut Diagnostics,
    ) -> Result<Deployment<Resolved>, DeployError> {
        let (image, build) = match request.build_id {
            Some(ref build_id) => {
                tracing::info!("Use existing BUILD_ID={build_id}");
                (ImageRef::new(request.repository.clone(), build_id.clone()), None)
            }
            None => {
                let result = build::build(tool, &request.repository, spec, diag)
                    .await
                    .map_err(DeployError::Build)?;
                (result.image.clone(), Some(result))
            }
        };

        Ok(Deployment {
            capabilities: request.provider.capabilities(),
            request,
            submitted: image.clone(),
            image,
            build,
            state: Resolved,
        })
    }

    /// Push the tagged image, then pin its digest if the provider wants one.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Push` if the push fails or no digest is available.
    #[must_use = "deployment state must be used"]
    pub async fn push<T: ImageTool + ?Sized>(
        mut self,
        tool: &T,
    ) -> Result<Deployment<Pushed>, DeployError> {
        tracing::info!("Push image {}", self.image.tagged());
        tool.push(&self.image).await.map_err(DeployError::Push)?;

        if self.capabilities.pin_digest {
            let digest = tool.digest(&self.image).await.map_err(DeployError::Push)?;
            self.submitted = self.image.with_digest(digest);
            tracing::info!("Image digest {}", self.submitted);
        }

        Ok(self.transition(Pushed))
    }
}

// =============================================================================
// Pushed -> Confirmed
// =============================================================================

impl Deployment<Pushed> {
    /// Ask the operator once, unless the request is pre-confirmed.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Confirmation` if the prompt cannot be read.
    #[must_use = "gate outcome must be used"]
    pub async fn confirm<G: Confirm + ?Sized>(self, gate: &G) -> Result<Gate, DeployError> {
        if self.request.auto_confirm {
            return Ok(Gate::Proceed(self.transition(Confirmed)));
        }

        tracing::info!(
            "Function={} Image={}",
            self.request.function,
            self.submitted
        );
        let accepted = gate
            .confirm("Confirm Deploy")
            .await
            .map_err(DeployError::Confirmation)?;

        if accepted {
            Ok(Gate::Proceed(self.transition(Confirmed)))
        } else {
            Ok(Gate::Declined)
        }
    }
}

// =============================================================================
// Confirmed -> Checked
// =============================================================================

impl Deployment<Confirmed> {
    /// Read the function once and refuse to continue unless it is Active.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Precondition` without waiting if the function is
    /// in any other state.
    #[must_use = "deployment state must be used"]
    pub async fn check_active<F: FunctionClient + ?Sized>(
        self,
        client: &F,
    ) -> Result<Deployment<Checked>, DeployError> {
        let info = client
            .get_function(&self.request.function)
            .await
            .map_err(DeployError::api(Step::Precondition))?;

        tracing::info!("Function={} Status={}", info.name, info.status);

        if !info.status.is_active() {
            return Err(DeployError::Precondition {
                function: self.request.function.to_string(),
                status: info.status,
            });
        }

        Ok(self.transition(Checked))
    }
}

// =============================================================================
// Checked -> ImageReady
// =============================================================================

impl Deployment<Checked> {
    /// Wait for the pushed tag to become visible in the registry.
    ///
    /// Providers without registry lag skip this step.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ImageNotReady` if the tag never appears.
    #[must_use = "deployment state must be used"]
    pub async fn ensure_image_ready<R: RegistryClient + ?Sized>(
        self,
        registry: Option<&R>,
        ticker: &Ticker,
    ) -> Result<Deployment<ImageReady>, DeployError> {
        if !self.capabilities.registry_readiness {
            return Ok(self.transition(ImageReady));
        }

        let registry = registry.ok_or_else(|| {
            DeployError::Configuration(format!(
                "{} deploys require a registry client",
                self.request.provider
            ))
        })?;

        wait_image_ready(
            registry,
            self.image.repository(),
            self.image.tag().as_str(),
            ticker,
        )
        .await?;
        tracing::info!("Docker image {} ready", self.image.tagged());

        Ok(self.transition(ImageReady))
    }
}

// =============================================================================
// ImageReady -> CodeUpdated
// =============================================================================

impl Deployment<ImageReady> {
    /// Submit the new image and wait for the function to settle.
    ///
    /// Providers that apply environment variables with the code receive them
    /// here.
    ///
    /// # Errors
    ///
    /// Returns a transition error if the function fails or does not settle in
    /// time.
    #[must_use = "deployment state must be used"]
    pub async fn update_code<F: FunctionClient + ?Sized>(
        self,
        client: &F,
        ticker: &Ticker,
    ) -> Result<Deployment<CodeUpdated>, DeployError> {
        let bundled = if self.capabilities.separate_config_update {
            None
        } else {
            self.request.environment.as_ref()
        };

        tracing::info!(
            "Update function code Image={} UpdateEnvironmentVariables={}",
            self.submitted,
            bundled.is_some()
        );
        client
            .update_code(&self.request.function, &self.submitted, bundled)
            .await
            .map_err(DeployError::api(Step::UpdateCode))?;

        wait_active(client, &self.request.function, ticker)
            .await
            .map_err(|e| DeployError::from_wait(Step::UpdateCode, e))?;

        Ok(self.transition(CodeUpdated))
    }
}

// =============================================================================
// CodeUpdated -> Configured
// =============================================================================

impl Deployment<CodeUpdated> {
    /// Apply environment variables with a separate call when the provider
    /// needs one and variables were supplied.
    ///
    /// # Errors
    ///
    /// Returns a transition error if the function fails or does not settle in
    /// time.
    #[must_use = "deployment state must be used"]
    pub async fn update_config<F: FunctionClient + ?Sized>(
        self,
        client: &F,
        ticker: &Ticker,
    ) -> Result<Deployment<Configured>, DeployError> {
        let environment = match self.request.environment.clone() {
            Some(env) if self.capabilities.separate_config_update => env,
            _ => return Ok(self.transition(Configured)),
        };

        tracing::info!(
            "Update function configuration with {} environment variables",
            environment.len()
        );
        client
            .update_config(&self.request.function, &environment)
            .await
            .map_err(DeployError::api(Step::UpdateConfig))?;

        wait_active(client, &self.request.function, ticker)
            .await
            .map_err(|e| DeployError::from_wait(Step::UpdateConfig, e))?;

        Ok(self.transition(Configured))
    }
}

// =============================================================================
// Configured -> Published
// =============================================================================

impl Deployment<Configured> {
    /// Promote the new code when the provider requires an explicit publish.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Api` if the publish call fails.
    #[must_use = "deployment state must be used"]
    pub async fn publish<F: FunctionClient + ?Sized>(
        self,
        client: &F,
    ) -> Result<Deployment<Published>, DeployError> {
        if !self.capabilities.explicit_publish {
            return Ok(self.transition(Published::default()));
        }

        tracing::info!("Publish function version");
        let version = client
            .publish(&self.request.function)
            .await
            .map_err(DeployError::api(Step::Publish))?;

        if let Some(ref version) = version {
            tracing::info!("Published version {version}");
        }

        Ok(self.transition(Published { version }))
    }
}

// =============================================================================
// Published -> DeployReport
// =============================================================================

impl Deployment<Published> {
    /// Read the final function descriptor.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Api` if the read fails.
    pub async fn finish<F: FunctionClient + ?Sized>(
        self,
        client: &F,
        diag: &mut Diagnostics,
    ) -> Result<DeployReport, DeployError> {
        let function = client
            .get_function(&self.request.function)
            .await
            .map_err(DeployError::api(Step::Finish))?;

        if matches!(function.status, FunctionStatus::Other(_)) {
            diag.warn(Warning::unrecognized_status(format!(
                "function {} reported unrecognized status {}",
                function.name, function.status
            )));
        }

        Ok(DeployReport {
            image: self.image,
            build: self.build,
            version: self.state.version,
            function,
        })
    }
}
