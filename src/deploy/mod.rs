// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct and the Deployer entry point.

mod capabilities;
mod deployment;
mod error;
mod orchestrator;
mod state;
mod transitions;

pub use capabilities::Capabilities;
pub use deployment::{DeployOutcome, DeployReport, Deployment, DeploymentRequest};
pub use error::{DeployError, DeployErrorKind, Step};
pub use orchestrator::Deployer;
pub use state::{
    Checked, CodeUpdated, Configured, Confirmed, ImageReady, Published, Pushed, Resolved,
};
pub use transitions::Gate;
