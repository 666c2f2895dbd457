// ABOUTME: Scripted in-memory doubles for the deploy collaborators.
// ABOUTME: All doubles append to one shared call log so tests can assert ordering.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use faasup::build::{BuildError, BuildPlan, ImageTool};
use faasup::confirm::Confirm;
use faasup::function::{FunctionClient, FunctionInfo, FunctionStatus};
use faasup::provider::ApiError;
use faasup::registry::RegistryClient;
use faasup::types::{EnvVars, FunctionName, ImageRef};

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Build {
        image: String,
        build_args: Vec<(String, String)>,
    },
    Push(String),
    Digest(String),
    Confirm,
    GetFunction,
    UpdateCode {
        image: String,
        environment: Option<EnvVars>,
    },
    UpdateConfig(EnvVars),
    Publish,
    TagExists {
        repo_name: String,
        tag: String,
    },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Build { .. } => "build",
            Call::Push(_) => "push",
            Call::Digest(_) => "digest",
            Call::Confirm => "confirm",
            Call::GetFunction => "get_function",
            Call::UpdateCode { .. } => "update_code",
            Call::UpdateConfig(_) => "update_config",
            Call::Publish => "publish",
            Call::TagExists { .. } => "tag_exists",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::UpdateCode { .. } | Call::UpdateConfig(_) | Call::Publish
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().into_iter().filter(|n| *n == name).count()
    }
}

/// Pop the next scripted value, repeating the last one once the script runs out.
fn next_scripted<T: Clone>(script: &Mutex<VecDeque<T>>) -> T {
    let mut script = script.lock().unwrap();
    if script.len() > 1 {
        script.pop_front().unwrap()
    } else {
        script.front().cloned().expect("script must not be empty")
    }
}

fn remote_error(action: &str) -> ApiError {
    ApiError::Remote {
        action: action.to_string(),
        code: "InternalError".to_string(),
        message: "scripted failure".to_string(),
        request_id: None,
    }
}

/// Function control plane returning scripted statuses, one per read.
pub struct MockFunctions {
    log: CallLog,
    statuses: Mutex<VecDeque<FunctionStatus>>,
    fail_update_code: bool,
}

impl MockFunctions {
    pub fn new(log: &CallLog, statuses: impl IntoIterator<Item = FunctionStatus>) -> Self {
        Self {
            log: log.clone(),
            statuses: Mutex::new(statuses.into_iter().collect()),
            fail_update_code: false,
        }
    }

    pub fn always_active(log: &CallLog) -> Self {
        Self::new(log, [FunctionStatus::Active])
    }

    pub fn failing_update_code(mut self) -> Self {
        self.fail_update_code = true;
        self
    }
}

#[async_trait]
impl FunctionClient for MockFunctions {
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionInfo, ApiError> {
        self.log.record(Call::GetFunction);
        Ok(FunctionInfo {
            name: name.to_string(),
            status: next_scripted(&self.statuses),
            image: None,
            environment: EnvVars::new(),
        })
    }

    async fn update_code(
        &self,
        _name: &FunctionName,
        image: &ImageRef,
        environment: Option<&EnvVars>,
    ) -> Result<(), ApiError> {
        self.log.record(Call::UpdateCode {
            image: image.to_string(),
            environment: environment.cloned(),
        });
        if self.fail_update_code {
            return Err(remote_error("UpdateFunctionCode"));
        }
        Ok(())
    }

    async fn update_config(
        &self,
        _name: &FunctionName,
        environment: &EnvVars,
    ) -> Result<(), ApiError> {
        self.log.record(Call::UpdateConfig(environment.clone()));
        Ok(())
    }

    async fn publish(&self, _name: &FunctionName) -> Result<Option<String>, ApiError> {
        self.log.record(Call::Publish);
        Ok(Some("7".to_string()))
    }
}

/// Registry reporting a scripted sequence of tag lookups.
pub struct MockRegistry {
    log: CallLog,
    visible: Mutex<VecDeque<bool>>,
}

impl MockRegistry {
    pub fn new(log: &CallLog, visible: impl IntoIterator<Item = bool>) -> Self {
        Self {
            log: log.clone(),
            visible: Mutex::new(visible.into_iter().collect()),
        }
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    async fn tag_exists(&self, repo_name: &str, tag: &str) -> Result<bool, ApiError> {
        self.log.record(Call::TagExists {
            repo_name: repo_name.to_string(),
            tag: tag.to_string(),
        });
        Ok(next_scripted(&self.visible))
    }
}

/// Local image tooling that records plans instead of running docker.
pub struct MockImages {
    log: CallLog,
    revision: Option<String>,
    digest: Option<String>,
    fail_build: bool,
    plans: Mutex<Vec<BuildPlan>>,
}

impl MockImages {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            revision: Some("1a2b3c4d5e6f".to_string()),
            digest: Some("sha256:feedface".to_string()),
            fail_build: false,
            plans: Mutex::new(Vec::new()),
        }
    }

    pub fn without_revision(mut self) -> Self {
        self.revision = None;
        self
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn plans(&self) -> Vec<BuildPlan> {
        self.plans.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageTool for MockImages {
    async fn revision(&self) -> Option<String> {
        self.revision.clone()
    }

    async fn build(&self, plan: &BuildPlan) -> Result<(), BuildError> {
        self.log.record(Call::Build {
            image: plan.image.to_string(),
            build_args: plan.build_args.clone(),
        });
        self.plans.lock().unwrap().push(plan.clone());
        if self.fail_build {
            return Err(BuildError::Exit {
                command: "docker build".to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }

    async fn push(&self, image: &ImageRef) -> Result<(), BuildError> {
        self.log.record(Call::Push(image.to_string()));
        Ok(())
    }

    async fn digest(&self, image: &ImageRef) -> Result<String, BuildError> {
        self.log.record(Call::Digest(image.to_string()));
        self.digest.clone().ok_or_else(|| BuildError::MissingDigest {
            image: image.tagged(),
            output: String::new(),
        })
    }
}

/// Confirmation prompt with a fixed answer.
pub struct MockGate {
    log: CallLog,
    answer: bool,
}

impl MockGate {
    pub fn accepting(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            answer: true,
        }
    }

    pub fn declining(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            answer: false,
        }
    }
}

#[async_trait]
impl Confirm for MockGate {
    async fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        self.log.record(Call::Confirm);
        Ok(self.answer)
    }
}
