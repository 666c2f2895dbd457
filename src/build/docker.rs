// ABOUTME: ImageTool backed by the docker CLI and git.
// ABOUTME: Build and push inherit the terminal so users see tool output live.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::{BuildError, BuildPlan, ImageTool};
use crate::types::ImageRef;

/// Runs `docker` (optionally with `--config`) and `git` as child processes.
#[derive(Debug, Clone, Default)]
pub struct DockerCli {
    config_dir: Option<PathBuf>,
}

impl DockerCli {
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        Self { config_dir }
    }

    fn docker(&self) -> Command {
        let mut command = Command::new("docker");
        if let Some(ref dir) = self.config_dir {
            command.arg("--config").arg(dir);
        }
        command
    }

    fn script(path: &Path) -> Command {
        // Plain shell scripts need not be executable
        if path.extension().is_some_and(|ext| ext == "sh") {
            let mut command = Command::new("bash");
            command.arg(path);
            command
        } else {
            Command::new(path)
        }
    }
}

/// Run `command` with inherited stdio, mapping a non-zero exit to an error.
async fn run_inherited(mut command: Command, description: &str) -> Result<(), BuildError> {
    tracing::debug!("Running {description}");

    let status = command.status().await.map_err(|source| BuildError::Spawn {
        program: description.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(BuildError::Exit {
            command: description.to_string(),
            code: status.code(),
        })
    }
}

/// Extract the digest from `repo@sha256:...` as printed by `docker image inspect`.
fn parse_digest(output: &str) -> Option<&str> {
    output
        .trim()
        .split_once('@')
        .map(|(_, digest)| digest)
        .filter(|digest| !digest.is_empty())
}

#[async_trait]
impl ImageTool for DockerCli {
    async fn revision(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "HEAD"])
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
                (!revision.is_empty()).then_some(revision)
            }
            Ok(output) => {
                tracing::debug!(
                    "git rev-parse failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(e) => {
                tracing::debug!("git not available: {e}");
                None
            }
        }
    }

    async fn build(&self, plan: &BuildPlan) -> Result<(), BuildError> {
        match plan.script {
            Some(ref script) => {
                tracing::info!("Build with script {}", script.display());
                let mut command = Self::script(script);
                command.envs(plan.script_env());
                run_inherited(command, &format!("build script {}", script.display())).await
            }
            None => {
                let mut command = self.docker();
                command.args(plan.docker_args());
                run_inherited(command, "docker build").await
            }
        }
    }

    async fn push(&self, image: &ImageRef) -> Result<(), BuildError> {
        let mut command = self.docker();
        command.arg("push").arg(image.tagged());
        run_inherited(command, "docker push").await
    }

    async fn digest(&self, image: &ImageRef) -> Result<String, BuildError> {
        let output = self
            .docker()
            .args(["image", "inspect", &image.tagged()])
            .args(["--format", "{{index .RepoDigests 0}}"])
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                program: "docker image inspect".to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            return Err(BuildError::MissingDigest {
                image: image.tagged(),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_digest(&stdout)
            .map(str::to_string)
            .ok_or_else(|| BuildError::MissingDigest {
                image: image.tagged(),
                output: stdout.trim().to_string(),
            })
    }
}
