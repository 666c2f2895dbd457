// ABOUTME: Build pipeline turning a Dockerfile and context into a tagged image.
// ABOUTME: Generates the build id, injects build args and delegates to an ImageTool.

mod docker;
mod error;

pub use docker::DockerCli;
pub use error::BuildError;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, Warning};
use crate::types::{BuildId, ImageRef, Repository};

/// Platform images are built for unless overridden.
pub const DEFAULT_PLATFORM: &str = "linux/amd64";

pub const COMMIT_ID_ARG: &str = "FAASUP_COMMIT_ID";
pub const BUILD_ID_ARG: &str = "FAASUP_BUILD_ID";

/// Local container tooling: build, push and inspect images.
#[async_trait]
pub trait ImageTool: Send + Sync {
    /// Current source-control revision, if one can be determined.
    async fn revision(&self) -> Option<String>;

    /// Build the image described by `plan`, streaming output to the terminal.
    async fn build(&self, plan: &BuildPlan) -> Result<(), BuildError>;

    /// Push `image` (by tag) to its registry.
    async fn push(&self, image: &ImageRef) -> Result<(), BuildError>;

    /// Registry digest of a pushed image, e.g. `sha256:...`.
    async fn digest(&self, image: &ImageRef) -> Result<String, BuildError>;
}

/// What the user asked to build.
#[derive(Debug, Clone)]
pub struct BuildSpec {
    pub dockerfile: PathBuf,
    pub context: PathBuf,
    /// Raw `KEY=VALUE` strings; entries without `=` are ignored.
    pub build_args: Vec<String>,
    /// Script run instead of `docker build`.
    pub script: Option<PathBuf>,
    pub platform: Option<String>,
    pub progress: Option<String>,
    /// Additional `name:tag` references applied to the image.
    pub extra_tags: Vec<String>,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            dockerfile: PathBuf::from("Dockerfile"),
            context: PathBuf::from("."),
            build_args: Vec::new(),
            script: None,
            platform: None,
            progress: None,
            extra_tags: Vec::new(),
        }
    }
}

/// A fully resolved build invocation.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub dockerfile: PathBuf,
    pub context: PathBuf,
    pub image: ImageRef,
    pub extra_tags: Vec<String>,
    pub build_args: Vec<(String, String)>,
    pub platform: String,
    pub progress: Option<String>,
    pub script: Option<PathBuf>,
}

impl BuildPlan {
    /// Arguments for `docker build`.
    pub fn docker_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--platform".to_string(),
            self.platform.clone(),
            "-f".to_string(),
            self.dockerfile.display().to_string(),
            "-t".to_string(),
            self.image.to_string(),
        ];

        for tag in &self.extra_tags {
            args.push("-t".to_string());
            args.push(tag.clone());
        }

        if let Some(ref progress) = self.progress {
            args.push("--progress".to_string());
            args.push(progress.clone());
        }

        for (key, value) in &self.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{key}={value}"));
        }

        args.push(self.context.display().to_string());
        args
    }

    /// Environment handed to a build script.
    pub fn script_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(
            "FAASUP_DOCKERFILE".to_string(),
            self.dockerfile.display().to_string(),
        );
        env.insert(
            "FAASUP_BUILD_PATH".to_string(),
            self.context.display().to_string(),
        );
        env.insert("FAASUP_IMAGE".to_string(), self.image.to_string());
        env.insert("FAASUP_BUILD_PLATFORM".to_string(), self.platform.clone());
        env.insert(
            "FAASUP_BUILD_ARGS".to_string(),
            self.build_args
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if let Some(ref progress) = self.progress {
            env.insert("FAASUP_BUILD_PROGRESS".to_string(), progress.clone());
        }
        if !self.extra_tags.is_empty() {
            env.insert("FAASUP_IMAGE_TAGS".to_string(), self.extra_tags.join("\n"));
        }
        for (key, value) in &self.build_args {
            if key == COMMIT_ID_ARG || key == BUILD_ID_ARG {
                env.insert(key.clone(), value.clone());
            }
        }
        env
    }
}

/// Output of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub build_id: BuildId,
    /// Empty when no revision was available.
    pub commit_id: String,
    pub image: ImageRef,
}

/// Split `KEY=VALUE` strings, silently dropping entries without `=`.
pub fn parse_build_args(raw: &[String]) -> Vec<(String, String)> {
    raw.iter()
        .filter_map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => Some((key.to_string(), value.to_string())),
            _ => {
                tracing::debug!("Ignoring malformed build arg {entry:?}");
                None
            }
        })
        .collect()
}

/// Build a new image for `repository`.
///
/// The build id is derived from the current revision when available, otherwise
/// from random bytes with a recorded warning.
pub async fn build<T: ImageTool + ?Sized>(
    tool: &T,
    repository: &Repository,
    spec: &BuildSpec,
    diag: &mut Diagnostics,
) -> Result<BuildResult, BuildError> {
    let revision = tool.revision().await;
    let (build_id, random_suffix) = BuildId::generate(Utc::now(), revision.as_deref());
    if random_suffix {
        diag.warn(Warning::missing_revision(
            "no source-control revision available, using a random build id suffix",
        ));
    }

    let commit_id = revision.unwrap_or_default();
    let image = ImageRef::new(repository.clone(), build_id.clone());

    let mut build_args = vec![
        (COMMIT_ID_ARG.to_string(), commit_id.clone()),
        (BUILD_ID_ARG.to_string(), build_id.to_string()),
    ];
    build_args.extend(parse_build_args(&spec.build_args));

    tracing::info!("COMMIT_ID={commit_id}");
    tracing::info!("BUILD_ID={build_id}");
    tracing::info!("IMAGE={image}");

    let plan = BuildPlan {
        dockerfile: spec.dockerfile.clone(),
        context: spec.context.clone(),
        image: image.clone(),
        extra_tags: spec.extra_tags.clone(),
        build_args,
        platform: spec
            .platform
            .clone()
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        progress: spec.progress.clone(),
        script: spec.script.clone(),
    };

    tool.build(&plan).await?;

    Ok(BuildResult {
        build_id,
        commit_id,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> BuildPlan {
        BuildPlan {
            dockerfile: PathBuf::from("Dockerfile"),
            context: PathBuf::from("."),
            image: ImageRef::new(
                Repository::parse("ccr.ccs.tencentyun.com/space/app").unwrap(),
                BuildId::parse("20240131-093005-1a2b3c").unwrap(),
            ),
            extra_tags: vec!["app:latest".to_string()],
            build_args: vec![
                (COMMIT_ID_ARG.to_string(), "1a2b3c4d".to_string()),
                ("MODE".to_string(), "prod".to_string()),
            ],
            platform: DEFAULT_PLATFORM.to_string(),
            progress: Some("plain".to_string()),
            script: None,
        }
    }

    #[test]
    fn parse_build_args_skips_malformed_entries() {
        let raw = vec![
            "A=1".to_string(),
            "broken".to_string(),
            "B=x=y".to_string(),
            "=nokey".to_string(),
            "C=".to_string(),
        ];
        assert_eq!(
            parse_build_args(&raw),
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "x=y".to_string()),
                ("C".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn docker_args_layout() {
        let args = plan().docker_args();
        assert_eq!(
            args,
            vec![
                "build",
                "--platform",
                "linux/amd64",
                "-f",
                "Dockerfile",
                "-t",
                "ccr.ccs.tencentyun.com/space/app:20240131-093005-1a2b3c",
                "-t",
                "app:latest",
                "--progress",
                "plain",
                "--build-arg",
                "FAASUP_COMMIT_ID=1a2b3c4d",
                "--build-arg",
                "MODE=prod",
                ".",
            ]
        );
    }

    #[test]
    fn script_env_exposes_plan() {
        let env = plan().script_env();
        assert_eq!(
            env.get("FAASUP_IMAGE").map(String::as_str),
            Some("ccr.ccs.tencentyun.com/space/app:20240131-093005-1a2b3c")
        );
        assert_eq!(
            env.get("FAASUP_BUILD_ARGS").map(String::as_str),
            Some("FAASUP_COMMIT_ID=1a2b3c4d\nMODE=prod")
        );
        assert_eq!(
            env.get(COMMIT_ID_ARG).map(String::as_str),
            Some("1a2b3c4d")
        );
        assert!(!env.contains_key(BUILD_ID_ARG));
    }
}
