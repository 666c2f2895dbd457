// ABOUTME: Build command implementation.
// ABOUTME: Builds and tags an image locally without pushing it.

use faasup::build::{self as image_build, DockerCli};
use faasup::config::Config;
use faasup::diagnostics::Diagnostics;
use faasup::error::{Error, Result};
use faasup::output::Output;
use faasup::types::Repository;

use super::{build_spec, docker_config, emit_warnings};
use crate::cli::BuildArgs;

pub async fn build(
    repository: String,
    args: BuildArgs,
    config: &Config,
    mut output: Output,
) -> Result<()> {
    let repository = Repository::parse(&repository)
        .map_err(|e| Error::InvalidArgument(format!("--repository: {e}")))?;
    let spec = build_spec(&args, &config.build);
    let docker = DockerCli::new(docker_config(&args, &config.build));
    let mut diag = Diagnostics::default();

    output.start_timer();
    output.progress(&format!("Building {repository}"));

    let result = image_build::build(&docker, &repository, &spec, &mut diag).await;
    emit_warnings(&diag, &output);
    let result = result?;

    output.result("Build", &result);
    output.success(&format!("Built {}", result.image));
    Ok(())
}
