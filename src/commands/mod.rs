// ABOUTME: Command module aggregator for the faasup CLI.
// ABOUTME: Re-exports deploy, build and CDN command handlers.

mod build;
mod cdn;
mod deploy;

pub use build::build;
pub use cdn::config_cdn_cache;
pub use deploy::{deploy_aliyun, deploy_tencent};

use faasup::build::BuildSpec;
use faasup::config::{BuildDefaults, expand_home};
use faasup::diagnostics::Diagnostics;
use faasup::output::Output;
use std::path::PathBuf;

use crate::cli::BuildArgs;

/// Merge command-line build flags over the project file defaults.
///
/// Build args from both sources are passed through; later entries win inside
/// docker, so flags override the file.
pub(crate) fn build_spec(args: &BuildArgs, defaults: &BuildDefaults) -> BuildSpec {
    let fallback = BuildSpec::default();

    let mut build_args = defaults.build_args.clone();
    build_args.extend(args.build_args.iter().cloned());

    let extra_tags = if args.image_tags.is_empty() {
        defaults.image_tags.clone()
    } else {
        args.image_tags.clone()
    };

    BuildSpec {
        dockerfile: pick_path(&args.dockerfile, &defaults.dockerfile).unwrap_or(fallback.dockerfile),
        context: pick_path(&args.build_path, &defaults.build_path).unwrap_or(fallback.context),
        build_args,
        script: pick_path(&args.build_script, &defaults.build_script),
        platform: args.build_platform.clone().or_else(|| defaults.platform.clone()),
        progress: args.build_progress.clone().or_else(|| defaults.progress.clone()),
        extra_tags,
    }
}

/// Docker config directory from flags or the project file, `~` expanded.
pub(crate) fn docker_config(args: &BuildArgs, defaults: &BuildDefaults) -> Option<PathBuf> {
    pick_path(&args.docker_config, &defaults.docker_config)
}

fn pick_path(flag: &Option<PathBuf>, default: &Option<PathBuf>) -> Option<PathBuf> {
    flag.as_ref()
        .or(default.as_ref())
        .map(|path| expand_home(path))
}

/// Surface collected warnings once the command is done.
pub(crate) fn emit_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(&warning.to_string());
    }
}
