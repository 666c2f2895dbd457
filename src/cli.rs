// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use faasup::provider::tencent::Switch;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faasup")]
#[command(about = "Build, push and deploy container images to Tencent SCF and Aliyun Function Compute")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a faasup.yml template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Deploy a function to Tencent Cloud SCF
    DeployTencent {
        /// Region name, e.g. ap-guangzhou
        #[arg(long)]
        region: String,

        #[command(flatten)]
        deploy: DeployArgs,
    },

    /// Deploy a function to Aliyun Function Compute
    DeployAliyun {
        /// Function Compute service name
        #[arg(long)]
        service: String,

        #[command(flatten)]
        deploy: DeployArgs,
    },

    /// Build a docker image without pushing or deploying it
    Build {
        /// Docker image repository
        #[arg(long)]
        repository: String,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Configure CDN cache rules of a Tencent Cloud domain
    ConfigCdnCacheTencent {
        /// Region name
        #[arg(long)]
        region: String,

        /// Accelerated domain name
        #[arg(long)]
        domain: String,

        /// Turn rate limiting and usage capping on or off
        #[arg(long, value_name = "on|off")]
        usage_limit: Option<Switch>,
    },
}

/// Flags shared by every deploy command.
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Function name
    #[arg(long)]
    pub function: String,

    /// Docker image repository
    #[arg(long)]
    pub repository: String,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Deploy an existing build id (image tag) instead of building
    #[arg(long)]
    pub build_id: Option<String>,

    /// Dotenv file with the function's environment variables
    #[arg(long)]
    pub envfile: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Flags controlling the image build.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Dockerfile path
    #[arg(long)]
    pub dockerfile: Option<PathBuf>,

    /// Docker config directory
    #[arg(long)]
    pub docker_config: Option<PathBuf>,

    /// Docker build context
    #[arg(long)]
    pub build_path: Option<PathBuf>,

    /// Docker build --platform
    #[arg(long)]
    pub build_platform: Option<String>,

    /// Docker build --progress
    #[arg(long)]
    pub build_progress: Option<String>,

    /// Additional tag, name:version (repeatable)
    #[arg(long = "image-tag")]
    pub image_tags: Vec<String>,

    /// Docker build --build-arg KEY=VALUE (repeatable)
    #[arg(long = "build-arg")]
    pub build_args: Vec<String>,

    /// Bash or executable script to build the image instead of docker build
    #[arg(long)]
    pub build_script: Option<PathBuf>,
}
