// ABOUTME: Entry point for the faasup CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use faasup::config::{self, Config};
use faasup::error::Result;
use faasup::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG; otherwise RUST_LOG or a mode default
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.quiet || cli.json { "warn" } else { "info" })
        })
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::DeployTencent { region, deploy } => {
            let config = Config::discover(&cwd)?;
            commands::deploy_tencent(region, deploy, &config, output).await
        }
        Commands::DeployAliyun { service, deploy } => {
            let config = Config::discover(&cwd)?;
            commands::deploy_aliyun(service, deploy, &config, output).await
        }
        Commands::Build { repository, build } => {
            let config = Config::discover(&cwd)?;
            commands::build(repository, build, &config, output).await
        }
        Commands::ConfigCdnCacheTencent {
            region,
            domain,
            usage_limit,
        } => commands::config_cdn_cache(region, domain, usage_limit, output).await,
    }
}
