// ABOUTME: Deploy command implementations for Tencent SCF and Aliyun FC.
// ABOUTME: Loads credentials and the env file before any build or remote step runs.

use faasup::build::DockerCli;
use faasup::config::{AliyunCredentials, Config, TencentCredentials, load_env_file};
use faasup::confirm::{AutoConfirm, Confirm, TerminalPrompt};
use faasup::deploy::{DeployOutcome, Deployer, DeploymentRequest};
use faasup::diagnostics::Diagnostics;
use faasup::error::{Error, Result};
use faasup::output::Output;
use faasup::provider::Provider;
use faasup::provider::aliyun::AliyunFc;
use faasup::provider::tencent::TencentCloud;
use faasup::types::{BuildId, EnvVars, FunctionName, Repository};

use super::{build_spec, docker_config, emit_warnings};
use crate::cli::DeployArgs;

/// Deploy to Tencent Cloud SCF.
pub async fn deploy_tencent(
    region: String,
    args: DeployArgs,
    config: &Config,
    mut output: Output,
) -> Result<()> {
    let credentials = TencentCredentials::load()?;
    let environment = load_env_file(args.envfile.as_deref())?;
    let request = deployment_request(Provider::Tencent, |_| Ok(region), &args, environment)?;

    output.start_timer();
    output.progress(&format!(
        "Deploying {} ({}) to Tencent SCF in {}",
        request.function, request.repository, request.region
    ));

    let client = TencentCloud::new(credentials, request.region.clone())?;
    let docker = DockerCli::new(docker_config(&args.build, &config.build));
    let gate = gate(args.yes);

    let deployer = Deployer::new(&docker, &client, gate.as_ref())
        .with_registry(&client)
        .with_timeouts(config.timeouts);

    run(deployer, request, &args, config, output).await
}

/// Deploy to Aliyun Function Compute.
pub async fn deploy_aliyun(
    service: String,
    args: DeployArgs,
    config: &Config,
    mut output: Output,
) -> Result<()> {
    let credentials = AliyunCredentials::load()?;
    let environment = load_env_file(args.envfile.as_deref())?;
    let request = deployment_request(Provider::Aliyun, aliyun_region, &args, environment)?;

    output.start_timer();
    output.progress(&format!(
        "Deploying {}/{} ({}) to Aliyun FC in {}",
        service, request.function, request.repository, request.region
    ));

    let client = AliyunFc::new(credentials, &request.region, service)?;
    let docker = DockerCli::new(docker_config(&args.build, &config.build));
    let gate = gate(args.yes);

    let deployer =
        Deployer::new(&docker, &client, gate.as_ref()).with_timeouts(config.timeouts);

    run(deployer, request, &args, config, output).await
}

async fn run(
    deployer: Deployer<'_>,
    request: DeploymentRequest,
    args: &DeployArgs,
    config: &Config,
    output: Output,
) -> Result<()> {
    let spec = build_spec(&args.build, &config.build);
    let mut diag = Diagnostics::default();

    let outcome = deployer.deploy(request, &spec, &mut diag).await;
    emit_warnings(&diag, &output);

    match outcome? {
        DeployOutcome::Deployed(report) => {
            output.result("Function", &report.function);
            output.success(&format!("Deployed {}", report.image));
        }
        DeployOutcome::Canceled => output.canceled("Deploy canceled"),
    }
    Ok(())
}

fn gate(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt)
    }
}

/// FC lives in the same region as the registry the image is pushed to.
fn aliyun_region(repository: &Repository) -> Result<String> {
    repository
        .aliyun_region()
        .map(str::to_string)
        .map_err(|e| Error::InvalidConfig(format!("--repository: {e}")))
}

fn deployment_request(
    provider: Provider,
    region: impl FnOnce(&Repository) -> Result<String>,
    args: &DeployArgs,
    environment: Option<EnvVars>,
) -> Result<DeploymentRequest> {
    let function = FunctionName::new(&args.function)
        .map_err(|e| Error::InvalidArgument(format!("--function: {e}")))?;
    let repository = Repository::parse(&args.repository)
        .map_err(|e| Error::InvalidArgument(format!("--repository: {e}")))?;
    let region = region(&repository)?;
    let build_id = args
        .build_id
        .as_deref()
        .map(BuildId::parse)
        .transpose()
        .map_err(|e| Error::InvalidArgument(format!("--build-id: {e}")))?;

    Ok(DeploymentRequest {
        provider,
        region,
        function,
        repository,
        build_id,
        environment,
        auto_confirm: args.yes,
    })
}
