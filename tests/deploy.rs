// ABOUTME: Integration tests for the deploy orchestrator against scripted doubles.
// ABOUTME: Covers step order per provider, the confirmation gate, preconditions and waits.

mod support;

use std::time::Duration;

use faasup::build::BuildSpec;
use faasup::config::Timeouts;
use faasup::deploy::{DeployError, DeployOutcome, Deployer, DeploymentRequest, Step};
use faasup::diagnostics::{Diagnostics, WarningKind};
use faasup::function::FunctionStatus;
use faasup::provider::Provider;
use faasup::types::{BuildId, EnvVars, FunctionName, Repository};
use support::mocks::{Call, CallLog, MockFunctions, MockGate, MockImages, MockRegistry};

const TENCENT_REPO: &str = "ccr.ccs.tencentyun.com/space/app";
const ALIYUN_REPO: &str = "registry.cn-zhangjiakou.aliyuncs.com/space/app";

fn request(provider: Provider, repository: &str) -> DeploymentRequest {
    DeploymentRequest {
        provider,
        region: "ap-guangzhou".to_string(),
        function: FunctionName::new("web").unwrap(),
        repository: Repository::parse(repository).unwrap(),
        build_id: None,
        environment: None,
        auto_confirm: false,
    }
}

fn env(pairs: &[(&str, &str)]) -> EnvVars {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn deployed(outcome: DeployOutcome) -> faasup::deploy::DeployReport {
    match outcome {
        DeployOutcome::Deployed(report) => *report,
        DeployOutcome::Canceled => panic!("deploy was canceled"),
    }
}

// =============================================================================
// Provider flows
// =============================================================================

#[tokio::test(start_paused = true)]
async fn tencent_runs_every_step_in_order() {
    support::init_tracing();
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::new(
        &log,
        [
            FunctionStatus::Active,
            FunctionStatus::Updating,
            FunctionStatus::Active,
        ],
    );
    let registry = MockRegistry::new(&log, [false, true]);
    let gate = MockGate::accepting(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.environment = Some(env(&[("MODE", "prod")]));

    let mut diag = Diagnostics::default();
    let outcome = Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    assert_eq!(
        log.names(),
        vec![
            "build",
            "push",
            "digest",
            "confirm",
            "get_function",
            "tag_exists",
            "tag_exists",
            "update_code",
            "get_function",
            "get_function",
            "update_config",
            "get_function",
            "publish",
            "get_function",
        ]
    );

    let report = deployed(outcome);
    assert!(report.function.status.is_active());
    assert_eq!(report.version.as_deref(), Some("7"));
    assert!(report.build.is_some());
    assert!(!diag.has_warnings());
}

#[tokio::test(start_paused = true)]
async fn tencent_submits_digest_pinned_image_without_bundled_env() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.build_id = Some(BuildId::parse("20240131-093005-1a2b3c").unwrap());
    req.environment = Some(env(&[("A", "1")]));

    let mut diag = Diagnostics::default();
    Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    let mutations = log.mutations();
    assert_eq!(
        mutations,
        vec![
            Call::UpdateCode {
                image: format!("{TENCENT_REPO}:20240131-093005-1a2b3c@sha256:feedface"),
                environment: None,
            },
            Call::UpdateConfig(env(&[("A", "1")])),
            Call::Publish,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn tencent_unattended_deploy_with_ready_image_and_no_env_file() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::declining(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.auto_confirm = true;

    let start = tokio::time::Instant::now();
    let mut diag = Diagnostics::default();
    let report = deployed(
        Deployer::new(&images, &functions, &gate)
            .with_registry(&registry)
            .deploy(req, &BuildSpec::default(), &mut diag)
            .await
            .unwrap(),
    );

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(
        log.names(),
        vec![
            "build",
            "push",
            "digest",
            "get_function",
            "tag_exists",
            "update_code",
            "get_function",
            "publish",
            "get_function",
        ]
    );

    let build = report.build.unwrap();
    assert!(build.build_id.as_str().ends_with("-1a2b3c"));
    assert_eq!(
        log.mutations(),
        vec![
            Call::UpdateCode {
                image: format!("{}@sha256:feedface", build.image),
                environment: None,
            },
            Call::Publish,
        ]
    );
    assert!(report.function.status.is_active());
    assert!(!diag.has_warnings());
}

#[tokio::test(start_paused = true)]
async fn aliyun_bundles_env_and_skips_registry_and_publish() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::accepting(&log);

    let mut req = request(Provider::Aliyun, ALIYUN_REPO);
    req.build_id = Some(BuildId::parse("20240131-093005-1a2b3c").unwrap());
    req.environment = Some(env(&[("MODE", "prod")]));
    req.auto_confirm = true;

    let mut diag = Diagnostics::default();
    let report = deployed(
        Deployer::new(&images, &functions, &gate)
            .deploy(req, &BuildSpec::default(), &mut diag)
            .await
            .unwrap(),
    );

    assert_eq!(
        log.names(),
        vec![
            "push",
            "get_function",
            "update_code",
            "get_function",
            "get_function"
        ]
    );
    assert_eq!(
        log.mutations(),
        vec![Call::UpdateCode {
            image: format!("{ALIYUN_REPO}:20240131-093005-1a2b3c"),
            environment: Some(env(&[("MODE", "prod")])),
        }]
    );
    assert!(report.version.is_none());
    assert!(report.build.is_none());
}

#[tokio::test(start_paused = true)]
async fn absent_env_file_leaves_configuration_untouched() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(
            request(Provider::Tencent, TENCENT_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap();

    assert_eq!(log.count("update_config"), 0);
    assert_eq!(log.count("publish"), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_env_file_clears_configuration() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.environment = Some(EnvVars::new());

    let mut diag = Diagnostics::default();
    Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    assert!(log.calls().contains(&Call::UpdateConfig(EnvVars::new())));
}

// =============================================================================
// Image identity
// =============================================================================

#[tokio::test(start_paused = true)]
async fn preset_build_id_is_used_for_push_readiness_and_update() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.build_id = Some(BuildId::parse("20231224-120000-cafe").unwrap());
    let tagged = format!("{TENCENT_REPO}:20231224-120000-cafe");

    let mut diag = Diagnostics::default();
    Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    let calls = log.calls();
    assert_eq!(log.count("build"), 0);
    assert!(calls.contains(&Call::Push(tagged.clone())));
    assert!(calls.contains(&Call::TagExists {
        repo_name: "space/app".to_string(),
        tag: "20231224-120000-cafe".to_string(),
    }));
    let submitted = calls
        .iter()
        .find_map(|c| match c {
            Call::UpdateCode { image, .. } => Some(image.clone()),
            _ => None,
        })
        .unwrap();
    assert!(submitted.starts_with(&format!("{tagged}@")));
}

#[tokio::test(start_paused = true)]
async fn built_image_tag_matches_generated_build_id() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let report = deployed(
        Deployer::new(&images, &functions, &gate)
            .deploy(
                request(Provider::Aliyun, ALIYUN_REPO),
                &BuildSpec::default(),
                &mut diag,
            )
            .await
            .unwrap(),
    );

    let build = report.build.unwrap();
    assert!(build.build_id.as_str().ends_with("-1a2b3c"));
    assert_eq!(build.commit_id, "1a2b3c4d5e6f");
    assert_eq!(report.image, build.image);

    let calls = log.calls();
    assert!(calls.contains(&Call::Push(build.image.to_string())));
    assert!(calls.contains(&Call::UpdateCode {
        image: build.image.to_string(),
        environment: None,
    }));
}

#[tokio::test(start_paused = true)]
async fn missing_revision_is_reported_as_warning() {
    let log = CallLog::default();
    let images = MockImages::new(&log).without_revision();
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let report = deployed(
        Deployer::new(&images, &functions, &gate)
            .deploy(
                request(Provider::Aliyun, ALIYUN_REPO),
                &BuildSpec::default(),
                &mut diag,
            )
            .await
            .unwrap(),
    );

    assert_eq!(diag.warnings().len(), 1);
    assert_eq!(diag.warnings()[0].kind, WarningKind::MissingRevision);
    assert_eq!(report.build.unwrap().commit_id, "");
}

// =============================================================================
// Confirmation gate and preconditions
// =============================================================================

#[tokio::test(start_paused = true)]
async fn declining_makes_no_remote_calls() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::declining(&log);

    let mut req = request(Provider::Tencent, TENCENT_REPO);
    req.environment = Some(env(&[("A", "1")]));

    let mut diag = Diagnostics::default();
    let outcome = Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    assert!(matches!(outcome, DeployOutcome::Canceled));
    assert!(log.mutations().is_empty());
    assert_eq!(log.count("get_function"), 0);
    assert_eq!(log.count("tag_exists"), 0);
    assert_eq!(log.count("confirm"), 1);
}

#[tokio::test(start_paused = true)]
async fn auto_confirm_skips_prompt() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::declining(&log);

    let mut req = request(Provider::Aliyun, ALIYUN_REPO);
    req.auto_confirm = true;

    let mut diag = Diagnostics::default();
    let outcome = Deployer::new(&images, &functions, &gate)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap();

    assert!(matches!(outcome, DeployOutcome::Deployed(_)));
    assert_eq!(log.count("confirm"), 0);
}

#[tokio::test(start_paused = true)]
async fn non_active_function_is_rejected_without_waiting() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::new(&log, [FunctionStatus::Updating]);
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let start = tokio::time::Instant::now();
    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(
            request(Provider::Tencent, TENCENT_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::Precondition {
            status: FunctionStatus::Updating,
            ..
        }
    ));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(log.count("get_function"), 1);
    assert!(log.mutations().is_empty());
}

// =============================================================================
// Failures mid-flight
// =============================================================================

#[tokio::test(start_paused = true)]
async fn failed_update_stops_before_publish() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::new(
        &log,
        [
            FunctionStatus::Active,
            FunctionStatus::Updating,
            FunctionStatus::UpdateFailed,
        ],
    );
    let registry = MockRegistry::new(&log, [true]);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(
            request(Provider::Tencent, TENCENT_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::TransitionFailed {
            step: Step::UpdateCode,
            status: FunctionStatus::UpdateFailed,
        }
    ));
    assert_eq!(log.count("publish"), 0);
}

#[tokio::test(start_paused = true)]
async fn stuck_update_times_out_with_last_status() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions =
        MockFunctions::new(&log, [FunctionStatus::Active, FunctionStatus::Updating]);
    let gate = MockGate::accepting(&log);

    let timeouts = Timeouts {
        image_ready: Duration::from_secs(30),
        function_active: Duration::from_secs(5),
    };

    let mut req = request(Provider::Aliyun, ALIYUN_REPO);
    req.auto_confirm = true;

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .with_timeouts(timeouts)
        .deploy(req, &BuildSpec::default(), &mut diag)
        .await
        .unwrap_err();

    match err {
        DeployError::TransitionTimeout {
            step,
            status,
            waited,
        } => {
            assert_eq!(step, Step::UpdateCode);
            assert_eq!(status, FunctionStatus::Updating);
            assert_eq!(waited, Duration::from_secs(5));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn image_never_visible_aborts_before_update() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let registry = MockRegistry::new(&log, [false]);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .with_registry(&registry)
        .deploy(
            request(Provider::Tencent, TENCENT_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::ImageNotReady { .. }));
    assert!(log.mutations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn build_failure_stops_before_push() {
    let log = CallLog::default();
    let images = MockImages::new(&log).failing_build();
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .deploy(
            request(Provider::Aliyun, ALIYUN_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Build(_)));
    assert_eq!(log.names(), vec!["build"]);
}

#[tokio::test(start_paused = true)]
async fn remote_rejection_carries_step() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log).failing_update_code();
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .deploy(
            request(Provider::Aliyun, ALIYUN_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(Step::UpdateCode));
    assert!(matches!(err, DeployError::Api { .. }));
}

#[tokio::test(start_paused = true)]
async fn tencent_without_registry_client_is_a_configuration_error() {
    let log = CallLog::default();
    let images = MockImages::new(&log);
    let functions = MockFunctions::always_active(&log);
    let gate = MockGate::accepting(&log);

    let mut diag = Diagnostics::default();
    let err = Deployer::new(&images, &functions, &gate)
        .deploy(
            request(Provider::Tencent, TENCENT_REPO),
            &BuildSpec::default(),
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Configuration(_)));
    assert!(log.mutations().is_empty());
}
