// ABOUTME: FunctionClient implementation for Aliyun Function Compute.
// ABOUTME: Image and environment variables travel together in one UpdateFunction call.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::AliyunFc;
use crate::function::{FunctionClient, FunctionInfo, FunctionStatus};
use crate::provider::ApiError;
use crate::types::{EnvVars, FunctionName, ImageRef};

const CUSTOM_CONTAINER_RUNTIME: &str = "custom-container";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionResponse {
    function_name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    last_update_status: Option<String>,
    #[serde(default)]
    custom_container_config: Option<CustomContainerConfig>,
    #[serde(default)]
    environment_variables: EnvVars,
}

#[derive(Deserialize)]
struct CustomContainerConfig {
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionResponse {
    #[serde(default)]
    version_id: Option<String>,
}

/// Map FC's optional state fields onto the shared lifecycle.
///
/// Functions without a reported state are treated as Active.
fn derive_status(state: Option<&str>, last_update_status: Option<&str>) -> FunctionStatus {
    match last_update_status {
        Some("InProgress") => return FunctionStatus::Updating,
        Some("Failed") => return FunctionStatus::UpdateFailed,
        _ => {}
    }
    match state {
        None | Some("Active") => FunctionStatus::Active,
        Some("Pending") => FunctionStatus::Creating,
        Some(other) => FunctionStatus::from_wire(other),
    }
}

impl From<FunctionResponse> for FunctionInfo {
    fn from(resp: FunctionResponse) -> Self {
        FunctionInfo {
            name: resp.function_name,
            status: derive_status(resp.state.as_deref(), resp.last_update_status.as_deref()),
            image: resp.custom_container_config.and_then(|c| c.image),
            environment: resp.environment_variables,
        }
    }
}

fn update_code_body(image: &ImageRef, environment: Option<&EnvVars>) -> serde_json::Value {
    let mut body = json!({
        "runtime": CUSTOM_CONTAINER_RUNTIME,
        "customContainerConfig": { "image": image.to_string() },
    });
    if let Some(env) = environment {
        body["environmentVariables"] = json!(env);
    }
    body
}

fn update_config_body(environment: &EnvVars) -> serde_json::Value {
    json!({ "environmentVariables": environment })
}

fn publish_body() -> serde_json::Value {
    json!({ "description": "published by faasup" })
}

#[async_trait]
impl FunctionClient for AliyunFc {
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionInfo, ApiError> {
        let path = self.function_path(name.as_str());
        let response: FunctionResponse = self
            .request(Method::GET, &path, "GetFunction", None)
            .await?;
        Ok(response.into())
    }

    async fn update_code(
        &self,
        name: &FunctionName,
        image: &ImageRef,
        environment: Option<&EnvVars>,
    ) -> Result<(), ApiError> {
        let path = self.function_path(name.as_str());
        let body = update_code_body(image, environment);
        let _: serde_json::Value = self
            .request(Method::PUT, &path, "UpdateFunction", Some(&body))
            .await?;
        Ok(())
    }

    async fn update_config(
        &self,
        name: &FunctionName,
        environment: &EnvVars,
    ) -> Result<(), ApiError> {
        let path = self.function_path(name.as_str());
        let body = update_config_body(environment);
        let _: serde_json::Value = self
            .request(Method::PUT, &path, "UpdateFunction", Some(&body))
            .await?;
        Ok(())
    }

    async fn publish(&self, _name: &FunctionName) -> Result<Option<String>, ApiError> {
        let path = self.versions_path();
        let body = publish_body();
        let response: VersionResponse = self
            .request(Method::POST, &path, "PublishServiceVersion", Some(&body))
            .await?;
        Ok(response.version_id)
    }
}
