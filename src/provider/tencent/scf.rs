// ABOUTME: Serverless Cloud Function (SCF) operations for Tencent Cloud.
// ABOUTME: Code and configuration are separate calls; PublishVersion promotes $LATEST.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SCF, TencentCloud};
use crate::function::{FunctionClient, FunctionInfo, FunctionStatus};
use crate::provider::ApiError;
use crate::types::{EnvVars, FunctionName, ImageRef};

/// Images from a personal-edition container registry.
const IMAGE_TYPE_PERSONAL: &str = "personal";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionRequest<'a> {
    function_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetFunctionResponse {
    function_name: String,
    status: String,
    #[serde(default)]
    image_config: Option<ImageConfigResponse>,
    #[serde(default)]
    environment: Option<Environment>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageConfigResponse {
    #[serde(default)]
    image_uri: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateCodeRequest<'a> {
    function_name: &'a str,
    code: Code,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Code {
    image_config: ImageConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ImageConfig {
    image_type: &'static str,
    image_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateConfigRequest<'a> {
    function_name: &'a str,
    environment: Environment,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Environment {
    #[serde(default)]
    variables: Vec<Variable>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Variable {
    key: String,
    #[serde(default)]
    value: String,
}

impl From<&EnvVars> for Environment {
    fn from(vars: &EnvVars) -> Self {
        Self {
            variables: vars
                .iter()
                .map(|(key, value)| Variable {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

impl From<Environment> for EnvVars {
    fn from(env: Environment) -> Self {
        env.variables
            .into_iter()
            .map(|var| (var.key, var.value))
            .collect()
    }
}

#[derive(Deserialize)]
struct Empty {}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PublishVersionResponse {
    #[serde(default)]
    function_version: Option<String>,
}

impl From<GetFunctionResponse> for FunctionInfo {
    fn from(resp: GetFunctionResponse) -> Self {
        FunctionInfo {
            name: resp.function_name,
            status: FunctionStatus::from_wire(&resp.status),
            image: resp.image_config.and_then(|c| c.image_uri),
            environment: resp.environment.map(EnvVars::from).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl FunctionClient for TencentCloud {
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionInfo, ApiError> {
        let request = FunctionRequest {
            function_name: name.as_str(),
        };
        let response: GetFunctionResponse = self.call(SCF, "GetFunction", &request).await?;
        Ok(response.into())
    }

    async fn update_code(
        &self,
        name: &FunctionName,
        image: &ImageRef,
        _environment: Option<&EnvVars>,
    ) -> Result<(), ApiError> {
        let request = UpdateCodeRequest {
            function_name: name.as_str(),
            code: Code {
                image_config: ImageConfig {
                    image_type: IMAGE_TYPE_PERSONAL,
                    image_uri: image.to_string(),
                },
            },
        };
        let _: Empty = self.call(SCF, "UpdateFunctionCode", &request).await?;
        Ok(())
    }

    async fn update_config(
        &self,
        name: &FunctionName,
        environment: &EnvVars,
    ) -> Result<(), ApiError> {
        let request = UpdateConfigRequest {
            function_name: name.as_str(),
            environment: environment.into(),
        };
        let _: Empty = self
            .call(SCF, "UpdateFunctionConfiguration", &request)
            .await?;
        Ok(())
    }

    async fn publish(&self, name: &FunctionName) -> Result<Option<String>, ApiError> {
        let request = FunctionRequest {
            function_name: name.as_str(),
        };
        let response: PublishVersionResponse = self.call(SCF, "PublishVersion", &request).await?;
        Ok(response.function_version)
    }
}
