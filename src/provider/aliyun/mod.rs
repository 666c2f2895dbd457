// ABOUTME: Aliyun Function Compute (API 2016-08-15) client for one service.
// ABOUTME: Endpoint is derived from the account id and the registry region.

mod function;
pub mod signer;

use chrono::Utc;
use reqwest::Method;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use super::{ApiError, DecodeSnafu, EncodeSnafu, StatusSnafu, TransportSnafu};
use crate::config::AliyunCredentials;

pub const API_VERSION: &str = "2016-08-15";

/// Signed client for the functions of a single FC service.
pub struct AliyunFc {
    http: reqwest::Client,
    credentials: AliyunCredentials,
    endpoint: String,
    service: String,
}

impl AliyunFc {
    pub fn new(
        credentials: AliyunCredentials,
        region: &str,
        service: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = super::http_client().context(TransportSnafu {
            action: "client setup",
        })?;
        let endpoint = endpoint(&credentials.account_id, region);
        tracing::info!("Deploy endpoint={endpoint}");
        Ok(Self {
            http,
            credentials,
            endpoint,
            service: service.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn service_path(&self) -> String {
        format!(
            "/{API_VERSION}/services/{}",
            urlencoding::encode(&self.service)
        )
    }

    fn versions_path(&self) -> String {
        format!("{}/versions", self.service_path())
    }

    fn function_path(&self, function: &str) -> String {
        format!(
            "{}/functions/{}",
            self.service_path(),
            urlencoding::encode(function)
        )
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        action: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let payload = match body {
            Some(body) => serde_json::to_string(body).context(EncodeSnafu { action })?,
            None => String::new(),
        };

        let date = signer::http_date(Utc::now());
        let account_id = self.credentials.account_id.as_str();
        let string_to_sign = signer::string_to_sign(
            method.as_str(),
            "",
            &date,
            &[("x-fc-account-id", account_id)],
            path,
        );
        let authorization = signer::authorization(&self.credentials, &string_to_sign);

        tracing::debug!(%method, path, action, "Calling Function Compute API");

        let response = self
            .http
            .request(method, format!("https://{}{path}", self.endpoint))
            .header("Authorization", authorization)
            .header("Content-Type", signer::CONTENT_TYPE)
            .header("Date", &date)
            .header("x-fc-account-id", account_id)
            .body(payload)
            .send()
            .await
            .context(TransportSnafu { action })?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-fc-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.context(TransportSnafu { action })?;

        if !status.is_success() {
            return Err(error_response(action, status.as_u16(), body, request_id));
        }

        serde_json::from_str(&body).context(DecodeSnafu { action })
    }
}

/// `{account}.{region}.fc.aliyuncs.com`
pub fn endpoint(account_id: &str, region: &str) -> String {
    format!("{account_id}.{region}.fc.aliyuncs.com")
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteError {
    error_code: String,
    error_message: String,
}

fn error_response(action: &str, status: u16, body: String, request_id: Option<String>) -> ApiError {
    match serde_json::from_str::<RemoteError>(&body) {
        Ok(remote) => ApiError::Remote {
            action: action.to_string(),
            code: remote.error_code,
            message: remote.error_message,
            request_id,
        },
        Err(_) => StatusSnafu {
            action,
            status,
            body,
        }
        .build(),
    }
}
