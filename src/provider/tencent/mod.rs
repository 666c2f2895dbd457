// ABOUTME: Tencent Cloud API 3.0 client shared by the SCF, TCR and CDN services.
// ABOUTME: Every call is a signed JSON POST answered with a {"Response": ...} envelope.

mod cdn;
mod scf;
pub mod signer;
mod tcr;

pub use cdn::{CdnCacheRequest, Switch, UpdateDomainConfigRequest, domain_config_request};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use super::{ApiError, DecodeSnafu, EncodeSnafu, StatusSnafu, TransportSnafu};
use crate::config::TencentCredentials;

/// A Tencent Cloud product endpoint with its pinned API version.
#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub name: &'static str,
    pub version: &'static str,
}

impl Service {
    pub fn host(&self) -> String {
        format!("{}.tencentcloudapi.com", self.name)
    }
}

pub const SCF: Service = Service {
    name: "scf",
    version: "2018-04-16",
};

pub const TCR: Service = Service {
    name: "tcr",
    version: "2019-09-24",
};

pub const CDN: Service = Service {
    name: "cdn",
    version: "2018-06-06",
};

/// Signed client for one region.
pub struct TencentCloud {
    http: reqwest::Client,
    credentials: TencentCredentials,
    region: String,
}

impl TencentCloud {
    pub fn new(credentials: TencentCredentials, region: impl Into<String>) -> Result<Self, ApiError> {
        let http = super::http_client().context(TransportSnafu {
            action: "client setup",
        })?;
        Ok(Self {
            http,
            credentials,
            region: region.into(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Invoke `action` on `service` and decode the `Response` body.
    pub async fn call<Req, Resp>(
        &self,
        service: Service,
        action: &str,
        request: &Req,
    ) -> Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_string(request).context(EncodeSnafu { action })?;
        let host = service.host();
        let timestamp = Utc::now().timestamp();
        let authorization =
            signer::authorization(&self.credentials, service.name, &host, timestamp, &payload);

        tracing::debug!(service = service.name, action, "Calling Tencent Cloud API");

        let response = self
            .http
            .post(format!("https://{host}/"))
            .header("Authorization", authorization)
            .header("Content-Type", signer::CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", service.version)
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await
            .context(TransportSnafu { action })?;

        let status = response.status();
        let body = response.text().await.context(TransportSnafu { action })?;

        if !status.is_success() {
            return StatusSnafu {
                action,
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        decode_response(action, &body)
    }
}

#[derive(serde::Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteError {
    code: String,
    message: String,
}

/// Unwrap the `Response` envelope, surfacing an embedded `Error` object.
fn decode_response<T: DeserializeOwned>(action: &str, body: &str) -> Result<T, ApiError> {
    let envelope: Envelope = serde_json::from_str(body).context(DecodeSnafu { action })?;
    let mut response = envelope.response;

    if let Some(error) = response.get_mut("Error").map(serde_json::Value::take) {
        let error: RemoteError = serde_json::from_value(error).context(DecodeSnafu { action })?;
        let request_id = response
            .get("RequestId")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        return Err(ApiError::Remote {
            action: action.to_string(),
            code: error.code,
            message: error.message,
            request_id,
        });
    }

    serde_json::from_value(response).context(DecodeSnafu { action })
}
