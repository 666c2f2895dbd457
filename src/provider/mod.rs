// ABOUTME: Cloud provider clients for Tencent Cloud and Aliyun.
// ABOUTME: Each implements FunctionClient and, where supported, RegistryClient.

pub mod aliyun;
mod digest;
mod error;
pub mod tencent;

pub use error::{ApiError, ApiErrorKind};
pub(crate) use error::{DecodeSnafu, EncodeSnafu, StatusSnafu, TransportSnafu};

use std::fmt;
use std::time::Duration;

use crate::deploy::Capabilities;

/// Per-request timeout for cloud API calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supported serverless platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Tencent,
    Aliyun,
}

impl Provider {
    /// Deploy steps this provider requires.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Provider::Tencent => Capabilities::TENCENT,
            Provider::Aliyun => Capabilities::ALIYUN,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Tencent => f.write_str("tencent"),
            Provider::Aliyun => f.write_str("aliyun"),
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("faasup/", env!("CARGO_PKG_VERSION")))
        .build()
}
