// ABOUTME: Provider credential loading from local files and the environment.
// ABOUTME: Aliyun reads a JSON file; Tencent follows its SDK's env-then-profile chain.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::expand_home;

pub const ALIYUN_CREDENTIALS_PATH: &str = "~/.config/aliyun_fc_deploy.json";
pub const TENCENT_CREDENTIALS_PATH: &str = "~/.tencentcloud/credentials";

const TENCENT_SECRET_ID_VAR: &str = "TENCENTCLOUD_SECRET_ID";
const TENCENT_SECRET_KEY_VAR: &str = "TENCENTCLOUD_SECRET_KEY";

/// Access keys for Aliyun Function Compute.
#[derive(Clone, Deserialize)]
pub struct AliyunCredentials {
    #[serde(rename = "ALIBABA_CLOUD_ACCOUNT_ID")]
    pub account_id: String,
    #[serde(rename = "ALIBABA_CLOUD_ACCESS_KEY_ID")]
    pub access_key_id: String,
    #[serde(rename = "ALIBABA_CLOUD_ACCESS_KEY_SECRET")]
    pub access_key_secret: String,
}

impl AliyunCredentials {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(ALIYUN_CREDENTIALS_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let path = expand_home(path);
        let data = std::fs::read(&path).map_err(|e| {
            Error::MissingCredentials(format!("cannot read {}: {}", path.display(), e))
        })?;

        let credentials: Self =
            serde_json::from_slice(&data).map_err(|e| Error::InvalidCredentials {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if credentials.account_id.is_empty()
            || credentials.access_key_id.is_empty()
            || credentials.access_key_secret.is_empty()
        {
            return Err(Error::InvalidCredentials {
                path,
                reason: "account id, access key id and secret must all be set".to_string(),
            });
        }

        Ok(credentials)
    }
}

impl fmt::Debug for AliyunCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliyunCredentials")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// API keys for Tencent Cloud.
#[derive(Clone)]
pub struct TencentCredentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl TencentCredentials {
    /// Environment variables first, then the `[default]` profile file.
    pub fn load() -> Result<Self> {
        if let Some(credentials) = Self::from_env() {
            return Ok(credentials);
        }
        Self::load_from(Path::new(TENCENT_CREDENTIALS_PATH))
    }

    pub fn from_env() -> Option<Self> {
        let secret_id = std::env::var(TENCENT_SECRET_ID_VAR).ok()?;
        let secret_key = std::env::var(TENCENT_SECRET_KEY_VAR).ok()?;
        if secret_id.is_empty() || secret_key.is_empty() {
            return None;
        }
        Some(Self {
            secret_id,
            secret_key,
        })
    }

    /// Read the `[default]` section of an INI style profile file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let path = expand_home(path);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::MissingCredentials(format!(
                "set {TENCENT_SECRET_ID_VAR}/{TENCENT_SECRET_KEY_VAR} or create {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_profile(&content).ok_or_else(|| Error::InvalidCredentials {
            path: PathBuf::from(&path),
            reason: "missing secret_id or secret_key in [default] section".to_string(),
        })
    }

    fn parse_profile(content: &str) -> Option<Self> {
        let mut in_default = false;
        let mut secret_id = None;
        let mut secret_key = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_default = section.trim() == "default";
                continue;
            }
            if !in_default {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().to_string();
                match key.trim() {
                    "secret_id" => secret_id = Some(value),
                    "secret_key" => secret_key = Some(value),
                    _ => {}
                }
            }
        }

        Some(Self {
            secret_id: secret_id.filter(|s| !s.is_empty())?,
            secret_key: secret_key.filter(|s| !s.is_empty())?,
        })
    }
}

impl fmt::Debug for TencentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TencentCredentials")
            .field("secret_id", &self.secret_id)
            .finish_non_exhaustive()
    }
}
