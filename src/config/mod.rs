// ABOUTME: Configuration types and parsing for faasup.yml.
// ABOUTME: Also loads provider credentials and dotenv files from the user's machine.

mod credentials;
mod deserialize;
mod env_file;
mod init;
mod paths;
mod timeouts;

pub use credentials::{
    ALIYUN_CREDENTIALS_PATH, AliyunCredentials, TENCENT_CREDENTIALS_PATH, TencentCredentials,
};
pub use env_file::load_env_file;
pub use init::init_config;
pub use paths::expand_home;
pub use timeouts::Timeouts;

use crate::error::{Error, Result};
use deserialize::deserialize_build_args;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "faasup.yml";
pub const CONFIG_FILENAME_ALT: &str = "faasup.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".faasup/config.yml";

/// Project settings. Every field is optional; an absent file means defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub build: BuildDefaults,

    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Build settings that command-line flags may override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDefaults {
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    #[serde(default)]
    pub build_path: Option<PathBuf>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub progress: Option<String>,

    #[serde(default)]
    pub build_script: Option<PathBuf>,

    #[serde(default)]
    pub docker_config: Option<PathBuf>,

    #[serde(default)]
    pub image_tags: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_build_args")]
    pub build_args: Vec<String>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the project file in `dir`, falling back to defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Path of the first config file candidate present in `dir`.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }
}
