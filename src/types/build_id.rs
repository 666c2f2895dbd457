// ABOUTME: Sortable, unique image tags identifying one build output.
// ABOUTME: Generated as UTC timestamp plus revision or random suffix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Length of the revision prefix used as build id suffix.
const REVISION_SUFFIX_LEN: usize = 6;

/// Random bytes used when no revision is available.
const RANDOM_SUFFIX_BYTES: usize = 2;

#[derive(Debug, Error)]
pub enum BuildIdError {
    #[error("build id cannot be empty")]
    Empty,

    #[error("build id exceeds maximum tag length of 128 characters")]
    TooLong,

    #[error("build id cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in build id: '{0}'")]
    InvalidChar(char),
}

/// Image tag for one build, e.g. `20240131-093000-1a2b3c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildId(String);

impl BuildId {
    /// Validate a user supplied build id against the registry tag grammar.
    pub fn parse(value: &str) -> Result<Self, BuildIdError> {
        let value = value.trim();
        let first = value.chars().next().ok_or(BuildIdError::Empty)?;

        if value.len() > 128 {
            return Err(BuildIdError::TooLong);
        }

        if first == '.' || first == '-' {
            return Err(BuildIdError::InvalidStart(first));
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '.' && *c != '-')
        {
            return Err(BuildIdError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    /// Generate a build id for `now`.
    ///
    /// The suffix is the first six characters of `revision` when present,
    /// otherwise a random hex string. The second element reports whether the
    /// random fallback was used so callers can surface a warning.
    pub fn generate(now: DateTime<Utc>, revision: Option<&str>) -> (Self, bool) {
        let (suffix, fallback) = match revision.map(str::trim).filter(|r| !r.is_empty()) {
            Some(rev) => (rev.chars().take(REVISION_SUFFIX_LEN).collect(), false),
            None => (random_suffix(), true),
        };

        let id = format!("{}-{}", now.format("%Y%m%d-%H%M%S"), suffix);
        (Self(id), fallback)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn random_suffix() -> String {
    let bytes: [u8; RANDOM_SUFFIX_BYTES] = rand::random();
    hex::encode(bytes)
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BuildId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BuildId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
