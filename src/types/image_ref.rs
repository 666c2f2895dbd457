// ABOUTME: Fully qualified image reference for one deployment.
// ABOUTME: Formats as repository:build_id with an optional pinned digest.

use super::{BuildId, Repository};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: Repository,
    tag: BuildId,
    digest: Option<String>,
}

impl ImageRef {
    pub fn new(repository: Repository, tag: BuildId) -> Self {
        Self {
            repository,
            tag,
            digest: None,
        }
    }

    /// Pin this reference to a registry digest such as `sha256:...`.
    pub fn with_digest(&self, digest: impl Into<String>) -> Self {
        Self {
            repository: self.repository.clone(),
            tag: self.tag.clone(),
            digest: Some(digest.into()),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn tag(&self) -> &BuildId {
        &self.tag
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The `repository:tag` form, without any digest.
    pub fn tagged(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)?;
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
