// ABOUTME: Validated domain types shared by the build and deploy pipelines.
// ABOUTME: Build ids, repositories, image references and function names.

mod build_id;
mod function_name;
mod image_ref;
mod repository;

use std::collections::BTreeMap;

pub use build_id::{BuildId, BuildIdError};
pub use function_name::{FunctionName, FunctionNameError};
pub use image_ref::ImageRef;
pub use repository::{Repository, RepositoryError, extract_repo_name};

/// Environment variables applied to a function, ordered for stable output.
pub type EnvVars = BTreeMap<String, String>;
