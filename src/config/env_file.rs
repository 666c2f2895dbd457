// ABOUTME: Dotenv file loading for function environment variables.
// ABOUTME: No file means leave remote variables untouched; an empty file clears them.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::EnvVars;

use super::expand_home;

/// Read `path` as a dotenv file without touching the process environment.
///
/// Returns `None` when no path is given so callers can distinguish "do not
/// update" from "update to empty".
pub fn load_env_file(path: Option<&Path>) -> Result<Option<EnvVars>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let path = expand_home(path);
    let env_error = |reason: String| Error::EnvFile {
        path: path.clone(),
        reason,
    };

    let entries = dotenv::from_path_iter(&path).map_err(|e| env_error(e.to_string()))?;

    let mut vars = EnvVars::new();
    for entry in entries {
        let (key, value) = entry.map_err(|e| env_error(e.to_string()))?;
        vars.insert(key, value);
    }

    tracing::debug!("Loaded {} variable(s) from {}", vars.len(), path.display());
    Ok(Some(vars))
}
