// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the deploy step order at compile time.

/// Image reference fixed (built now or given by build id).
/// Available actions: `push()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Image pushed to the registry.
/// Available actions: `confirm()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pushed;

/// Operator agreed to proceed (or `--yes`).
/// Available actions: `check_active()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

/// Function observed Active before any mutation.
/// Available actions: `ensure_image_ready()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Checked;

/// Image tag visible in the registry, or the provider needs no check.
/// Available actions: `update_code()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageReady;

/// New code applied and function back to Active.
/// Available actions: `update_config()`
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeUpdated;

/// Environment applied (or left untouched) and function Active.
/// Available actions: `publish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Configured;

/// Version published, or the provider serves the latest code directly.
/// Available actions: `finish()`
#[derive(Debug, Clone, Default)]
pub struct Published {
    pub(crate) version: Option<String>,
}

impl Published {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
