// ABOUTME: Bounded-wait settings for remote polling.
// ABOUTME: Image readiness and function activation both default to thirty seconds.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Timeouts {
    /// How long to wait for a pushed tag to appear in the registry.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub image_ready: Duration,

    /// How long to wait for a function to return to Active after a mutation.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub function_active: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            image_ready: default_timeout(),
            function_active: default_timeout(),
        }
    }
}
