// ABOUTME: Provider capability profiles selecting optional deploy steps.
// ABOUTME: One orchestrator serves every provider; the profile decides which steps run.

/// Which optional steps a provider's deploy flow needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Environment variables are applied by a separate config call after the code update.
    pub separate_config_update: bool,
    /// New code must be promoted with an explicit publish call.
    pub explicit_publish: bool,
    /// The registry lags behind a push and must be polled before use.
    pub registry_readiness: bool,
    /// The submitted image reference carries the pushed digest.
    pub pin_digest: bool,
}

impl Capabilities {
    pub const TENCENT: Capabilities = Capabilities {
        separate_config_update: true,
        explicit_publish: true,
        registry_readiness: true,
        pin_digest: true,
    };

    pub const ALIYUN: Capabilities = Capabilities {
        separate_config_update: false,
        explicit_publish: false,
        registry_readiness: false,
        pin_digest: false,
    };
}
