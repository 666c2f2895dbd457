// ABOUTME: CDN cache-rule configuration for a Tencent Cloud accelerated domain.
// ABOUTME: Node cache, browser max-age and optional usage-limit rules in one UpdateDomainConfig.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::{CDN, TencentCloud};
use crate::provider::ApiError;

const INDEX_CACHE_SECS: i64 = 10;
const STATIC_CACHE_SECS: i64 = 10 * 60 * 60;
const INDEX_MAX_AGE_SECS: i64 = 30;
const STATIC_MAX_AGE_SECS: i64 = 10 * 24 * 60 * 60;

const STATIC_DIRECTORIES: &[&str] = &[
    "/js", "/css", "/fonts", "/imgs", "/img", "/libs", "/static", "/assets",
];
const INDEX_PATHS: &[&str] = &["/manifest.json", "/service-worker.js"];

/// On/off flag as spelled by the CDN API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Switch {
    On,
    Off,
}

impl FromStr for Switch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Switch::On),
            "off" => Ok(Switch::Off),
            other => Err(format!("expected 'on' or 'off', got '{other}'")),
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Switch::On => f.write_str("on"),
            Switch::Off => f.write_str("off"),
        }
    }
}

/// Inputs for a cache configuration update.
#[derive(Debug, Clone)]
pub struct CdnCacheRequest {
    pub domain: String,
    /// `None` leaves rate limiting and capping untouched.
    pub usage_limit: Option<Switch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDomainConfigRequest {
    domain: String,
    cache: Cache,
    max_age: MaxAge,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_freq_limit: Option<IpFreqLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    downstream_capping: Option<DownstreamCapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bandwidth_alert: Option<BandwidthAlert>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Cache {
    rule_cache: Vec<RuleCache>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RuleCache {
    rule_type: &'static str,
    rule_paths: Vec<&'static str>,
    cache_config: RuleCacheConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RuleCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<CacheTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_cache: Option<NoCache>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CacheTime {
    switch: Switch,
    cache_time: i64,
    compare_max_age: Switch,
    ignore_cache_control: Switch,
    ignore_set_cookie: Switch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NoCache {
    switch: Switch,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MaxAge {
    switch: Switch,
    max_age_rules: Vec<MaxAgeRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MaxAgeRule {
    max_age_type: &'static str,
    max_age_contents: Vec<&'static str>,
    max_age_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    follow_origin: Option<Switch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct IpFreqLimit {
    switch: Switch,
    qps: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DownstreamCapping {
    switch: Switch,
    capping_rules: Vec<CappingRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CappingRule {
    rule_type: &'static str,
    rule_paths: Vec<&'static str>,
    #[serde(rename = "KBpsThreshold")]
    kbps_threshold: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BandwidthAlert {
    statistic_items: Vec<StatisticItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StatisticItem {
    switch: Switch,
    alert_switch: Switch,
    #[serde(rename = "Type")]
    kind: &'static str,
    metric: &'static str,
    bps_threshold: u64,
    counter_measure: &'static str,
    cycle: u64,
    un_block_time: u64,
    alert_percentage: u64,
}

fn cached(seconds: i64) -> RuleCacheConfig {
    RuleCacheConfig {
        cache: Some(CacheTime {
            switch: Switch::On,
            cache_time: seconds,
            compare_max_age: Switch::Off,
            ignore_cache_control: Switch::Off,
            ignore_set_cookie: Switch::Off,
        }),
        no_cache: None,
    }
}

fn not_cached() -> RuleCacheConfig {
    RuleCacheConfig {
        cache: None,
        no_cache: Some(NoCache { switch: Switch::On }),
    }
}

fn node_cache_rules() -> Vec<RuleCache> {
    fn rule(
        rule_type: &'static str,
        rule_paths: &[&'static str],
        cache_config: RuleCacheConfig,
    ) -> RuleCache {
        RuleCache {
            rule_type,
            rule_paths: rule_paths.to_vec(),
            cache_config,
        }
    }

    vec![
        rule("all", &["*"], cached(INDEX_CACHE_SECS)),
        rule("directory", &["/api"], not_cached()),
        rule("directory", STATIC_DIRECTORIES, cached(STATIC_CACHE_SECS)),
        rule("path", &["/favicon.ico"], cached(STATIC_CACHE_SECS)),
        rule("path", INDEX_PATHS, cached(INDEX_CACHE_SECS)),
        rule("index", &["/"], cached(INDEX_CACHE_SECS)),
    ]
}

fn browser_cache_rules() -> Vec<MaxAgeRule> {
    fn rule(
        max_age_type: &'static str,
        contents: &[&'static str],
        max_age_time: i64,
        follow_origin: Option<Switch>,
    ) -> MaxAgeRule {
        MaxAgeRule {
            max_age_type,
            max_age_contents: contents.to_vec(),
            max_age_time,
            follow_origin,
        }
    }

    vec![
        rule("all", &["*"], INDEX_MAX_AGE_SECS, Some(Switch::On)),
        rule("directory", &["/api"], 0, Some(Switch::On)),
        rule("directory", STATIC_DIRECTORIES, STATIC_MAX_AGE_SECS, None),
        rule("path", &["/favicon.ico"], STATIC_MAX_AGE_SECS, None),
        rule("path", INDEX_PATHS, INDEX_MAX_AGE_SECS, None),
        rule("index", &["/"], INDEX_MAX_AGE_SECS, None),
    ]
}

/// Build the full UpdateDomainConfig payload for `request`.
pub fn domain_config_request(request: &CdnCacheRequest) -> UpdateDomainConfigRequest {
    let mut config = UpdateDomainConfigRequest {
        domain: request.domain.clone(),
        cache: Cache {
            rule_cache: node_cache_rules(),
        },
        max_age: MaxAge {
            switch: Switch::On,
            max_age_rules: browser_cache_rules(),
        },
        ip_freq_limit: None,
        downstream_capping: None,
        bandwidth_alert: None,
    };

    if let Some(switch) = request.usage_limit {
        config.ip_freq_limit = Some(IpFreqLimit { switch, qps: 50 });
        config.downstream_capping = Some(DownstreamCapping {
            switch,
            capping_rules: vec![CappingRule {
                rule_type: "all",
                rule_paths: vec!["*"],
                kbps_threshold: 1024,
            }],
        });
        config.bandwidth_alert = Some(BandwidthAlert {
            statistic_items: vec![StatisticItem {
                switch,
                alert_switch: Switch::On,
                kind: "moment",
                metric: "bandwidth",
                bps_threshold: 20_000_000,
                counter_measure: "RETURN_404",
                cycle: 5,
                un_block_time: 60,
                alert_percentage: 50,
            }],
        });
    }

    config
}

impl TencentCloud {
    /// Apply the cache rules to a domain, returning the raw API response.
    pub async fn update_cdn_cache(
        &self,
        request: &CdnCacheRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let payload = domain_config_request(request);
        tracing::info!(domain = %request.domain, "Updating CDN cache configuration");
        self.call(CDN, "UpdateDomainConfig", &payload).await
    }
}
