// ABOUTME: Request signing for the Aliyun Function Compute 2016-08-15 API.
// ABOUTME: HMAC-SHA256 over method, content headers, date, x-fc-* headers and resource path.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use crate::config::AliyunCredentials;
use crate::provider::digest::hmac_sha256;

pub const CONTENT_TYPE: &str = "application/json";

/// HTTP date as FC expects it, always in GMT.
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Text covered by the signature. `fc_headers` must be lowercase names.
pub fn string_to_sign(
    method: &str,
    content_md5: &str,
    date: &str,
    fc_headers: &[(&str, &str)],
    path: &str,
) -> String {
    let mut headers: Vec<_> = fc_headers
        .iter()
        .filter(|(name, _)| name.starts_with("x-fc-"))
        .collect();
    headers.sort_by_key(|(name, _)| *name);

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    format!("{method}\n{content_md5}\n{CONTENT_TYPE}\n{date}\n{canonical_headers}{path}")
}

/// `Authorization` header value.
pub fn authorization(credentials: &AliyunCredentials, string_to_sign: &str) -> String {
    let signature = STANDARD.encode(hmac_sha256(
        credentials.access_key_secret.as_bytes(),
        string_to_sign.as_bytes(),
    ));
    format!("FC {}:{signature}", credentials.access_key_id)
}
