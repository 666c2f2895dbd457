// ABOUTME: CDN cache configuration command for Tencent Cloud.
// ABOUTME: Independent of the deploy flow; prints the API response.

use faasup::config::TencentCredentials;
use faasup::error::Result;
use faasup::output::Output;
use faasup::provider::tencent::{CdnCacheRequest, Switch, TencentCloud};

pub async fn config_cdn_cache(
    region: String,
    domain: String,
    usage_limit: Option<Switch>,
    output: Output,
) -> Result<()> {
    let credentials = TencentCredentials::load()?;
    let client = TencentCloud::new(credentials, region)?;

    let request = CdnCacheRequest {
        domain,
        usage_limit,
    };
    let response = client.update_cdn_cache(&request).await?;

    output.result("Response", &response);
    output.success(&format!("Updated CDN cache rules for {}", request.domain));
    Ok(())
}
