// ABOUTME: Tencent Container Registry (personal edition) tag lookup.
// ABOUTME: A tag is visible once DescribeImagePersonal lists at least one entry for it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{TCR, TencentCloud};
use crate::provider::ApiError;
use crate::registry::RegistryClient;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImagePersonalRequest<'a> {
    repo_name: &'a str,
    tag: &'a str,
    limit: u32,
    offset: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImagePersonalResponse {
    data: TagList,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TagList {
    #[serde(default)]
    tag_info: Vec<serde_json::Value>,
}

#[async_trait]
impl RegistryClient for TencentCloud {
    async fn tag_exists(&self, repo_name: &str, tag: &str) -> Result<bool, ApiError> {
        let request = DescribeImagePersonalRequest {
            repo_name,
            tag,
            limit: 1,
            offset: 0,
        };
        let response: DescribeImagePersonalResponse =
            self.call(TCR, "DescribeImagePersonal", &request).await?;
        Ok(!response.data.tag_info.is_empty())
    }
}
