use async_trait::async_trait;
use quantdesk_core::data::error::DataError;
use quantdesk_core::data::port::DataClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// # Summary
/// 云端数据库下载客户端。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 下载分两步：先通过 `data/read` 换取临时链接，再下载链接内容。
#[derive(Clone)]
pub struct CloudDataClient {
    // 内部使用的 HTTP 客户端
    client: Client,
    // API 根地址，如 `https://www.quantconnect.com/api/v2`
    base_url: String,
}

/// `data/read` 请求体
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DataReadRequest<'a> {
    format: &'a str,
    file_path: &'a str,
    organization_id: &'a str,
}

/// `data/read` 响应体，沿用云端 `{success, errors}` 信封
#[derive(Deserialize, Debug)]
struct DataReadResponse {
    #[serde(default)]
    success: bool,
    link: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl CloudDataClient {
    /// # Summary
    /// 创建一个新的 CloudDataClient 实例。
    ///
    /// # Logic
    /// 1. 安装 ring 作为进程级 TLS 加密后端 (已安装则忽略)。
    /// 2. 配置 5 分钟超时，数据文件可能较大。
    ///
    /// # Arguments
    /// * `base_url`: API 根地址，末尾的 `/` 会被去掉。
    pub fn new(base_url: impl Into<String>) -> Result<Self, DataError> {
        // 已有其它 provider 时返回 Err，这里无需处理
        let _already_installed = rustls::crypto::ring::default_provider().install_default();

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// # Summary
    /// 请求指定文件的临时下载链接。
    ///
    /// # Logic
    /// 1. POST `data/read`，`format` 固定为 `link`。
    /// 2. 响应 `success=false` 时把 `errors` 合并为一条 RequestFailed 消息。
    async fn request_link(
        &self,
        relative_path: &str,
        organization_id: &str,
    ) -> Result<String, DataError> {
        let url = format!("{}/data/read", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&DataReadRequest {
                format: "link",
                file_path: relative_path,
                organization_id,
            })
            .send()
            .await
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        let body: DataReadResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                return Err(DataError::RequestFailed(format!(
                    "POST {} failed with HTTP {}: {}",
                    url, status, e
                )));
            }
        };

        if !body.success {
            let message = if body.errors.is_empty() {
                format!("POST {} failed with HTTP {}", url, status)
            } else {
                body.errors.join("\n")
            };
            return Err(DataError::RequestFailed(message));
        }

        body.link.ok_or_else(|| {
            DataError::RequestFailed(format!("No download link returned for {}", relative_path))
        })
    }
}

#[async_trait]
impl DataClient for CloudDataClient {
    async fn download_file(
        &self,
        relative_path: &str,
        organization_id: &str,
    ) -> Result<Vec<u8>, DataError> {
        let link = self.request_link(relative_path, organization_id).await?;
        tracing::debug!("Downloading {} from {}", relative_path, link);

        let resp = self
            .client
            .get(&link)
            .send()
            .await
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DataError::RequestFailed(format!(
                "Download of {} failed with HTTP {}",
                relative_path,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
