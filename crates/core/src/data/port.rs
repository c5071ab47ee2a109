use crate::data::error::DataError;
use async_trait::async_trait;

/// # Summary
/// 远程数据文件下载接口 (Port)。
///
/// # Invariants
/// - 失败统一以 `DataError::RequestFailed` 返回，消息保留远端原文。
#[async_trait]
pub trait DataClient: Send + Sync {
    /// # Summary
    /// 下载单个数据文件的原始字节。
    ///
    /// # Arguments
    /// * `relative_path`: 数据目录下的相对路径，如 `equity/usa/daily/spy.zip`。
    /// * `organization_id`: 需要计费的组织 ID。
    ///
    /// # Returns
    /// 成功返回文件内容。
    async fn download_file(
        &self,
        relative_path: &str,
        organization_id: &str,
    ) -> Result<Vec<u8>, DataError>;
}

/// # Summary
/// 覆盖确认交互接口 (Port)。
pub trait OverwritePrompt: Send + Sync {
    /// # Summary
    /// 向用户提出是/否问题，默认答案为否。
    ///
    /// # Returns
    /// 用户同意返回 `true`。
    fn confirm(&self, message: &str) -> Result<bool, DataError>;
}
