use thiserror::Error;

/// 远端返回此消息时表示数据文件在数据库中不存在
pub const FILE_NOT_FOUND_MESSAGE: &str = "File not found";

/// # Summary
/// 数据下载域错误枚举。
///
/// # Invariants
/// - `RequestFailed` 保留远端原始错误消息，用于区分 "File not found" 子场景。
#[derive(Error, Debug)]
pub enum DataError {
    /// 远端请求失败
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// 交互式确认失败 (例如终端不可用)
    #[error("Prompt error: {0}")]
    Prompt(String),
    /// 本地写入失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// 是否为可跳过的 "文件不存在" 错误
    pub fn is_file_not_found(&self) -> bool {
        match self {
            DataError::RequestFailed(msg) => msg.contains(FILE_NOT_FOUND_MESSAGE),
            _ => false,
        }
    }
}
