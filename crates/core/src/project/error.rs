use thiserror::Error;

/// # Summary
/// 项目域错误枚举，覆盖 ID 解析、重名冲突、侧车配置损坏等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum ProjectError {
    /// 本地 ID 无法对应到任何项目目录
    #[error("Project with id {0} not found")]
    NotFound(i64),
    /// 目标路径已被占用
    #[error("{0}")]
    Conflict(String),
    /// 侧车配置内容与已知取值不符 (例如未知语言)
    #[error("Invalid project state: {0}")]
    InvalidState(String),
    /// 侧车配置文件读写或解析失败
    #[error("Project config error: {0}")]
    Config(String),
    /// 底层文件系统错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
