//! 测试替身：内存数据源与脚本化确认器，仅在 `test-utils` 特性下编译。

use crate::data::error::DataError;
use crate::data::port::{DataClient, OverwritePrompt};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 预设响应的远程数据源
#[derive(Default)]
pub struct MockDataClient {
    // 相对路径 -> 文件内容
    files: DashMap<String, Vec<u8>>,
    // 相对路径 -> 错误消息
    failures: DashMap<String, String>,
    // 按调用顺序记录的请求
    requests: Mutex<Vec<(String, String)>>,
}

impl MockDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个可下载的文件
    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }

    /// 预置一个请求失败的文件
    pub fn with_failure(self, path: &str, message: &str) -> Self {
        self.failures.insert(path.to_string(), message.to_string());
        self
    }

    /// 已请求过的相对路径
    pub fn requested_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|(path, _)| path.clone()).collect())
            .unwrap_or_default()
    }

    /// 已请求过的组织 ID
    pub fn requested_organizations(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|(_, org)| org.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataClient for MockDataClient {
    async fn download_file(
        &self,
        relative_path: &str,
        organization_id: &str,
    ) -> Result<Vec<u8>, DataError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((relative_path.to_string(), organization_id.to_string()));
        }

        if let Some(message) = self.failures.get(relative_path) {
            return Err(DataError::RequestFailed(message.clone()));
        }

        self.files
            .get(relative_path)
            .map(|content| content.clone())
            .ok_or_else(|| DataError::RequestFailed("File not found".to_string()))
    }
}

/// 按固定答案回应并统计提问次数的确认器
pub struct ScriptedPrompt {
    answer: bool,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// 被提问的次数
    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl OverwritePrompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> Result<bool, DataError> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}
