use quantdesk_core::data::error::DataError;
use quantdesk_core::data::port::{DataClient, OverwritePrompt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 一次批量下载中的覆盖许可，三态。
///
/// # Invariants
/// - 生命周期仅限一次 `download_files` 调用，由调用方显式传递，不存放在下载器内部。
/// - 一旦用户作答 (Allow / Deny)，该批次剩余文件不再重复询问。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteDecision {
    #[default]
    Unset,
    Allow,
    Deny,
}

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// 已下载并写入本地
    Downloaded,
    /// 本地已存在且不允许覆盖
    Skipped,
    /// 远端不存在该文件，未计费
    Missing,
}

/// 一次批量下载的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub missing: usize,
}

/// # Summary
/// 数据文件下载器，把远端数据文件缓存到本地数据目录。
///
/// # Invariants
/// - 文件按输入顺序串行处理。
/// - "File not found" 只跳过当前文件，其它远端错误立即终止整个批次。
pub struct DataDownloader {
    client: Arc<dyn DataClient>,
    prompt: Arc<dyn OverwritePrompt>,
    data_dir: PathBuf,
}

impl DataDownloader {
    pub fn new(
        client: Arc<dyn DataClient>,
        prompt: Arc<dyn OverwritePrompt>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            prompt,
            data_dir: data_dir.into(),
        }
    }

    /// # Summary
    /// 批量下载数据文件。
    ///
    /// # Logic
    /// 1. 为本批次创建一个未决的覆盖许可。
    /// 2. 逐个文件打印 `[i/n]` 进度并调用 `download_file`。
    /// 3. 任何致命错误立即返回，剩余文件不再处理。
    ///
    /// # Arguments
    /// * `files` - 数据目录下的相对路径列表。
    /// * `overwrite_flag` - 用户是否已通过参数允许覆盖。
    /// * `organization_id` - 计费组织 ID。
    pub async fn download_files(
        &self,
        files: &[String],
        overwrite_flag: bool,
        organization_id: &str,
    ) -> Result<DownloadSummary, DataError> {
        let mut decision = OverwriteDecision::Unset;
        let mut summary = DownloadSummary::default();

        for (index, file) in files.iter().enumerate() {
            info!("[{}/{}] Downloading {}", index + 1, files.len(), file);

            match self
                .download_file(file, overwrite_flag, &mut decision, organization_id)
                .await?
            {
                FileOutcome::Downloaded => summary.downloaded += 1,
                FileOutcome::Skipped => summary.skipped += 1,
                FileOutcome::Missing => summary.missing += 1,
            }
        }

        Ok(summary)
    }

    /// # Summary
    /// 下载单个文件。
    ///
    /// # Logic
    /// 1. 本地已存在且当前不允许覆盖时跳过。
    /// 2. 远端返回 "File not found" 时记录警告并跳过。
    /// 3. 创建父目录并写入文件，覆盖已有内容。
    pub async fn download_file(
        &self,
        relative_file: &str,
        overwrite_flag: bool,
        decision: &mut OverwriteDecision,
        organization_id: &str,
    ) -> Result<FileOutcome, DataError> {
        let local_path = self.data_dir.join(relative_file);

        if local_path.exists() && !self.should_overwrite(overwrite_flag, decision, &local_path)? {
            return Ok(FileOutcome::Skipped);
        }

        let content = match self.client.download_file(relative_file, organization_id).await {
            Ok(content) => content,
            Err(e) if e.is_file_not_found() => {
                warn!(
                    "{} does not exist in the data library\nYou have not been billed for this file",
                    relative_file
                );
                return Ok(FileOutcome::Missing);
            }
            Err(e) => return Err(e),
        };

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&local_path, content).await?;

        Ok(FileOutcome::Downloaded)
    }

    /// # Summary
    /// 判断是否允许覆盖已存在的文件。
    ///
    /// # Logic
    /// 1. 参数已允许或本批次已同意时直接放行。
    /// 2. 否则提示文件已存在；许可未决时询问一次并记住答案。
    fn should_overwrite(
        &self,
        overwrite_flag: bool,
        decision: &mut OverwriteDecision,
        path: &Path,
    ) -> Result<bool, DataError> {
        if overwrite_flag || *decision == OverwriteDecision::Allow {
            return Ok(true);
        }

        warn!("{} already exists, use --overwrite to overwrite it", path.display());

        if *decision == OverwriteDecision::Unset {
            let answer = self.prompt.confirm(
                "Do you want to temporarily enable overwriting for the previously selected products?",
            )?;
            *decision = if answer {
                OverwriteDecision::Allow
            } else {
                OverwriteDecision::Deny
            };
        }

        Ok(*decision == OverwriteDecision::Allow)
    }
}
