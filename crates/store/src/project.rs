use quantdesk_core::project::error::ProjectError;
use quantdesk_core::project::port::{PROJECT_CONFIG_FILE_NAME, ProjectConfigStore, ProjectManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// 同步组件会上传的源文件扩展名
const SYNCED_EXTENSIONS: &[&str] = &["py", "cs", "ipynb"];

/// 编译产物目录，不参与同步
const BUILD_OUTPUT_DIRS: &[&str] = &["bin", "obj"];

/// # Summary
/// ProjectManager 的文件系统实现。
///
/// # Invariants
/// * 项目 = 根目录下任意层级中包含 `config.json` 的目录。
/// * 枚举项目时不跳过隐藏目录，只有同步清单会跳过。
pub struct FsProjectManager {
    root: PathBuf,
    config_store: Arc<dyn ProjectConfigStore>,
}

impl FsProjectManager {
    /// # Summary
    /// 创建新的 FsProjectManager。
    ///
    /// # Arguments
    /// * `root` - 工作区根目录。
    /// * `config_store` - 侧车配置访问实现，用于读取本地 ID。
    pub fn new(root: impl Into<PathBuf>, config_store: Arc<dyn ProjectConfigStore>) -> Self {
        Self {
            root: root.into(),
            config_store,
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_build_output(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| BUILD_OUTPUT_DIRS.contains(&name))
            .unwrap_or(false)
}

fn has_synced_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SYNCED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

impl ProjectManager for FsProjectManager {
    fn root_dir(&self) -> PathBuf {
        self.root.clone()
    }

    fn list_project_dirs(&self) -> Result<Vec<PathBuf>, ProjectError> {
        if !self.root.is_dir() {
            return Ok(vec![]);
        }

        let mut dirs = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|e| ProjectError::Io(e.into()))?;
            if entry.file_type().is_file() && entry.file_name() == PROJECT_CONFIG_FILE_NAME {
                if let Some(parent) = entry.path().parent() {
                    // 根目录自身的 config.json 不算项目
                    if parent != self.root {
                        dirs.push(parent.to_path_buf());
                    }
                }
            }
        }

        dirs.sort();
        Ok(dirs)
    }

    fn find_project_by_id(&self, id: i64) -> Result<PathBuf, ProjectError> {
        for dir in self.list_project_dirs()? {
            if self.config_store.get_local_id(&dir)? == id {
                return Ok(dir);
            }
        }

        tracing::debug!("No project with local id {} under {}", id, self.root.display());
        Err(ProjectError::NotFound(id))
    }

    fn files_to_sync(&self, project_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(project_dir)
            .into_iter()
            .filter_entry(|e| !is_hidden(e) && !is_build_output(e))
        {
            let entry = entry.map_err(|e| ProjectError::Io(e.into()))?;
            if entry.file_type().is_file() && has_synced_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}
