use crate::project::entity::Language;
use crate::project::error::ProjectError;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// 每个项目目录下侧车配置文件的文件名
pub const PROJECT_CONFIG_FILE_NAME: &str = "config.json";

/// # Summary
/// 项目侧车配置访问接口 (Port)。
///
/// # Invariants
/// - 每个项目目录对应且仅对应一份侧车配置，以目录路径为键。
/// - 本地 ID 一经分配即写回侧车，目录删除前保持不变。
pub trait ProjectConfigStore: Send + Sync {
    /// # Summary
    /// 读取侧车中的某个键。
    ///
    /// # Arguments
    /// * `project_dir`: 项目目录。
    /// * `key`: 配置键，如 `description`、`parameters`、`language`。
    ///
    /// # Returns
    /// 键存在返回 `Some(Value)`，否则返回 `None`。
    fn get(&self, project_dir: &Path, key: &str) -> Result<Option<Value>, ProjectError>;

    /// # Summary
    /// 写入侧车中的某个键，覆盖旧值并立即持久化。
    ///
    /// # Arguments
    /// * `project_dir`: 项目目录。
    /// * `key`: 配置键。
    /// * `value`: 字符串或嵌套对象。
    fn set(&self, project_dir: &Path, key: &str, value: Value) -> Result<(), ProjectError>;

    /// # Summary
    /// 获取目录的本地整数 ID。
    ///
    /// # Logic
    /// 1. 侧车中已有 ID 时直接返回。
    /// 2. 否则分配一个新 ID 并写回侧车。
    fn get_local_id(&self, project_dir: &Path) -> Result<i64, ProjectError>;
}

/// # Summary
/// 工作区项目目录管理接口 (Port)，负责根目录解析、项目枚举与文件同步清单。
pub trait ProjectManager: Send + Sync {
    /// 工作区根目录
    fn root_dir(&self) -> PathBuf;

    /// # Summary
    /// 枚举根目录下所有包含侧车配置的目录。
    ///
    /// # Returns
    /// 按路径排序的目录列表，没有项目时返回空列表。
    fn list_project_dirs(&self) -> Result<Vec<PathBuf>, ProjectError>;

    /// # Summary
    /// 根据本地 ID 定位项目目录。
    ///
    /// # Returns
    /// 找不到时返回 `ProjectError::NotFound`。
    fn find_project_by_id(&self, id: i64) -> Result<PathBuf, ProjectError>;

    /// # Summary
    /// 列出同步组件会上传的项目文件。
    ///
    /// # Arguments
    /// * `project_dir`: 项目目录。
    fn files_to_sync(&self, project_dir: &Path) -> Result<Vec<PathBuf>, ProjectError>;
}

/// # Summary
/// 新项目脚手架接口 (Port)，生成目录、模板文件与初始侧车配置。
pub trait ProjectScaffolder: Send + Sync {
    /// # Summary
    /// 在根目录下按名称创建项目。
    ///
    /// # Arguments
    /// * `name`: 相对于根目录的项目路径。
    /// * `language`: 项目语言。
    ///
    /// # Returns
    /// 成功返回新项目目录；目录已存在时返回 `ProjectError::Conflict`。
    fn create_project(&self, name: &str, language: Language) -> Result<PathBuf, ProjectError>;
}
