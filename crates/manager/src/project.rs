use chrono::{DateTime, Utc};
use quantdesk_core::common::time::TimeProvider;
use quantdesk_core::project::entity::{
    CreatedProject, Language, ParameterSet, ParameterUpdate, Project, ProjectUpdate,
};
use quantdesk_core::project::error::ProjectError;
use quantdesk_core::project::port::{ProjectConfigStore, ProjectManager, ProjectScaffolder};
use serde_json::{Map, Value};
use std::fs::{self, Metadata};
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{debug, info};

/// # Summary
/// 项目应用服务，本地 `projects/*` 接口的业务门面 (Facade)。
/// 编译期仅依赖 `quantdesk-core` 中的 Trait 定义，所有具体实现通过构造函数注入。
///
/// # Invariants
/// - 不持有任何跨请求的可变状态，磁盘与侧车配置是唯一事实来源。
/// - 并发请求操作同一项目目录时不提供一致性保证。
pub struct ProjectService {
    // 侧车配置访问接口
    config_store: Arc<dyn ProjectConfigStore>,
    // 项目目录管理接口
    projects: Arc<dyn ProjectManager>,
    // 新项目脚手架
    scaffolder: Arc<dyn ProjectScaffolder>,
    // 时钟，用于创建记录的时间戳
    clock: Arc<dyn TimeProvider>,
}

impl ProjectService {
    /// # Summary
    /// 创建 ProjectService 实例。
    ///
    /// # Returns
    /// * `Arc<Self>` - 可共享的服务实例。
    pub fn new(
        config_store: Arc<dyn ProjectConfigStore>,
        projects: Arc<dyn ProjectManager>,
        scaffolder: Arc<dyn ProjectScaffolder>,
        clock: Arc<dyn TimeProvider>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config_store,
            projects,
            scaffolder,
            clock,
        })
    }

    /// # Summary
    /// 读取项目记录。
    ///
    /// # Logic
    /// 1. 指定了 `id` 时只解析这一个项目，找不到返回 NotFound。
    /// 2. 否则枚举根目录下所有带侧车配置的目录并逐一构建记录。
    ///
    /// # Arguments
    /// * `id` - 可选的本地项目 ID。
    ///
    /// # Returns
    /// * `Result<Vec<Project>, ProjectError>` - 列表模式下没有项目时返回空列表。
    pub fn read(&self, id: Option<i64>) -> Result<Vec<Project>, ProjectError> {
        match id {
            Some(id) => {
                let dir = self.projects.find_project_by_id(id)?;
                Ok(vec![self.build_project(&dir)?])
            }
            None => self
                .projects
                .list_project_dirs()?
                .iter()
                .map(|dir| self.build_project(dir))
                .collect(),
        }
    }

    /// # Summary
    /// 对项目执行局部更新。
    ///
    /// # Logic
    /// 1. 写入描述。
    /// 2. 清空或整体替换参数集合。
    /// 3. 重命名：目标已存在则返回 Conflict，否则连同内容整体移动。
    ///    重命名会使目录句柄失效，因此必须最后执行。
    ///
    /// 各步骤不是原子的，重命名失败时前两步的写入不会回滚。
    pub fn update(&self, id: i64, update: ProjectUpdate) -> Result<(), ProjectError> {
        let project_dir = self.projects.find_project_by_id(id)?;

        if let Some(description) = update.description {
            self.config_store
                .set(&project_dir, "description", Value::String(description))?;
        }

        if let Some(parameters) = update.parameters {
            let map = match parameters {
                ParameterUpdate::Clear => Map::new(),
                ParameterUpdate::Replace(params) => params
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            };
            self.config_store
                .set(&project_dir, "parameters", Value::Object(map))?;
        }

        if let Some(name) = update.name {
            let new_dir = self.projects.root_dir().join(name.trim_start_matches('/'));
            if new_dir.exists() {
                return Err(ProjectError::Conflict(format!(
                    "There already exists a project named '{}'",
                    name
                )));
            }

            if let Some(parent) = new_dir.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&project_dir, &new_dir)?;
            info!(
                "Moved project {} from {} to {}",
                id,
                project_dir.display(),
                new_dir.display()
            );
        }

        Ok(())
    }

    /// # Summary
    /// 创建新项目。
    ///
    /// # Logic
    /// 1. 去掉名称开头的 `/`。
    /// 2. 委托脚手架生成目录与模板。
    /// 3. 为新目录分配本地 ID，创建与修改时间均取当前时刻。
    pub fn create(&self, name: &str, language: Language) -> Result<CreatedProject, ProjectError> {
        let name = name.trim_start_matches('/');
        let project_dir = self.scaffolder.create_project(name, language)?;
        let id = self.config_store.get_local_id(&project_dir)?;
        let now = self.clock.now();

        Ok(CreatedProject {
            id,
            name: name.to_string(),
            created: now,
            modified: now,
        })
    }

    /// # Summary
    /// 删除项目目录及其全部内容。
    pub fn delete(&self, id: i64) -> Result<(), ProjectError> {
        let project_dir = self.projects.find_project_by_id(id)?;
        fs::remove_dir_all(&project_dir)?;
        info!("Deleted project {} at {}", id, project_dir.display());
        Ok(())
    }

    /// # Summary
    /// 从目录内容与侧车配置推导项目记录。
    ///
    /// # Logic
    /// 1. 读取本地 ID、描述、参数与语言。
    /// 2. 对同步清单中的每个文件取 stat，清单为空时退化为目录自身的 stat。
    /// 3. modified 取最大 mtime，created 取最小 ctime。
    pub fn build_project(&self, project_dir: &Path) -> Result<Project, ProjectError> {
        let id = self.config_store.get_local_id(project_dir)?;
        let name = relative_name(&self.projects.root_dir(), project_dir)?;

        let language = match self.config_store.get(project_dir, "language")? {
            None => Language::Python,
            Some(Value::String(s)) => Language::from_config_name(&s)?,
            Some(other) => {
                return Err(ProjectError::InvalidState(format!(
                    "Unknown project language '{}'",
                    other
                )));
            }
        };

        let description = match self.config_store.get(project_dir, "description")? {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };

        let parameters = match self.config_store.get(project_dir, "parameters")? {
            Some(Value::Object(map)) => map
                .into_iter()
                .map(|(k, v)| (k, value_to_string(v)))
                .collect(),
            _ => ParameterSet::new(),
        };

        let mut stats = Vec::new();
        for file in self.projects.files_to_sync(project_dir)? {
            stats.push(fs::metadata(&file)?);
        }
        if stats.is_empty() {
            stats.push(fs::metadata(project_dir)?);
        }

        let mut modified: Option<DateTime<Utc>> = None;
        let mut created: Option<DateTime<Utc>> = None;
        for meta in &stats {
            let (c, m) = file_times(meta)?;
            modified = Some(modified.map_or(m, |cur| cur.max(m)));
            created = Some(created.map_or(c, |cur| cur.min(c)));
        }

        debug!("Built project record {} for {}", id, project_dir.display());

        let now = self.clock.now();
        Ok(Project {
            id,
            name,
            language,
            description,
            parameters,
            created: created.unwrap_or(now),
            modified: modified.unwrap_or(now),
        })
    }
}

/// 参数值统一转成字符串，非字符串值使用其 JSON 文本。
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// 项目目录相对根目录的 POSIX 风格路径
fn relative_name(root: &Path, project_dir: &Path) -> Result<String, ProjectError> {
    let relative = project_dir.strip_prefix(root).map_err(|_| {
        ProjectError::InvalidState(format!(
            "{} is not inside {}",
            project_dir.display(),
            root.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

/// # Summary
/// 读取文件的 (创建时间, 修改时间)，均为 UTC。
///
/// # Logic
/// 1. 修改时间取 mtime。
/// 2. Unix 上创建时间取 ctime (inode 状态变更时间)，其余平台取文件创建时间。
pub fn file_times(meta: &Metadata) -> Result<(DateTime<Utc>, DateTime<Utc>), ProjectError> {
    let modified: DateTime<Utc> = meta.modified()?.into();
    Ok((created_time(meta)?, modified))
}

#[cfg(unix)]
fn created_time(meta: &Metadata) -> Result<DateTime<Utc>, ProjectError> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(meta.ctime_nsec()).unwrap_or(0);
    DateTime::from_timestamp(meta.ctime(), nanos).ok_or_else(|| {
        ProjectError::InvalidState(format!("ctime {} out of range", meta.ctime()))
    })
}

#[cfg(not(unix))]
fn created_time(meta: &Metadata) -> Result<DateTime<Utc>, ProjectError> {
    Ok(meta.created()?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let root = PathBuf::from("/work");
        let dir = root.join("team").join("Alpha");
        assert_eq!(relative_name(&root, &dir).unwrap(), "team/Alpha");
    }

    #[test]
    fn test_relative_name_outside_root() {
        let err = relative_name(Path::new("/work"), Path::new("/elsewhere/Alpha")).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidState(_)));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(Value::from("abc")), "abc");
        assert_eq!(value_to_string(Value::from(5)), "5");
        assert_eq!(value_to_string(Value::Bool(true)), "true");
    }
}
