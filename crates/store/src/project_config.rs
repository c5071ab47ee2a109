use quantdesk_core::project::error::ProjectError;
use quantdesk_core::project::port::{PROJECT_CONFIG_FILE_NAME, ProjectConfigStore};
use rand::Rng;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// 侧车中保存本地 ID 的键
pub const LOCAL_ID_KEY: &str = "local-id";

/// 本地 ID 的取值区间 (9 位整数)
const LOCAL_ID_RANGE: std::ops::RangeInclusive<i64> = 100_000_000..=999_999_999;

/// # Summary
/// ProjectConfigStore 的 JSON 文件实现。
///
/// # Invariants
/// * 每个项目目录下的 `config.json` 是一个 JSON 对象。
/// * 每次写入都完整重写文件，不做缓存，多个请求之间不共享状态。
#[derive(Debug, Default, Clone)]
pub struct JsonProjectConfigStore;

impl JsonProjectConfigStore {
    pub fn new() -> Self {
        Self
    }

    fn config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE_NAME)
    }

    /// # Summary
    /// 读取完整侧车对象。
    ///
    /// # Logic
    /// 1. 文件不存在时视为空对象。
    /// 2. 内容不是 JSON 对象时返回 `ProjectError::Config`。
    fn read_config(&self, project_dir: &Path) -> Result<Map<String, Value>, ProjectError> {
        let path = Self::config_path(project_dir);
        if !path.is_file() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ProjectError::Config(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
            Err(e) => Err(ProjectError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    fn write_config(&self, project_dir: &Path, config: &Map<String, Value>) -> Result<(), ProjectError> {
        let path = Self::config_path(project_dir);
        let raw = serde_json::to_string_pretty(config)
            .map_err(|e| ProjectError::Config(e.to_string()))?;
        fs::write(path, raw + "\n")?;
        Ok(())
    }
}

impl ProjectConfigStore for JsonProjectConfigStore {
    fn get(&self, project_dir: &Path, key: &str) -> Result<Option<Value>, ProjectError> {
        let mut config = self.read_config(project_dir)?;
        Ok(config.remove(key))
    }

    fn set(&self, project_dir: &Path, key: &str, value: Value) -> Result<(), ProjectError> {
        let mut config = self.read_config(project_dir)?;
        config.insert(key.to_string(), value);
        self.write_config(project_dir, &config)
    }

    fn get_local_id(&self, project_dir: &Path) -> Result<i64, ProjectError> {
        let mut config = self.read_config(project_dir)?;

        if let Some(id) = config.get(LOCAL_ID_KEY).and_then(Value::as_i64) {
            return Ok(id);
        }

        let id = rand::thread_rng().gen_range(LOCAL_ID_RANGE);
        config.insert(LOCAL_ID_KEY.to_string(), Value::from(id));
        self.write_config(project_dir, &config)?;

        tracing::debug!("Assigned local id {} to {}", id, project_dir.display());
        Ok(id)
    }
}
