use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::project::error::ProjectError;

/// # Summary
/// 项目支持的编程语言，闭合集合。
///
/// # Invariants
/// - 侧车配置中以变体名 (`Python` / `CSharp`) 存储，不接受其它写法。
/// - 对外 JSON 以云端缩写 (`Py` / `C#`) 表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Language {
    #[serde(rename = "Py")]
    Python,
    #[serde(rename = "C#")]
    CSharp,
}

impl Language {
    /// 侧车配置中保存的变体名
    pub fn config_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::CSharp => "CSharp",
        }
    }

    /// # Summary
    /// 解析创建接口中的二值语言选择器。
    ///
    /// # Logic
    /// 1. `"Py"` 映射为 Python。
    /// 2. 其余任意取值映射为 C#。
    pub fn from_selector(selector: &str) -> Self {
        if selector == "Py" {
            Language::Python
        } else {
            Language::CSharp
        }
    }

    /// # Summary
    /// 按变体名精确解析侧车中的语言字段。
    ///
    /// # Returns
    /// 无法匹配时返回 `ProjectError::InvalidState`，不做任何默认回退。
    pub fn from_config_name(name: &str) -> Result<Self, ProjectError> {
        match name {
            "Python" => Ok(Language::Python),
            "CSharp" => Ok(Language::CSharp),
            other => Err(ProjectError::InvalidState(format!(
                "Unknown project language '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.config_name())
    }
}

/// # Summary
/// 本地项目聚合，从目录内容与侧车配置推导而来。
///
/// # Invariants
/// - `id` 在工作区根目录内唯一，目录被删除前保持不变。
/// - `name` 是相对于根目录的 POSIX 风格路径，同时作为显示名。
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub language: Language,
    pub description: String,
    pub parameters: ParameterSet,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// # Summary
/// 项目参数集合，按首次写入的顺序保存。
///
/// # Invariants
/// - 键唯一；重复写入同一键时覆盖取值，但保留其原有位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// # Summary
/// 创建项目后返回的精简记录。
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedProject {
    pub id: i64,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// 参数集合的更新方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterUpdate {
    /// 清空所有参数
    Clear,
    /// 以给定集合整体替换
    Replace(ParameterSet),
}

/// # Summary
/// 项目局部更新请求，每个字段独立生效。
///
/// # Invariants
/// - 执行顺序固定为 description -> parameters -> name (重命名必须最后执行)。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub description: Option<String>,
    pub parameters: Option<ParameterUpdate>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_config_name_is_exact() {
        assert_eq!(Language::from_config_name("Python").unwrap(), Language::Python);
        assert_eq!(Language::from_config_name("CSharp").unwrap(), Language::CSharp);
        assert!(matches!(
            Language::from_config_name("python"),
            Err(ProjectError::InvalidState(_))
        ));
        assert!(matches!(
            Language::from_config_name("FSharp"),
            Err(ProjectError::InvalidState(_))
        ));
    }

    #[test]
    fn test_language_selector() {
        assert_eq!(Language::from_selector("Py"), Language::Python);
        assert_eq!(Language::from_selector("C#"), Language::CSharp);
        assert_eq!(Language::from_selector("anything"), Language::CSharp);
    }

    #[test]
    fn test_parameter_set_keeps_insertion_order() {
        let mut params = ParameterSet::new();
        params.insert("z", "1");
        params.insert("a", "2");
        params.insert("z", "3");

        let entries: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(entries, vec![("z", "3"), ("a", "2")]);
        assert_eq!(params.get("z"), Some("3"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_language_serializes_as_api_code() {
        assert_eq!(serde_json::to_string(&Language::Python).unwrap(), "\"Py\"");
        assert_eq!(serde_json::to_string(&Language::CSharp).unwrap(), "\"C#\"");
    }
}
