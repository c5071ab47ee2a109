use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub cloud: CloudConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 本地工作区目录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// 所有本地项目所在的根目录
    pub root_dir: String,
    /// 数据文件缓存目录，相对路径以 `root_dir` 为基准
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    pub api_url: String,
    /// 下载数据时默认计费的组织 ID
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    /// 若设置则额外按天滚动写入该目录
    pub dir: Option<String>,
}

impl WorkspaceConfig {
    /// 工作区根目录
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// 解析数据目录，相对路径挂在根目录之下。
    pub fn data_path(&self) -> PathBuf {
        let data = Path::new(&self.data_dir);
        if data.is_absolute() {
            data.to_path_buf()
        } else {
            self.root_path().join(data)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5612,
            },
            workspace: WorkspaceConfig {
                root_dir: ".".to_string(),
                data_dir: "data".to_string(),
            },
            cloud: CloudConfig {
                api_url: "https://www.quantconnect.com/api/v2".to_string(),
                organization_id: None,
            },
            log: LogConfig {
                level: "info".to_string(),
                dir: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5612);
        assert_eq!(config.workspace.root_dir, ".");
        assert_eq!(config.log.level, "info");
        assert!(config.cloud.organization_id.is_none());
    }

    #[test]
    fn test_data_path_resolution() {
        let mut workspace = AppConfig::default().workspace;
        workspace.root_dir = "/tmp/lean".to_string();
        assert_eq!(workspace.data_path(), PathBuf::from("/tmp/lean/data"));

        workspace.data_dir = "/srv/market-data".to_string();
        assert_eq!(workspace.data_path(), PathBuf::from("/srv/market-data"));
    }
}
