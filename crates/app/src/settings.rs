use config::{Config, ConfigError, Environment, File};
use quantdesk_core::config::AppConfig;
use std::path::Path;

/// 工作目录下的可选配置文件
pub const CONFIG_FILE_NAME: &str = "quantdesk.toml";

/// 环境变量前缀，如 `QUANTDESK__SERVER__PORT=8080`
const ENV_PREFIX: &str = "QUANTDESK";

/// # Summary
/// 按层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 叠加可选的 TOML 配置文件 (不存在时忽略)。
/// 3. 叠加 `QUANTDESK__SECTION__KEY` 形式的环境变量。
pub fn load_config(file: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
