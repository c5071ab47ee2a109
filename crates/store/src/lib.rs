//! # `quantdesk-store` - 本地文件系统适配层
//!
//! 为 `quantdesk-core` 中的项目端口提供基于目录与 `config.json` 侧车文件的实现。

pub mod project;
pub mod project_config;
pub mod scaffold;
