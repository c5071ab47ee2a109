//! # `quantdesk-feed` - 远程数据源
//!
//! 提供云端数据库下载客户端，以及把数据文件缓存到本地数据目录的下载器。

pub mod cloud;
pub mod downloader;
pub mod prompt;
