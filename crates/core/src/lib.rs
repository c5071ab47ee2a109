//! # `quantdesk-core` - 领域模型与端口定义
//!
//! 本 crate 不做任何 I/O，只描述本地 API 模拟层所需的实体、错误与 Trait 契约。
//! 具体的文件系统实现位于 `quantdesk-store`，远程数据客户端位于 `quantdesk-feed`。

pub mod account;
pub mod common;
pub mod config;
pub mod data;
pub mod project;

#[cfg(feature = "test-utils")]
pub mod test_utils;
