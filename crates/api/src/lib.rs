//! # `quantdesk-api` - 本地 API 服务
//!
//! 在开发者本地文件系统之上模拟云端 REST API 的一个子集 (账户信息与项目增删改查)。
//! 使用 `axum` 构建路由，通过 `utoipa` 生成 OpenAPI 文档。
//!
//! ## 架构职责
//! - 接收命令行工具发往 `localhost` 的请求，按动词统一解析入参
//! - 调用下层 `ProjectService` 完成业务操作
//! - 为每个响应注入 `success` 字段与 CORS 头，错误统一转换为 `{errors, success:false}` 信封

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;
