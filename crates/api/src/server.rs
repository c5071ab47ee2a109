//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置信封中间件与 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use quantdesk_manager::project::ProjectService;

use crate::middleware::envelope::{envelope_middleware, handle_panic};
use crate::routes::{account, fallback, project};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `project_service` 在服务启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 项目服务 (Facade)
    pub project_service: Arc<ProjectService>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "quantdesk 本地 API",
        version = "0.1.0",
        description = "在本地文件系统上模拟云端 API 的账户与项目接口，仅供本机开发使用。",
        license(name = "MIT")
    ),
    tags(
        (name = "账户 (Account)", description = "占位组织账户"),
        (name = "项目 (Project)", description = "本地项目目录的增删改查")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册固定的接口表并收集 OpenAPI 文档。
/// 2. 挂载未知路径与错误动词的兜底处理。
/// 3. 业务路由与兜底处理外层依次包裹 panic 捕获与信封中间件。
/// 4. 合并 Swagger UI (不经过信封中间件)，最外层挂 CORS 处理预检请求。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(account::read_account))
        .routes(routes!(project::read_projects))
        .routes(routes!(project::update_project))
        .routes(routes!(project::create_project))
        .routes(routes!(project::delete_project))
        .with_state(state)
        .split_for_parts();

    let router = router
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(envelope_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// # Summary
/// 绑定端口并启动本地 API 服务，收到 Ctrl+C 后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"127.0.0.1:5612"`
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let port = listener.local_addr()?.port();

    tracing::info!(
        "The local API server is running on http://localhost:{}/ (press Ctrl+C to quit)",
        port
    );
    tracing::info!("📖 Swagger UI: http://localhost:{}/swagger-ui/", port);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("The local API server has stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
