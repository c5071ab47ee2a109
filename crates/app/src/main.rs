mod cli;
mod logging;
mod settings;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use quantdesk_api::server::{AppState, start_server};
use quantdesk_core::common::time::RealTimeProvider;
use quantdesk_core::config::AppConfig;
use quantdesk_core::project::port::ProjectConfigStore;
use quantdesk_feed::cloud::CloudDataClient;
use quantdesk_feed::downloader::DataDownloader;
use quantdesk_feed::prompt::TerminalPrompt;
use quantdesk_manager::project::ProjectService;
use quantdesk_store::project::FsProjectManager;
use quantdesk_store::project_config::JsonProjectConfigStore;
use quantdesk_store::scaffold::TemplateScaffolder;
use tracing::info;

use crate::cli::{ApiArgs, Cli, Commands, DownloadArgs};

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到应用服务。
///
/// # Logic
/// 1. 解析命令行。
/// 2. 加载分层配置并初始化全局日志。
/// 3. 按子命令组装依赖并运行。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = settings::load_config(Path::new(settings::CONFIG_FILE_NAME))?;
    let _log_guard = logging::init(&config.log)?;

    match cli.command {
        Commands::Api(args) => run_api(config, args).await,
        Commands::Download(args) => run_download(config, args).await,
    }
}

/// 组装项目服务并启动本地 API 服务，阻塞直到 Ctrl+C。
async fn run_api(config: AppConfig, args: ApiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let root = config.workspace.root_path();
    info!("Serving projects under {}", root.display());

    // 1. 实例化基础设施层
    let config_store: Arc<dyn ProjectConfigStore> = Arc::new(JsonProjectConfigStore::new());
    let projects = Arc::new(FsProjectManager::new(&root, config_store.clone()));
    let scaffolder = Arc::new(TemplateScaffolder::new(&root, config_store.clone()));

    // 2. 构造应用服务层（注入 Core Trait 抽象）
    let project_service =
        ProjectService::new(config_store, projects, scaffolder, Arc::new(RealTimeProvider));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    start_server(AppState { project_service }, &bind_addr).await
}

/// 下载数据文件到本地数据目录，远端错误会终止剩余下载。
async fn run_download(
    config: AppConfig,
    args: DownloadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let organization_id = args
        .organization
        .or(config.cloud.organization_id)
        .ok_or("No organization given, pass --organization or set cloud.organization_id")?;

    let client = Arc::new(CloudDataClient::new(config.cloud.api_url.as_str())?);
    let downloader = DataDownloader::new(
        client,
        Arc::new(TerminalPrompt),
        config.workspace.data_path(),
    );

    let summary = downloader
        .download_files(&args.files, args.overwrite, &organization_id)
        .await?;

    info!(
        "Done: {} downloaded, {} skipped, {} not found",
        summary.downloaded, summary.skipped, summary.missing
    );
    Ok(())
}
