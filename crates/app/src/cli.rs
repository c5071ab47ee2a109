use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quantdesk")]
#[command(about = "Local API server and data downloader for quant projects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the local API server that emulates the cloud project endpoints
    Api(ApiArgs),

    /// Download data files from the cloud data library into the local data directory
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct ApiArgs {
    /// Port to listen on (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Overwrite files that already exist locally without asking
    #[arg(long)]
    pub overwrite: bool,

    /// Organization billed for the downloads (overrides cloud.organization_id)
    #[arg(long)]
    pub organization: Option<String>,

    /// Data files to download, relative to the data directory
    #[arg(required = true)]
    pub files: Vec<String>,
}
