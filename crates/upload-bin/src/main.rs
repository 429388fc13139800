use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use upload_core::config::ClientConfig;
use upload_core::render;
use upload_core::{ApiStyle, FileBackend, FileRegistryClient, FileUpload, HttpBackend};

mod shell;

#[derive(Parser, Debug)]
#[command(name = "file-upload-client")]
#[command(about = "Upload, list and delete files on a file-upload service")]
#[command(version)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8000)
    #[arg(long, env = "BACKEND_API_URL", global = true)]
    backend_url: Option<String>,

    /// Endpoint layout the backend exposes (legacy or rest)
    #[arg(long, env = "BACKEND_API_STYLE", global = true)]
    api_style: Option<ApiStyle>,

    /// Path to config file
    #[arg(long, env = "UPLOAD_CLIENT_CONFIG_PATH", global = true)]
    config_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "UPLOAD_CLIENT_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the files currently on the server
    List,
    /// Upload one file, then show the refreshed list
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Delete a file by its server name, then show the refreshed list
    Delete {
        /// Name as shown by `list`
        filename: String,
    },
    /// Write the resolved settings to the config file
    Init,
    /// Interactive session (default)
    Shell,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("file-upload-client v{} starting", env!("CARGO_PKG_VERSION"));

    // Load config, read once for the whole session
    let config_path = cli
        .config_path
        .clone()
        .unwrap_or_else(ClientConfig::default_path);

    info!("reading config from {}", config_path.display());
    let mut config = ClientConfig::load_or_default(&config_path)?;
    config.apply_overrides(cli.backend_url, cli.api_style);

    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Shell);
    if let Commands::Init = command {
        config.save(&config_path)?;
        println!("config saved to {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let backend = HttpBackend::from_config(&config).context("failed to set up backend client")?;
    info!(
        "using backend {} ({:?} endpoints)",
        config.backend_url, config.api_style
    );
    let mut client = FileRegistryClient::new(backend);

    // Initial load, like a view being mounted
    client.list().await;

    match command {
        Commands::List | Commands::Init => {}
        Commands::Upload { path } => upload_path(&mut client, &path).await,
        Commands::Delete { filename } => client.delete(&filename).await,
        Commands::Shell => return shell::run(client).await,
    }

    print!(
        "{}",
        render::render_view(client.registry(), client.feedback())
    );

    if client.feedback().is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Read a local file and upload it; a read failure is reported like a failed upload
pub(crate) async fn upload_path<B: FileBackend>(client: &mut FileRegistryClient<B>, path: &Path) {
    let file = FileUpload::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()));

    match file {
        Ok(file) => client.upload(file).await,
        Err(e) => {
            warn!("{:#}", e);
            client.report_error(format!("Upload failed: {:#}", e));
        }
    }
}
