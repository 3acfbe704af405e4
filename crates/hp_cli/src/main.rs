use anyhow::Context;
use clap::Parser;
use hp_core::logging::{self, LogConfig};
use hp_web::AppState;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Serve a pre-trained house price model over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "HP_HOST", default_value = "127.0.0.1")]
    host: IpAddr,
    #[arg(long, env = "HP_PORT", default_value_t = 5000)]
    port: u16,
    /// Model artifact loaded once at startup
    #[arg(long, env = "HP_MODEL_PATH", default_value = "house_price_model.json")]
    model_path: PathBuf,
    #[arg(long, env = "HP_LOG_FILE", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    /// Rotate the log file once it reaches this size (0 disables rotation)
    #[arg(long, env = "HP_LOG_MAX_BYTES", default_value_t = logging::DEFAULT_MAX_BYTES)]
    log_max_bytes: u64,
    /// Number of rotated log files to keep
    #[arg(long, env = "HP_LOG_BACKUPS", default_value_t = logging::DEFAULT_BACKUPS)]
    log_backups: usize,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "HP_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        LogConfig {
            file: self.log_file.clone(),
            max_bytes: self.log_max_bytes,
            backups: self.log_backups,
            level: self.log_level.clone(),
        }
    }

    fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let model = hp_inference::load_model(&cli.model_path)
        .map_err(|e| anyhow::anyhow!(e.report()))
        .context("cannot start without a model")?;
    info!("🧠 Model ready: {} ({} features)", model.name(), model.n_features());

    hp_web::serve(cli.addr(), AppState::new(model)).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log_config()) {
        eprintln!("Failed to initialize logging: {}", e.report());
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
