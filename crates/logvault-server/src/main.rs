use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use logvault_server::{AppState, ServerConfig, router, session::SessionKey};
use logvault_store_sqlite::SqliteStore;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Parser)]
#[command(name = "logvault", about = "Session-authenticated log file vault")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config: ServerConfig = config::Config::builder()
    .add_source(config::File::from(cli.config.as_path()))
    .add_source(config::Environment::with_prefix("LOGVAULT"))
    .build()
    .and_then(|c| c.try_deserialize())
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let secret = hex::decode(&config.session_secret)
    .context("session_secret is not valid hex")?;
  anyhow::ensure!(
    secret.len() >= 32,
    "session_secret must be at least 32 bytes (64 hex characters)"
  );

  let store = SqliteStore::open(&config.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  let state = AppState::new(store, SessionKey::new(secret));

  let addr = format!("{}:{}", config.host, config.port);
  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .with_context(|| format!("failed to bind {addr}"))?;
  tracing::info!(%addr, "listening");

  axum::serve(listener, router(state)).await?;
  Ok(())
}
