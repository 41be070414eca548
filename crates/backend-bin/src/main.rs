use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use gatehouse_backend_lib::{
    config::Settings, router::create_router, rules, store::FlatFileStore, AppState,
};

/// Session and auth server fronting per-project document stores
#[derive(Parser, Debug)]
#[command(name = "gatehouse", version)]
struct Args {
    /// Configuration file; defaults to config.{toml,yaml,json} in the
    /// working directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server port to bind to
    #[arg(short, long)]
    port: Option<u16>,

    /// Rules document to load
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Name of the project database to serve
    #[arg(long = "db")]
    db_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(port) = args.port {
        settings.bind_addr.set_port(port);
    }
    if let Some(rules_file) = args.rules {
        settings.rules_file = Some(rules_file);
    }
    if let Some(db_name) = args.db_name {
        settings.db_name = db_name;
    }
    settings.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // the server must not come up without its rules or signing key
    let rules_path = settings.rules_path();
    let rules = rules::load_rules(&rules_path)
        .with_context(|| format!("rules file: {}", rules_path.display()))?;

    let store = FlatFileStore::new(&settings.data_dir)?;

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(store, settings, rules)?);
    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
