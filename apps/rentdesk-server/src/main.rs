use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use apikit::HttpLayers;
use axum::Router;
use clap::{Parser, Subcommand};
use db::{ConnectOpts, DbHandle};
use mimalloc::MiMalloc;
use rentals::config::RentalsConfig;
use rentals::RentalsModule;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// RentDesk Server - customer and rental records over HTTP
#[derive(Parser)]
#[command(name = "rentdesk-server")]
#[command(about = "RentDesk Server - customer and rental records over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use a private in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("RentDesk Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
        Commands::Migrate => migrate(config).await,
    }
}

async fn connect(config: &AppConfig) -> Result<DbHandle> {
    let db_config = config
        .database
        .clone()
        .context("no database section in configuration")?;
    let dsn = db_config.resolved_url(&config.home_dir());
    if dsn.trim().is_empty() {
        anyhow::bail!("Database URL not configured");
    }

    let opts = connect_opts(&db_config);
    let db = DbHandle::connect(&dsn, opts)
        .await
        .with_context(|| format!("cannot connect to {}", db::redact_credentials_in_dsn(Some(&dsn))))?;
    tracing::info!(engine = ?db.engine(), "database connected");
    Ok(db)
}

fn connect_opts(cfg: &DatabaseConfig) -> ConnectOpts {
    let defaults = ConnectOpts::default();
    ConnectOpts {
        max_conns: cfg.max_conns.or(defaults.max_conns),
        acquire_timeout: Some(Duration::from_secs(5)),
        busy_timeout: cfg
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms)))
            .unwrap_or(defaults.busy_timeout),
        ..defaults
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    let rentals_cfg: RentalsConfig = config.module_config(RentalsModule::NAME)?;
    let db = connect(&config).await?;
    let module = RentalsModule::init(&db, &rentals_cfg).await?;

    let api = module.register_rest(Router::new()).merge(apikit::health::router());
    let app = HttpLayers::default()
        .with_timeout_secs(config.server.timeout_sec)
        .apply(api);

    let host = config.server.host.as_str();
    let listener = tokio::net::TcpListener::bind((host, config.server.port))
        .await
        .with_context(|| format!("cannot bind {host}:{}", config.server.port))?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(apikit::wait_for_shutdown())
        .await
        .context("HTTP server failed")?;

    db.close().await;
    tracing::info!("RentDesk Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: RentalsConfig = config.module_config(RentalsModule::NAME)?;
    if let Some(db) = &config.database {
        db::DbHandle::detect(&db.resolved_url(&config.home_dir()))?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn migrate(config: AppConfig) -> Result<()> {
    let db = connect(&config).await?;
    rentals::module::migrate(&db.sea()).await?;
    db.close().await;
    println!("Migrations applied");
    Ok(())
}
