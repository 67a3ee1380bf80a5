//! CLI for the Tether service bootstrap.

mod context;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tether_db::{ServiceClient, ServiceConfig, SupabaseFactory};
use tether_telemetry::{init_logging, DeployMode, Logger, Payload};
use tracing::{debug, warn};

use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Hosted database client bootstrap and leveled logging")]
struct Cli {
    /// Diagnostic log filter (defaults to RUST_LOG, then "info")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve credentials and build the client
    Check,
    /// Query the auth health endpoint
    Health,
    /// Select rows from a table and print them as JSON lines
    Select {
        /// Table or view name
        #[arg(long)]
        table: String,

        /// Column list
        #[arg(long, default_value = "*")]
        columns: String,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Write one line through the leveled logger
    Log {
        #[arg(long, value_enum, default_value = "info")]
        level: LogLevel,

        #[arg(long)]
        message: String,

        /// Optional JSON payload
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Info,
    Warn,
    Debug,
    Error,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }
    init_logging(cli.log_level.as_deref())?;

    let mode = DeployMode::detect();
    let logger = Logger::console(mode);
    debug!("Deploy mode: {}", mode.as_str());

    if let Commands::Log { level, message, data } = &cli.command {
        emit(&logger, *level, message, data.as_deref());
        return Ok(());
    }

    let ctx = AppContext::init(ServiceConfig::from_env(), &SupabaseFactory, logger)?;

    match cli.command {
        Commands::Check => check(&ctx),
        Commands::Health => health(&ctx).await,
        Commands::Select {
            table,
            columns,
            limit,
        } => select(&ctx, &table, &columns, limit).await?,
        Commands::Log { .. } => {}
    }

    Ok(())
}

fn emit(logger: &Logger, level: LogLevel, message: &str, data: Option<&str>) {
    let payload = match data {
        None => Payload::Absent,
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => Payload::Value(value),
            Err(e) => {
                warn!("--data is not JSON ({}), logging it as text", e);
                Payload::from(raw)
            }
        },
    };

    match level {
        LogLevel::Info => logger.info(message, payload),
        LogLevel::Warn => logger.warn(message, payload),
        LogLevel::Debug => logger.debug(message, payload),
        LogLevel::Error => logger.error(message, payload),
    }
}

fn check(ctx: &Arc<AppContext<ServiceClient>>) {
    ctx.logger.info(
        "Service client ready",
        serde_json::json!({
            "url": ctx.config.url(),
            "key": ctx.config.masked_key(),
            "mode": ctx.mode().as_str(),
        }),
    );
}

async fn health(ctx: &Arc<AppContext<ServiceClient>>) {
    match ctx.client.health().await {
        Ok(true) => ctx.logger.info("Auth service healthy", ()),
        Ok(false) => ctx.logger.warn("Auth service unhealthy", ctx.client.base_url()),
        Err(e) => ctx.logger.error("Auth health check failed", anyhow::Error::from(e)),
    }
}

async fn select(
    ctx: &Arc<AppContext<ServiceClient>>,
    table: &str,
    columns: &str,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let rows: Vec<Value> = ctx.client.select(table, columns, limit).await?;
    for row in &rows {
        println!("{}", row);
    }
    ctx.logger.debug(&format!("Selected {} rows from {}", rows.len(), table), ());
    Ok(())
}
