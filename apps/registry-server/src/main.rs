use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Router};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::http::request_id::{create_trace_layer, header, push_req_id_to_extensions, MakeReqId};
use runtime::{AppConfig, CliArgs, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use users::config::UsersConfig;
use users::infra::storage::{MongoStore, StoreSettings};
use users::UsersModule;

mod web;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USERS_MODULE: &str = "users";
const DEFAULT_TIMEOUT_SEC: u64 = 30;
const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// User Registry Server - user registration REST API
#[derive(Parser)]
#[command(name = "registry-server")]
#[command(about = "User Registry Server - user registration REST API")]
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

    /// Use an in-memory user store instead of MongoDB
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
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("User Registry Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

fn users_module(config: &AppConfig, args: &CliArgs) -> Result<UsersModule> {
    let users_cfg = UsersConfig::from_module_value(config.modules.get(USERS_MODULE))
        .context("Invalid modules.users configuration")?;

    if args.mock {
        tracing::warn!("Running with in-memory user store (--mock)");
        return Ok(UsersModule::in_memory(users_cfg));
    }

    let db = config.database.clone().unwrap_or_default();
    if db.url.is_none() {
        tracing::warn!("No database URL configured; store operations will fail");
    }
    let settings = StoreSettings {
        url: db.url,
        server_selection_timeout: Duration::from_millis(
            db.server_selection_timeout_ms
                .unwrap_or(DEFAULT_SERVER_SELECTION_TIMEOUT_MS),
        ),
    };

    // One store handle for the whole process; it connects on first use.
    let store = Arc::new(MongoStore::new(settings));
    Ok(UsersModule::with_mongo(store, users_cfg))
}

fn build_router(server: &ServerConfig, users: &UsersModule) -> Router {
    let x_request_id = header();
    let timeout_sec = if server.timeout_sec == 0 {
        DEFAULT_TIMEOUT_SEC
    } else {
        server.timeout_sec
    };

    let mut router = Router::new().route("/health", get(web::health_check));
    router = users.register_rest(router);

    // Later layers wrap earlier ones: the request id exists before tracing reads it.
    router = router
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_sec)))
        .layer(from_fn(push_req_id_to_extensions))
        .layer(create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeReqId));

    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let users = users_module(&config, &args)?;
    let router = build_router(&config.server, &users);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::error!("Shutdown signal handler failed: {}", e);
        }
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    UsersConfig::from_module_value(config.modules.get(USERS_MODULE))
        .context("Invalid modules.users configuration")?;

    // AppConfig::load_* already normalized & created home_dir
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
