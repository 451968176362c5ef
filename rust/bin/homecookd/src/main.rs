//! `homecookd`: the HomeCook server binary.
//!
//! Usage:
//!   homecookd -c <context-name-or-path> [--listen <addr>] [serve]
//!   homecookd hash-password <password>
//!
//! The context name resolves to `/etc/homecook/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use account::AccountModule;
use account::mailer::LogMailer;
use account::service::AccountService;
use homecook_core::Module;
use recipe::RecipeModule;
use recipe::service::RecipeService;

use config::ServerConfig;

/// HomeCook server.
#[derive(Parser, Debug)]
#[command(name = "homecookd", about = "HomeCook recipe sharing server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", default_value = "homecook")]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:5057")]
    listen: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print the argon2id hash of a password, for `[superadmin] password_hash`.
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::HashPassword { password }) => {
            let hash = account::service::password::hash_password(&password)?;
            println!("{}", hash);
            Ok(())
        }
        Some(Command::Serve) | None => serve(&cli.config, &cli.listen).await,
    }
}

async fn serve(config_name: &str, listen: &str) -> anyhow::Result<()> {
    let config_path = ServerConfig::resolve_path(config_name);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = homecook_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: listen.to_string(),
        ..Default::default()
    };

    let sql: Arc<dyn homecook_sql::SQLStore> = Arc::new(
        homecook_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    let kv: Arc<dyn homecook_kv::KVStore> = Arc::new(
        homecook_kv::RedbStore::open(&core_config.resolve_kv_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    let accounts = AccountService::new(
        Arc::clone(&sql),
        kv,
        Arc::new(LogMailer),
        server_config.account_config(),
    )?;
    info!("Account module initialized");

    let recipes = RecipeService::new(Arc::clone(&sql), Arc::clone(&accounts))?;
    info!("Recipe module initialized");

    if let Some(admin) = &server_config.superadmin {
        bootstrap::ensure_superadmin(&accounts, admin)?;
    }

    let account_module = AccountModule::new(Arc::clone(&accounts));
    let recipe_module = RecipeModule::new(recipes);
    let module_routes = vec![
        (account_module.name(), account_module.routes()),
        (recipe_module.name(), recipe_module.routes()),
    ];

    let app = routes::build_router(accounts, module_routes);

    let listener = TcpListener::bind(&core_config.listen).await?;
    info!("HomeCook server listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
