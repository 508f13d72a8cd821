use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use countdown_api::{build_router, AppState};
use countdown_core::services::{SessionService, SettingsService};
use countdown_infrastructure::{create_pool, run_migrations, seed, PgSessionRepository, PgSettingsRepository};
use countdown_shared::config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Countdown session server")]
struct Args {
    /// Insert default settings and demo archive rows, then exit
    #[arg(long)]
    seed: bool,

    /// Apply migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    let _log_guard = countdown_shared::telemetry::init_telemetry(&config.logging)?;

    info!("Countdown server starting ({})...", config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    info!("Database connection established.");

    if config.database.run_migrations || args.migrate_only {
        run_migrations(&pool).await?;
    }
    if args.migrate_only {
        return Ok(());
    }
    if args.seed {
        let inserted = seed::seed_demo_data(&pool).await?;
        info!("Seeding finished, {} sessions inserted", inserted);
        return Ok(());
    }

    // Create App State
    let sessions = Arc::new(SessionService::new(
        Arc::new(PgSessionRepository::new(pool.clone())),
        config.countdown.archive_page_size,
        config.countdown.overtime_drift_tolerance_seconds,
    ));
    let settings = Arc::new(SettingsService::new(Arc::new(PgSettingsRepository::new(pool.clone()))));

    let state = AppState {
        sessions,
        settings,
        config: config.clone(),
    };

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
