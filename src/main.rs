use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use empdir::Config;
use empdir::db::EmployeeStorage;
use empdir::router::{DirectoryState, directory_router};
use empdir::service::asset_fetcher::{AssetFetcher, FetchOutcome};
use empdir::service::bootstrap::establish_connection;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    cfg.resolve_color();
    let cfg = Arc::new(cfg);

    info!(
        group_name = %cfg.group_name,
        app_color = %cfg.app_color,
        db_host = %cfg.db_host,
        db_port = cfg.db_port,
        database = %cfg.db_name,
        listen_addr = %cfg.listen_addr,
        skip_db_connect = cfg.skip_db_connect
    );

    let background = cfg.background_image_path();
    let outcome = match AssetFetcher::from_config(&cfg) {
        Ok(fetcher) => {
            fetcher
                .fetch_asset(
                    cfg.s3_bucket_name.as_deref(),
                    cfg.s3_image_key.as_deref(),
                    &background,
                )
                .await
        }
        Err(e) => {
            error!(error = %e, "failed to build asset fetcher");
            FetchOutcome::Failed
        }
    };
    if outcome == FetchOutcome::Failed {
        warn!(path = %background.display(), "using existing static background image");
    }

    let storage = if cfg.skip_db_connect {
        warn!("SKIP_DB_CONNECT set; serving without an employee store");
        None
    } else {
        match establish_connection(&cfg, &cfg.retry_policy()).await {
            Ok(conn) => Some(EmployeeStorage::new(conn)),
            Err(e) => {
                error!(error = %e, "employee store unavailable; exiting");
                std::process::exit(1);
            }
        }
    };

    let state = DirectoryState::new(cfg.clone(), storage);
    let app = directory_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
