use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dbiller::api::{create_router, AppState};
use dbiller::config::Config;
use dbiller::db::{CatalogBackend, CatalogReader, Database, LibSqlCatalog};
use dbiller::ocr::{EngineAvailability, OcrEngine, TesseractEngine};

#[derive(Parser)]
#[command(name = "dbiller")]
#[command(about = "Self-hostable retail catalog backend with photo product recognition")]
struct Args {
    /// Probe the OCR engine and exit
    #[arg(long)]
    ocr_check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbiller=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if args.ocr_check {
        let engine = TesseractEngine::new(&config.ocr);
        return match engine.availability() {
            EngineAvailability::Available => {
                println!("OCR engine available (language: {})", config.ocr.language);
                Ok(())
            }
            EngineAvailability::Unavailable { reason } => {
                println!("OCR engine unavailable: {reason}");
                Err(anyhow::anyhow!("OCR engine unavailable"))
            }
        };
    }

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "BILLER_API_KEYS is not set - catalog and recognition endpoints are locked. \
             Set BILLER_API_KEYS to enable access."
        );
    }

    tracing::info!("Initializing database...");
    let db = Database::new(&config.database).await?;
    let backend = Arc::new(LibSqlCatalog::new(db));
    let catalog: Arc<dyn CatalogReader> = backend.clone();
    let db: Arc<dyn CatalogBackend> = backend;

    tracing::info!("Initializing OCR engine (language: {})...", config.ocr.language);
    let engine: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(&config.ocr));
    if let EngineAvailability::Unavailable { reason } = engine.availability() {
        tracing::warn!("OCR unavailable - recognition requests will be rejected: {reason}");
    }

    let state = AppState::new(config.clone(), db, catalog, engine);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("dbiller starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received...");
}
