use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tubecast::app;
use tubecast::config::settings::{AppConfig, StorageBackend};
use tubecast::infrastructure::db::pool::{connect_to_db, run_migrations};
use tubecast::infrastructure::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};
use tubecast::modules::video::repository::PgVideoRepository;
use tubecast::state::AppState;
use tubecast::transcode::{SystemCommandRunner, Toolchain};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new()?;

    let pool = connect_to_db(&config.database_url).await?;
    run_migrations(&pool).await?;

    let storage: Arc<dyn ObjectStore> = match (config.storage_backend, &config.s3) {
        (StorageBackend::S3, Some(settings)) => Arc::new(S3ObjectStore::new(settings)),
        (StorageBackend::S3, None) => anyhow::bail!("S3 storage selected without S3 settings"),
        (StorageBackend::Memory, _) => {
            warn!("Using in-memory object storage; assets are lost on restart");
            Arc::new(MemoryObjectStore::new(&config.public_base_url))
        }
    };

    tokio::fs::create_dir_all(&config.staging_dir).await?;
    info!(dir = %config.staging_dir.display(), "Staging uploads locally");

    let toolchain = Toolchain::new(
        Arc::new(SystemCommandRunner),
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.tool_timeout,
    );

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(
        config,
        Arc::new(PgVideoRepository::new(pool)),
        storage,
        toolchain,
    );

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
