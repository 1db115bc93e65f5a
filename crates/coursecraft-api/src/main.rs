mod api_doc;
mod error;
mod form;
mod handlers;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursecraft_core::Config;
use coursecraft_db::PgCourseRepository;
use coursecraft_services::{CourseService, MediaIngestor};
use coursecraft_storage::{LocalStorage, Storage};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "coursecraft_api=debug,coursecraft_services=debug,coursecraft_db=debug,\
             coursecraft_storage=debug,coursecraft_core=debug,tower_http=info"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("../coursecraft-db/migrations").run(&pool).await?;

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_path.clone(), config.storage_base_url.clone())
            .await
            .map_err(|e| anyhow::anyhow!("failed to initialize storage: {e}"))?,
    );

    let repository = Arc::new(PgCourseRepository::new(pool.clone()));
    let service = CourseService::new(repository, MediaIngestor::new(storage));

    let app = routes::router(AppState { service, pool });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
