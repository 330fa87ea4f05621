mod applications;
mod auth;
mod config;
mod coverletters;
mod db;
mod errors;
mod extractors;
mod jobs;
mod llm_client;
mod models;
mod profiles;
mod resumes;
mod routes;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::google::GoogleOAuth;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::jobs::scraper::WebDriverScraper;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::s3::S3FileStore;
use crate::store::postgres::PgUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting apptracker v{}", env!("CARGO_PKG_VERSION"));

    // Document store
    let pool = create_pool(&config.database_url).await?;
    ensure_schema(&pool).await?;
    let store = Arc::new(PgUserStore::new(pool));

    // Résumé blobs (MinIO locally)
    let files = Arc::new(S3FileStore::from_config(&config).await);
    info!("S3 file store initialized (bucket: {})", config.s3_bucket);

    let completion = Arc::new(OllamaClient::new(&config.ollama_url, &config.ollama_model)?);
    info!("Completion client initialized (model: {})", completion.model());

    let scraper = Arc::new(WebDriverScraper::new(&config.selenium_url)?);

    let google = match config.google.clone() {
        Some(google) => {
            info!("Google sign-in enabled");
            Some(Arc::new(GoogleOAuth::new(google)?))
        }
        None => None,
    };

    let state = AppState {
        store,
        files,
        completion,
        scraper,
        google,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
