use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use newsdeck_common::Config;
use newsdeck_ingest::embedder::Embedder;
use newsdeck_ingest::engine::NewsEngine;
use newsdeck_ingest::enrich::EnrichmentClient;
use newsdeck_ingest::sources::{ArxivSource, HackerNewsSource, NewsApiSource, NewsSource};
use newsdeck_ingest::store::{postgres, PgRecordStore, QdrantIndex, RecordStore, VectorIndex};

mod rest;

pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub index: Arc<dyn VectorIndex>,
    pub enricher: EnrichmentClient,
    pub engine: Arc<NewsEngine>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsdeck=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    postgres::migrate(&pool).await?;

    let embedder = Arc::new(Embedder::shared()?);
    let index: Arc<dyn VectorIndex> = Arc::new(
        QdrantIndex::connect(
            &config.qdrant_url,
            config.qdrant_api_key.as_deref(),
            &config.qdrant_collection,
            embedder,
        )
        .await?,
    );
    let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(pool));

    let agent = Gemini::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let enricher = EnrichmentClient::new(Arc::new(agent));

    let sources: Vec<Box<dyn NewsSource>> = vec![
        Box::new(NewsApiSource::new(config.news_api_key.clone())),
        Box::new(HackerNewsSource::new()),
        Box::new(ArxivSource::new()),
    ];
    let engine = Arc::new(NewsEngine::new(
        sources,
        enricher.clone(),
        store.clone(),
        index.clone(),
    ));

    let state = Arc::new(AppState {
        store,
        index,
        enricher,
        engine,
    });

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/feed", get(rest::api_feed))
        .route("/api/ingest", post(rest::api_ingest))
        .route("/api/search", get(rest::api_search))
        .route("/api/summarize", post(rest::api_summarize))
        .route("/api/chat", post(rest::api_chat))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Newsdeck API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
