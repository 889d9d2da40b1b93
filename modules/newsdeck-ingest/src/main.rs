use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use newsdeck_common::Config;
use newsdeck_ingest::embedder::Embedder;
use newsdeck_ingest::engine::NewsEngine;
use newsdeck_ingest::enrich::EnrichmentClient;
use newsdeck_ingest::sources::{ArxivSource, HackerNewsSource, NewsApiSource, NewsSource};
use newsdeck_ingest::store::{postgres, PgRecordStore, QdrantIndex};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsdeck=info".parse()?))
        .init();

    info!("Newsdeck ingest starting...");

    let config = Config::from_env();
    config.log_redacted();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    postgres::migrate(&pool).await?;

    let embedder = Arc::new(Embedder::shared()?);
    let index = Arc::new(
        QdrantIndex::connect(
            &config.qdrant_url,
            config.qdrant_api_key.as_deref(),
            &config.qdrant_collection,
            embedder,
        )
        .await?,
    );
    let store = Arc::new(PgRecordStore::new(pool));

    let agent = Gemini::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let enricher = EnrichmentClient::new(Arc::new(agent));

    let sources: Vec<Box<dyn NewsSource>> = vec![
        Box::new(NewsApiSource::new(config.news_api_key.clone())),
        Box::new(HackerNewsSource::new()),
        Box::new(ArxivSource::new()),
    ];

    let engine = NewsEngine::new(sources, enricher, store, index);
    let report = engine.run().await;

    info!("{}", report.stats);
    Ok(())
}
