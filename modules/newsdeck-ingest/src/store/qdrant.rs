//! Semantic index backed by Qdrant.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, Query, QueryPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::info;
use uuid::Uuid;

use newsdeck_common::{NewsdeckError, SearchHit, Sector};

use crate::embedder::{TextEmbedder, EMBEDDING_DIM};

use super::VectorIndex;

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    embedder: Arc<dyn TextEmbedder>,
}

impl QdrantIndex {
    /// Connect and make sure the collection exists with the expected vector
    /// geometry. A pre-existing collection with a different dimension is a
    /// configuration error, not something to silently write into.
    pub async fn connect(
        url: &str,
        api_key: Option<&str>,
        collection: &str,
        embedder: Arc<dyn TextEmbedder>,
    ) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build().context("Failed to connect to Qdrant")?;

        let index = Self {
            client,
            collection: collection.to_string(),
            embedder,
        };
        index.ensure_collection().await?;
        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .context("Failed to check Qdrant collection")?;

        if !exists {
            info!(collection = %self.collection, dim = EMBEDDING_DIM, "Creating vector collection");
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine),
                    ),
                )
                .await
                .context("Failed to create Qdrant collection")?;
            return Ok(());
        }

        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .context("Failed to read Qdrant collection info")?;
        let dim = info
            .result
            .and_then(|c| c.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|c| match c {
                VectorsConfig::Params(params) => Some(params.size),
                VectorsConfig::ParamsMap(_) => None,
            });
        if dim != Some(EMBEDDING_DIM as u64) {
            return Err(NewsdeckError::Config(format!(
                "collection '{}' has vector size {:?}, expected {}",
                self.collection, dim, EMBEDDING_DIM
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, id: Uuid, text: &str, metadata: serde_json::Value) -> Result<()> {
        let vector = self.embedder.embed(text)?;
        let payload = Payload::try_from(metadata).context("Vector metadata must be an object")?;
        let point = PointStruct::new(id.to_string(), vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .context("Failed to upsert vector point")?;
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        sector: Option<Sector>,
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let vector = self.embedder.embed(query)?;

        let mut request = QueryPointsBuilder::new(&self.collection)
            .query(Query::new_nearest(vector))
            .limit(top_k as u64)
            .with_payload(true);
        if let Some(sector) = sector {
            request = request.filter(Filter::must([Condition::matches(
                "sector",
                sector.as_str().to_string(),
            )]));
        }

        let response = self
            .client
            .query(request)
            .await
            .context("Vector search failed")?;

        let mut hits = Vec::with_capacity(response.result.len());
        for point in response.result {
            let Some(PointIdOptions::Uuid(raw)) =
                point.id.and_then(|id| id.point_id_options)
            else {
                continue;
            };
            let Ok(id) = Uuid::parse_str(&raw) else {
                continue;
            };
            let metadata = serde_json::Value::Object(
                point
                    .payload
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            );
            hits.push(SearchHit {
                id,
                score: point.score,
                metadata,
            });
        }
        Ok(hits)
    }
}
