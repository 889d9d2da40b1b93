//! Persistence seams: the durable record store and the vector index.
//!
//! The two writes are independent; no client-side transaction spans them.
//! A record can exist without an index entry (the engine logs that gap),
//! but not the reverse, since the vector is derived from an already-built
//! record.

pub mod postgres;
pub mod qdrant;

pub use postgres::PgRecordStore;
pub use qdrant::QdrantIndex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use newsdeck_common::{EnrichedRecord, SearchHit, Sector};

/// Vector-index metadata keeps a bounded subset of the record; summaries are
/// truncated so payloads stay small.
pub const METADATA_SUMMARY_MAX: usize = 200;

// --- RecordStore trait ---

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write a record keyed by its identifier. Re-targeting an existing id
    /// overwrites the row (explicit retry semantics, never a duplicate key).
    async fn save(&self, record: &EnrichedRecord) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<EnrichedRecord>>;

    /// Latest records, optionally filtered by sector.
    async fn list(&self, sector: Option<Sector>, limit: i64) -> Result<Vec<EnrichedRecord>>;

    /// Titles of the most recent records, for near-duplicate filtering.
    async fn known_titles(&self, limit: i64) -> Result<Vec<String>>;
}

// --- VectorIndex trait ---

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed `text` and write `(id, vector, metadata)` to the index.
    async fn upsert(&self, id: Uuid, text: &str, metadata: serde_json::Value) -> Result<()>;

    /// Embed the query and return up to `top_k` nearest entries, optionally
    /// restricted to one sector, ordered by descending similarity.
    async fn search(
        &self,
        query: &str,
        sector: Option<Sector>,
        top_k: usize,
    ) -> Result<Vec<SearchHit>>;
}

/// The metadata subset stored alongside a record's vector.
pub fn vector_metadata(record: &EnrichedRecord) -> serde_json::Value {
    let summary: String = record.summary.chars().take(METADATA_SUMMARY_MAX).collect();
    json!({
        "title": record.title,
        "sector": record.sector.as_str(),
        "url": record.source_url,
        "summary": summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::enriched_record;

    #[test]
    fn metadata_truncates_long_summaries() {
        let mut record = enriched_record("Budget deal reached");
        record.summary = "x".repeat(500);

        let metadata = vector_metadata(&record);

        assert_eq!(
            metadata["summary"].as_str().unwrap().len(),
            METADATA_SUMMARY_MAX
        );
        assert_eq!(metadata["title"], "Budget deal reached");
    }
}
