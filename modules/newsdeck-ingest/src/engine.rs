//! Batch orchestrator: fetch, dedup, enrich, persist, index.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use newsdeck_common::EnrichedRecord;

use crate::dedup;
use crate::enrich::EnrichmentClient;
use crate::sources::NewsSource;
use crate::store::{vector_metadata, RecordStore, VectorIndex};

/// How far back into stored history the dedup pool reaches.
const KNOWN_TITLES_LIMIT: i64 = 200;

#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub sources_failed: u32,
    pub fetched: u32,
    pub deduplicated: u32,
    pub enriched: u32,
    pub breaking: u32,
    pub store_failures: u32,
    pub index_failures: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Ingest Run Complete ===")?;
        writeln!(f, "Sources failed:   {}", self.sources_failed)?;
        writeln!(f, "Items fetched:    {}", self.fetched)?;
        writeln!(f, "Items deduped:    {}", self.deduplicated)?;
        writeln!(f, "Items enriched:   {}", self.enriched)?;
        writeln!(f, "Breaking:         {}", self.breaking)?;
        writeln!(f, "Store failures:   {}", self.store_failures)?;
        writeln!(f, "Index failures:   {}", self.index_failures)
    }
}

pub struct RunReport {
    pub records: Vec<EnrichedRecord>,
    pub stats: RunStats,
}

/// The ingest pipeline. One `run` pulls a batch from every configured source
/// and carries it through dedup, enrichment, storage and indexing.
///
/// Failures degrade per stage rather than aborting: a dead source contributes
/// nothing, a failed persistence step is counted and the item stays in the
/// returned batch.
pub struct NewsEngine {
    sources: Vec<Box<dyn NewsSource>>,
    enricher: EnrichmentClient,
    store: Arc<dyn RecordStore>,
    index: Arc<dyn VectorIndex>,
    dedup_enabled: bool,
}

impl NewsEngine {
    pub fn new(
        sources: Vec<Box<dyn NewsSource>>,
        enricher: EnrichmentClient,
        store: Arc<dyn RecordStore>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            sources,
            enricher,
            store,
            index,
            dedup_enabled: true,
        }
    }

    pub fn with_dedup(mut self, enabled: bool) -> Self {
        self.dedup_enabled = enabled;
        self
    }

    pub async fn run(&self) -> RunReport {
        let mut stats = RunStats::default();

        // Fetch every source concurrently; each failure degrades to an empty
        // contribution for the run.
        let fetches = join_all(self.sources.iter().map(|source| source.fetch())).await;
        let mut candidates = Vec::new();
        for (source, result) in self.sources.iter().zip(fetches) {
            match result {
                Ok(mut items) => {
                    items.truncate(source.cap());
                    info!(source = source.name(), count = items.len(), "Fetched items");
                    stats.fetched += items.len() as u32;
                    candidates.extend(items);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source fetch failed, skipping");
                    stats.sources_failed += 1;
                }
            }
        }

        if self.dedup_enabled {
            let known_titles = match self.store.known_titles(KNOWN_TITLES_LIMIT).await {
                Ok(titles) => titles,
                Err(e) => {
                    warn!(error = %e, "Could not load stored titles, deduping within batch only");
                    Vec::new()
                }
            };
            let before = candidates.len();
            candidates = dedup::deduplicate(candidates, &known_titles);
            stats.deduplicated = (before - candidates.len()) as u32;
        }

        let mut records = Vec::with_capacity(candidates.len());
        for item in candidates {
            let record = self.enrich(item).await;
            stats.enriched += 1;
            if record.is_breaking {
                stats.breaking += 1;
            }

            if let Err(e) = self.store.save(&record).await {
                warn!(title = %record.title, error = %e, "Failed to store record");
                stats.store_failures += 1;
            }
            let text = format!("{} {}", record.title, record.summary);
            let metadata = vector_metadata(&record);
            if let Err(e) = self.index.upsert(record.id, &text, metadata).await {
                warn!(title = %record.title, error = %e, "Failed to index record");
                stats.index_failures += 1;
            }

            records.push(record);
        }

        RunReport { records, stats }
    }

    async fn enrich(&self, item: newsdeck_common::CandidateItem) -> EnrichedRecord {
        // Fetchers that already tag a specific sector skip classification.
        let sector = if item.sector.is_confident() {
            item.sector
        } else {
            self.enricher
                .classify_sector(&item.title, item.summary.as_deref())
                .await
        };

        let source_text = item.summary.as_deref().unwrap_or(&item.title);
        let summary = self.enricher.executive_summary(source_text).await;
        let impact_level = self.enricher.detect_impact(&item.title, &summary).await;

        EnrichedRecord {
            id: Uuid::new_v4(),
            title: item.title,
            source_url: item.source_url,
            summary,
            sector,
            impact_level,
            published_at: item.published_at,
            created_at: Utc::now(),
            is_breaking: impact_level.is_breaking(),
            image_url: item.image_url,
        }
    }
}
