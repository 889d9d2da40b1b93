// Test mocks for the ingest pipeline.
//
// One mock per trait boundary:
// - MockSource (NewsSource) — canned item list or forced failure
// - ScriptedGenerator / FailingGenerator (TextGenerator) — prompt-keyed replies
// - FixedEmbedder (TextEmbedder) — deterministic hash-based vectors
// - MemoryRecordStore (RecordStore) — stateful in-memory table
// - MemoryVectorIndex (VectorIndex) — in-memory cosine search
//
// Plus fixture helpers for CandidateItem and EnrichedRecord.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ai_client::TextGenerator;
use newsdeck_common::{CandidateItem, EnrichedRecord, ImpactLevel, SearchHit, Sector};

use crate::embedder::TextEmbedder;
use crate::store::{RecordStore, VectorIndex};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A minimal candidate item with the given title.
pub fn candidate(title: &str) -> CandidateItem {
    CandidateItem {
        title: title.to_string(),
        source_url: format!("https://example.com/{}", title.replace(' ', "-")),
        sector: Sector::General,
        impact_level: ImpactLevel::Medium,
        published_at: Utc::now(),
        summary: None,
        image_url: None,
    }
}

/// A minimal enriched record with the given title.
pub fn enriched_record(title: &str) -> EnrichedRecord {
    EnrichedRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        source_url: format!("https://example.com/{}", title.replace(' ', "-")),
        summary: format!("Summary of {title}"),
        sector: Sector::General,
        impact_level: ImpactLevel::Medium,
        published_at: Utc::now(),
        created_at: Utc::now(),
        is_breaking: false,
        image_url: None,
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Canned news source. Yields a fixed item list, or fails every fetch.
pub struct MockSource {
    name: &'static str,
    cap: usize,
    items: Vec<CandidateItem>,
    fail: bool,
}

impl MockSource {
    pub fn new(name: &'static str, items: Vec<CandidateItem>) -> Self {
        Self {
            name,
            cap: usize::MAX,
            items,
            fail: false,
        }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            cap: usize::MAX,
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl crate::sources::NewsSource for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cap(&self) -> usize {
        self.cap
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        if self.fail {
            bail!("{} is down", self.name);
        }
        Ok(self.items.clone())
    }
}

// ---------------------------------------------------------------------------
// ScriptedGenerator / FailingGenerator
// ---------------------------------------------------------------------------

/// Prompt-keyed text generator. The first rule whose needle appears in the
/// prompt wins; an unmatched prompt is an error.
pub struct ScriptedGenerator {
    rules: Vec<(String, String)>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn on(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push((needle.to_string(), reply.to_string()));
        self
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        for (needle, reply) in &self.rules {
            if prompt.contains(needle.as_str()) {
                return Ok(reply.clone());
            }
        }
        bail!("no scripted reply for prompt: {prompt}");
    }
}

/// Generator whose every call fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("model unavailable");
    }
}

// ---------------------------------------------------------------------------
// FixedEmbedder
// ---------------------------------------------------------------------------

/// Deterministic embedder for testing. Registered texts get exact vectors;
/// unmatched texts get a unique hash-based vector (low similarity to everything).
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dimension,
        }
    }

    /// Register a text→vector mapping for controlled similarity.
    pub fn on_text(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    fn hash_vector(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut vec = vec![0.0f32; self.dimension];
        let mut state = seed;
        for v in vec.iter_mut() {
            // Simple LCG PRNG
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            *v = ((state >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        }
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vec.iter_mut() {
                *v /= norm;
            }
        }
        vec
    }
}

impl TextEmbedder for FixedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.hash_vector(text)))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(t.as_str())
                    .cloned()
                    .unwrap_or_else(|| self.hash_vector(t))
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemoryRecordStore
// ---------------------------------------------------------------------------

/// Stateful in-memory record store. `fail_writes` makes every save error
/// while reads keep working.
pub struct MemoryRecordStore {
    records: Mutex<Vec<EnrichedRecord>>,
    fail_writes: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    /// Seed a stored title so the dedup pool sees it as history.
    pub fn with_known_title(self, title: &str) -> Self {
        self.records
            .lock()
            .unwrap()
            .push(enriched_record(title));
        self
    }

    pub fn saved(&self) -> Vec<EnrichedRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save(&self, record: &EnrichedRecord) -> Result<()> {
        if self.fail_writes {
            bail!("record store write failed");
        }
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.id != record.id);
        records.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<EnrichedRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(&self, sector: Option<Sector>, limit: i64) -> Result<Vec<EnrichedRecord>> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<_> = records
            .iter()
            .filter(|r| sector.map_or(true, |s| r.sector == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn known_titles(&self, limit: i64) -> Result<Vec<String>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .take(limit as usize)
            .map(|r| r.title.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemoryVectorIndex
// ---------------------------------------------------------------------------

/// In-memory vector index. Embeds with a FixedEmbedder and ranks by cosine
/// similarity; `fail_writes` makes every upsert error.
pub struct MemoryVectorIndex {
    embedder: FixedEmbedder,
    entries: Mutex<Vec<(Uuid, Vec<f32>, serde_json::Value)>>,
    fail_writes: bool,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            embedder: FixedEmbedder::new(16),
            entries: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            embedder: FixedEmbedder::new(16),
            entries: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn indexed_ids(&self) -> Vec<Uuid> {
        self.entries.lock().unwrap().iter().map(|(id, _, _)| *id).collect()
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, id: Uuid, text: &str, metadata: serde_json::Value) -> Result<()> {
        if self.fail_writes {
            bail!("vector index write failed");
        }
        let vector = self.embedder.embed(text)?;
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|(existing, _, _)| *existing != id);
        entries.push((id, vector, metadata));
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        sector: Option<Sector>,
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let query_vector = self.embedder.embed(query)?;
        let entries = self.entries.lock().unwrap();
        let mut hits: Vec<SearchHit> = entries
            .iter()
            .filter(|(_, _, metadata)| {
                sector.map_or(true, |s| {
                    metadata.get("sector").and_then(|v| v.as_str()) == Some(s.as_str())
                })
            })
            .map(|(id, vector, metadata)| SearchHit {
                id: *id,
                score: cosine(&query_vector, vector),
                metadata: metadata.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }
}
