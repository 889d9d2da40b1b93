//! Store and index semantics against the in-memory implementations. The
//! Postgres and Qdrant backends mirror these contracts.

use newsdeck_common::{ImpactLevel, Sector};
use newsdeck_ingest::store::{vector_metadata, RecordStore, VectorIndex};
use newsdeck_ingest::testing::{enriched_record, MemoryRecordStore, MemoryVectorIndex};

#[tokio::test]
async fn record_round_trip_preserves_fields() {
    let store = MemoryRecordStore::new();
    let mut record = enriched_record("Fed cuts rates by 50 basis points");
    record.sector = Sector::Finance;
    record.impact_level = ImpactLevel::High;
    record.is_breaking = true;

    store.save(&record).await.unwrap();
    let loaded = store.get(record.id).await.unwrap().unwrap();

    assert_eq!(loaded.title, record.title);
    assert_eq!(loaded.sector, Sector::Finance);
    assert_eq!(loaded.impact_level, ImpactLevel::High);
    assert!(loaded.is_breaking);
}

#[tokio::test]
async fn save_with_same_id_overwrites() {
    let store = MemoryRecordStore::new();
    let mut record = enriched_record("Initial headline");
    store.save(&record).await.unwrap();

    record.summary = "Updated summary".to_string();
    store.save(&record).await.unwrap();

    let loaded = store.get(record.id).await.unwrap().unwrap();
    assert_eq!(loaded.summary, "Updated summary");
    assert_eq!(store.saved().len(), 1);
}

#[tokio::test]
async fn list_filters_by_sector() {
    let store = MemoryRecordStore::new();
    let mut finance = enriched_record("Bond yields climb");
    finance.sector = Sector::Finance;
    let mut health = enriched_record("Vaccine trial results");
    health.sector = Sector::Health;
    store.save(&finance).await.unwrap();
    store.save(&health).await.unwrap();

    let all = store.list(None, 10).await.unwrap();
    let only_finance = store.list(Some(Sector::Finance), 10).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(only_finance.len(), 1);
    assert_eq!(only_finance[0].title, "Bond yields climb");
}

#[tokio::test]
async fn search_filters_by_sector_and_ranks_exact_text_first() {
    let index = MemoryVectorIndex::new();
    let mut finance = enriched_record("Bond yields climb");
    finance.sector = Sector::Finance;
    let mut health = enriched_record("Vaccine trial results");
    health.sector = Sector::Health;

    index
        .upsert(finance.id, "Bond yields climb", vector_metadata(&finance))
        .await
        .unwrap();
    index
        .upsert(health.id, "Vaccine trial results", vector_metadata(&health))
        .await
        .unwrap();

    // Identical text embeds to the identical vector, so the matching entry
    // ranks first with similarity 1.
    let hits = index.search("Bond yields climb", None, 10).await.unwrap();
    assert_eq!(hits[0].id, finance.id);
    assert!((hits[0].score - 1.0).abs() < 1e-5);

    let filtered = index
        .search("Bond yields climb", Some(Sector::Health), 10)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, health.id);
}

#[tokio::test]
async fn search_respects_top_k() {
    let index = MemoryVectorIndex::new();
    for i in 0..5 {
        let record = enriched_record(&format!("headline {i}"));
        index
            .upsert(record.id, &record.title, vector_metadata(&record))
            .await
            .unwrap();
    }

    let hits = index.search("headline 0", None, 3).await.unwrap();
    assert_eq!(hits.len(), 3);
}
