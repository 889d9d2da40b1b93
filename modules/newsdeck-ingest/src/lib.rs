pub mod dedup;
pub mod embedder;
pub mod engine;
pub mod enrich;
pub mod sources;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
