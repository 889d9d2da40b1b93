//! Local embedding generation.
//!
//! One model instance per process, lazily constructed on the first embed and
//! reused for the process lifetime. No network round-trip per call; output is
//! deterministic for a fixed model version.

use anyhow::{anyhow, Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Output dimensionality of the configured model (AllMiniLML6V2). The vector
/// index collection must be created with the same size; a mismatch is a
/// configuration error caught at startup, not a per-call branch.
pub const EMBEDDING_DIM: usize = 384;

static SHARED: OnceCell<Embedder> = OnceCell::new();

// --- TextEmbedder trait ---

pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Wrapper around the local sentence-embedding model. Cheap to clone; all
/// clones share one loaded model.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<TextEmbedding>,
}

impl Embedder {
    fn init() -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .context("Failed to initialize embedding model")?;

        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// The process-wide instance. First call pays the model load; concurrent
    /// first calls are race-safe and later calls are a cheap clone.
    pub fn shared() -> Result<Embedder> {
        SHARED.get_or_try_init(Embedder::init).cloned()
    }
}

impl TextEmbedder for Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .model
            .embed(vec![text], None)
            .context("Embedding failed")?;
        vectors
            .pop()
            .ok_or_else(|| anyhow!("Embedding model returned no vector"))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.model
            .embed(texts.to_vec(), None)
            .context("Batch embedding failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Downloads the model on first run; excluded from the default test pass.
    #[test]
    #[ignore]
    fn real_model_is_deterministic_and_fixed_dim() {
        let embedder = Embedder::shared().unwrap();

        let a = embedder.embed("OpenAI releases GPT-5").unwrap();
        let b = embedder.embed("OpenAI releases GPT-5").unwrap();

        assert_eq!(a.len(), EMBEDDING_DIM);
        assert_eq!(a, b);
    }

    #[test]
    #[ignore]
    fn real_model_batch_matches_single() {
        let embedder = Embedder::shared().unwrap();
        let texts = vec!["one headline".to_string(), "another headline".to_string()];

        let batch = embedder.embed_batch(&texts).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("one headline").unwrap());
    }
}
