use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsdeckError {
    #[error("Upstream fetch error ({source_name}): {reason}")]
    UpstreamFetch {
        source_name: &'static str,
        reason: String,
    },

    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
