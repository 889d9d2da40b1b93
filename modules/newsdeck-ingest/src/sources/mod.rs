pub mod arxiv;
pub mod hacker_news;
pub mod newsapi;

pub use arxiv::ArxivSource;
pub use hacker_news::HackerNewsSource;
pub use newsapi::NewsApiSource;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use newsdeck_common::{CandidateItem, Sector};

/// One slow upstream must not stall the batch; every fetcher call is bounded.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// --- NewsSource trait ---

/// One upstream news API, normalized to the common candidate-item shape.
///
/// Fetchers propagate their own network/parse errors with `?`; the engine
/// catches each source's failure and degrades it to an empty contribution,
/// so one dead upstream never aborts the batch.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Max items the engine takes from this source per run.
    fn cap(&self) -> usize;

    async fn fetch(&self) -> Result<Vec<CandidateItem>>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("Failed to build fetcher HTTP client")
}

// --- Sector fallback images ---

/// Sector-keyed fallback images (Unsplash) for items whose upstream supplies
/// no image of its own.
pub fn sector_image(sector: Sector) -> &'static str {
    match sector {
        Sector::Health => {
            "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?w=800&h=600&fit=crop"
        }
        Sector::Engineering => {
            "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800&h=600&fit=crop"
        }
        Sector::Finance => {
            "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?w=800&h=600&fit=crop"
        }
        Sector::Education => {
            "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=800&h=600&fit=crop"
        }
        Sector::Legal => {
            "https://images.unsplash.com/photo-1589829545856-d10d557cf95f?w=800&h=600&fit=crop"
        }
        Sector::Technical => {
            "https://images.unsplash.com/photo-1555255707-c07966088b7b?w=800&h=600&fit=crop"
        }
        Sector::General => {
            "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800&h=600&fit=crop"
        }
    }
}
