//! Academic preprint fetcher backed by the arXiv Atom feed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use newsdeck_common::{CandidateItem, ImpactLevel, Sector};

use super::{http_client, sector_image, NewsSource};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api";

pub struct ArxivSource {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivSource {
    pub fn new() -> Self {
        Self {
            client: http_client(),
            base_url: ARXIV_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

impl Default for ArxivSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsSource for ArxivSource {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn cap(&self) -> usize {
        2
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        let url = format!("{}/query", self.base_url);

        let bytes = self
            .client
            .get(&url)
            .query(&[
                ("search_query", "cat:cs.AI OR cat:cs.LG"),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
                ("max_results", "10"),
            ])
            .send()
            .await
            .context("arXiv request failed")?
            .error_for_status()
            .context("arXiv returned an error status")?
            .bytes()
            .await
            .context("Failed to read arXiv feed body")?;

        let feed = feed_rs::parser::parse(&bytes[..]).context("Failed to parse arXiv Atom feed")?;

        debug!(entries = feed.entries.len(), "arXiv query returned");

        let items = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry.title.map(|t| t.content).filter(|t| !t.is_empty())?;
                let source_url = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| entry.id.clone());
                // A malformed date keeps the entry, stamped with the current time.
                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(Utc::now);
                let summary = entry.summary.map(|s| s.content).filter(|s| !s.is_empty());

                Some(CandidateItem {
                    title,
                    source_url,
                    sector: Sector::Technical,
                    impact_level: ImpactLevel::Medium,
                    published_at,
                    summary,
                    image_url: Some(sector_image(Sector::Technical).to_string()),
                })
            })
            .collect();

        Ok(items)
    }
}
