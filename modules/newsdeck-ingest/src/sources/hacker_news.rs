//! Community-discussion fetcher backed by the Algolia HackerNews search API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use newsdeck_common::{CandidateItem, ImpactLevel, Sector};

use super::{http_client, sector_image, NewsSource};

const ALGOLIA_API_URL: &str = "https://hn.algolia.com/api/v1";

pub struct HackerNewsSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "objectID")]
    object_id: String,
    created_at_i: i64,
}

impl HackerNewsSource {
    pub fn new() -> Self {
        Self {
            client: http_client(),
            base_url: ALGOLIA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

impl Default for HackerNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsSource for HackerNewsSource {
    fn name(&self) -> &'static str {
        "hackernews"
    }

    fn cap(&self) -> usize {
        3
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        let cutoff = (Utc::now() - Duration::hours(24)).timestamp();
        let recency_filter = format!("created_at_i>{cutoff}");
        let url = format!("{}/search", self.base_url);

        let response: SearchResponse = self
            .client
            .get(&url)
            .query(&[
                ("query", "AI"),
                ("tags", "story"),
                ("numericFilters", recency_filter.as_str()),
            ])
            .send()
            .await
            .context("HackerNews request failed")?
            .error_for_status()
            .context("HackerNews returned an error status")?
            .json()
            .await
            .context("Failed to parse HackerNews response")?;

        debug!(hits = response.hits.len(), "HackerNews search returned");

        let items = response
            .hits
            .into_iter()
            .filter_map(|hit| {
                let title = hit.title.filter(|t| !t.is_empty())?;
                let source_url = hit.url.filter(|u| !u.is_empty()).unwrap_or_else(|| {
                    format!("https://news.ycombinator.com/item?id={}", hit.object_id)
                });
                let published_at = DateTime::from_timestamp(hit.created_at_i, 0)
                    .unwrap_or_else(Utc::now);

                Some(CandidateItem {
                    title,
                    source_url,
                    sector: Sector::Engineering,
                    impact_level: ImpactLevel::Medium,
                    published_at,
                    summary: None,
                    image_url: Some(sector_image(Sector::Engineering).to_string()),
                })
            })
            .collect();

        Ok(items)
    }
}
