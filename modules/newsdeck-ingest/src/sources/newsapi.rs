//! General news-search fetcher backed by NewsAPI. Requires a credential;
//! without one the source contributes nothing rather than failing the batch.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use newsdeck_common::{CandidateItem, ImpactLevel, Sector};

use super::{http_client, sector_image, NewsSource};

const NEWSAPI_URL: &str = "https://newsapi.org/v2";

/// Sentinel title NewsAPI substitutes for taken-down articles.
const REMOVED_TITLE: &str = "[Removed]";

pub struct NewsApiSource {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    description: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
}

impl NewsApiSource {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: NEWSAPI_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    fn cap(&self) -> usize {
        10
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        let Some(api_key) = &self.api_key else {
            warn!("NEWS_API_KEY not set, skipping NewsAPI");
            return Ok(Vec::new());
        };

        // Query the last 48 hours to guarantee coverage across timezones.
        let from = (Utc::now() - Duration::hours(48)).format("%Y-%m-%d").to_string();
        let url = format!("{}/everything", self.base_url);

        let response: EverythingResponse = self
            .client
            .get(&url)
            .query(&[
                ("q", r#"("artificial intelligence" OR "AI" OR "machine learning")"#),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("apiKey", api_key.as_str()),
            ])
            .send()
            .await
            .context("NewsAPI request failed")?
            .error_for_status()
            .context("NewsAPI returned an error status")?
            .json()
            .await
            .context("Failed to parse NewsAPI response")?;

        debug!(articles = response.articles.len(), "NewsAPI search returned");

        let items = response
            .articles
            .into_iter()
            .filter_map(|article| {
                let title = article
                    .title
                    .filter(|t| !t.is_empty() && t != REMOVED_TITLE)?;
                let published_at = DateTime::parse_from_rfc3339(&article.published_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());
                let image_url = article
                    .url_to_image
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| sector_image(Sector::General).to_string());

                Some(CandidateItem {
                    title,
                    source_url: article.url,
                    sector: Sector::General,
                    impact_level: ImpactLevel::Medium,
                    published_at,
                    summary: article.description.filter(|d| !d.is_empty()),
                    image_url: Some(image_url),
                })
            })
            .collect();

        Ok(items)
    }
}
