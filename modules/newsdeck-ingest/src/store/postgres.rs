//! Durable record store backed by Postgres.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newsdeck_common::{EnrichedRecord, ImpactLevel, Sector};

use super::RecordStore;

/// Create the `news` table and its indexes. Idempotent; run at startup.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS news (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            source_url TEXT NOT NULL,
            summary TEXT NOT NULL,
            sector TEXT NOT NULL,
            impact_level TEXT NOT NULL,
            published_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            is_breaking BOOLEAN NOT NULL,
            image_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create news table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS news_sector_idx ON news (sector)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS news_created_at_idx ON news (created_at DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Sector and impact live as plain text in the row; parsing back is lenient.
#[derive(sqlx::FromRow)]
struct NewsRow {
    id: Uuid,
    title: String,
    source_url: String,
    summary: String,
    sector: String,
    impact_level: String,
    published_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    is_breaking: bool,
    image_url: Option<String>,
}

impl From<NewsRow> for EnrichedRecord {
    fn from(row: NewsRow) -> Self {
        EnrichedRecord {
            id: row.id,
            title: row.title,
            source_url: row.source_url,
            summary: row.summary,
            sector: row.sector.parse().unwrap_or(Sector::General),
            impact_level: row.impact_level.parse().unwrap_or(ImpactLevel::Medium),
            published_at: row.published_at,
            created_at: row.created_at,
            is_breaking: row.is_breaking,
            image_url: row.image_url,
        }
    }
}

const SELECT_COLUMNS: &str = "id, title, source_url, summary, sector, impact_level, \
                              published_at, created_at, is_breaking, image_url";

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn save(&self, record: &EnrichedRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news (id, title, source_url, summary, sector, impact_level,
                              published_at, created_at, is_breaking, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                source_url = EXCLUDED.source_url,
                summary = EXCLUDED.summary,
                sector = EXCLUDED.sector,
                impact_level = EXCLUDED.impact_level,
                published_at = EXCLUDED.published_at,
                created_at = EXCLUDED.created_at,
                is_breaking = EXCLUDED.is_breaking,
                image_url = EXCLUDED.image_url
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.source_url)
        .bind(&record.summary)
        .bind(record.sector.as_str())
        .bind(record.impact_level.as_str())
        .bind(record.published_at)
        .bind(record.created_at)
        .bind(record.is_breaking)
        .bind(&record.image_url)
        .execute(&self.pool)
        .await
        .context("Failed to save news record")?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<EnrichedRecord>> {
        let row = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM news WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read news record")?;

        Ok(row.map(EnrichedRecord::from))
    }

    async fn list(&self, sector: Option<Sector>, limit: i64) -> Result<Vec<EnrichedRecord>> {
        let rows = match sector {
            Some(sector) => {
                sqlx::query_as::<_, NewsRow>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM news WHERE sector = $1 \
                     ORDER BY created_at DESC LIMIT $2"
                ))
                .bind(sector.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, NewsRow>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM news ORDER BY created_at DESC LIMIT $1"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list news records")?;

        Ok(rows.into_iter().map(EnrichedRecord::from).collect())
    }

    async fn known_titles(&self, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT title FROM news ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read known titles")?;

        Ok(rows.into_iter().map(|(title,)| title).collect())
    }
}
