use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};

use ai_client::Message;
use newsdeck_common::Sector;

use crate::AppState;

// --- Query and body structs ---

#[derive(Deserialize)]
pub struct FeedQuery {
    sector: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: String,
    sector: Option<String>,
    top_k: Option<usize>,
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    text: String,
}

#[derive(Deserialize)]
pub struct ChatTurn {
    role: String,
    content: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    history: Vec<ChatTurn>,
    message: String,
    #[serde(default)]
    context: String,
}

// --- Helpers ---

/// "General" means the General sector; absence means no filter.
fn parse_sector(raw: Option<&str>) -> Option<Sector> {
    raw.map(|s| s.parse().unwrap_or(Sector::General))
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

// --- Handlers ---

pub async fn api_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let sector = parse_sector(params.sector.as_deref());

    match state.store.list(sector, limit).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load feed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load feed")
        }
    }
}

pub async fn api_ingest(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.engine.run().await;
    info!("Ingest run complete. {}", report.stats);

    Json(serde_json::json!({
        "count": report.records.len(),
        "breaking": report.stats.breaking,
        "deduplicated": report.stats.deduplicated,
        "sources_failed": report.stats.sources_failed,
        "items": report.records,
    }))
    .into_response()
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    if params.q.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Query must not be empty");
    }
    let top_k = params.top_k.unwrap_or(10).clamp(1, 50);
    let sector = parse_sector(params.sector.as_deref());

    match state.index.search(&params.q, sector, top_k).await {
        Ok(hits) => Json(hits).into_response(),
        Err(e) => {
            warn!(error = %e, "Search failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Search failed")
        }
    }
}

pub async fn api_summarize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummarizeRequest>,
) -> impl IntoResponse {
    if body.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Text must not be empty");
    }

    let summary = state.enricher.summarize(&body.text).await;
    Json(serde_json::json!({ "summary": summary })).into_response()
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    if body.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message must not be empty");
    }

    let history: Vec<Message> = body
        .history
        .iter()
        .map(|turn| match turn.role.as_str() {
            "assistant" | "model" => Message::assistant(turn.content.as_str()),
            _ => Message::user(turn.content.as_str()),
        })
        .collect();

    let reply = state
        .enricher
        .chat(&history, &body.message, &body.context)
        .await;
    Json(serde_json::json!({ "reply": reply })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_filter_is_lenient() {
        assert_eq!(parse_sector(None), None);
        assert_eq!(parse_sector(Some("Finance")), Some(Sector::Finance));
        assert_eq!(parse_sector(Some("bogus")), Some(Sector::General));
    }
}
