use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use afrikvent_banner::EngagementEvent;
use afrikvent_shared::{Banner, BannerView, EngagementKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListBannersQuery {
    pub limit: Option<usize>,
    /// Evaluate eligibility at this instant instead of the server clock.
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub success: bool,
    pub message: &'static str,
    /// Ids that matched no banner. Their absence does not fail the request.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_ids: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/promotion-banners", get(list_banners).post(track_engagement))
        .route("/api/promotion-banners/track", post(track_engagement))
        .route("/api/promotion-banners/stream", get(engagement_stream))
        .route("/api/admin/promotion-banners/{id}", get(get_banner))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/promotion-banners
/// Eligible banners, highest priority first
pub async fn list_banners(
    State(state): State<AppState>,
    query: Result<Query<ListBannersQuery>, QueryRejection>,
) -> Result<Json<Vec<BannerView>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let now = query.now.unwrap_or_else(Utc::now);
    let limit = query.limit.or(state.default_limit);

    let banners = state.gateway.list_display_banners(now, limit).await?;
    Ok(Json(banners))
}

/// POST /api/promotion-banners
/// Record a click or a batch of impressions
pub async fn track_engagement(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<TrackResponse>, AppError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!("Rejected tracking body: {}", e);
        AppError::ValidationError("Invalid request body".to_string())
    })?;

    let event = EngagementEvent::from_json(&body)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let report = state
        .gateway
        .handle_engagement_event(event, Utc::now())
        .await
        .map_err(|e| AppError::TrackingError(e.to_string()))?;

    let message = match report.kind {
        EngagementKind::Click => "Click tracked",
        EngagementKind::Impression => "Impressions tracked",
    };

    Ok(Json(TrackResponse {
        success: true,
        message,
        skipped_ids: report.skipped_ids(),
    }))
}

/// GET /api/admin/promotion-banners/{id}
/// Full banner record including engagement counters
pub async fn get_banner(
    State(state): State<AppState>,
    Path(banner_id): Path<String>,
) -> Result<Json<Banner>, AppError> {
    let banner = state
        .gateway
        .get_banner(&banner_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Banner not found: {}", banner_id)))?;

    Ok(Json(banner))
}

/// GET /api/promotion-banners/stream
/// Live engagement feed for the organiser dashboard
pub async fn engagement_stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let rx = state
        .gateway
        .subscribe()
        .ok_or_else(|| AppError::NotFoundError("Engagement stream is disabled".to_string()))?;

    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(event) => {
            let name = match event.kind {
                EngagementKind::Click => "click",
                EngagementKind::Impression => "impression",
            };
            Event::default()
                .event(name)
                .id(event.event_id.to_string())
                .json_data(&event)
                .ok()
                .map(Ok::<Event, Infallible>)
        }
        Err(e) => {
            tracing::warn!("Engagement stream subscriber lagged: {}", e);
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
