use crate::tracking::{Dashboard, StatCard, StatsCounters};
use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the stats API
pub struct StatsAppState {
    pub dashboard: Arc<Dashboard>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub sequence: u64,
    pub taken_at: DateTime<Utc>,
    pub stats: StatsCounters,
    pub cards: Vec<StatCard>,
}

/// Create stats API router
pub fn create_stats_router(state: Arc<StatsAppState>) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .with_state(state)
}

/// GET /api/stats - current stat cards
///
/// The counters come from their own mock stream; they do not summarise the
/// map or list snapshots.
async fn get_stats(State(state): State<Arc<StatsAppState>>) -> Json<StatsResponse> {
    let snapshot = state.dashboard.stats.current();

    Json(StatsResponse {
        sequence: snapshot.sequence,
        taken_at: snapshot.taken_at,
        stats: snapshot.data,
        cards: snapshot.data.cards(),
    })
}
