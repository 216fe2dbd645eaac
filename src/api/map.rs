use crate::map::{MapView, MarkerLayer};
use crate::tracking::{Dashboard, MapLocation, StatusCounts};
use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the map API
pub struct MapAppState {
    pub dashboard: Arc<Dashboard>,
    pub view: MapView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    pub sequence: u64,
    pub taken_at: DateTime<Utc>,
    pub view: MapView,
    pub locations: Vec<MapLocation>,
    /// Safe/distress tallies for the legend
    pub legend: StatusCounts,
}

/// Create map API router
pub fn create_map_router(state: Arc<MapAppState>) -> Router {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/map/markers", get(get_markers))
        .with_state(state)
}

/// GET /api/map - current map snapshot with viewport and legend
async fn get_map(State(state): State<Arc<MapAppState>>) -> Json<MapResponse> {
    let snapshot = state.dashboard.map.current();

    Json(MapResponse {
        sequence: snapshot.sequence,
        taken_at: snapshot.taken_at,
        view: state.view.clone(),
        locations: snapshot.data.clone(),
        legend: StatusCounts::tally(&snapshot.data),
    })
}

/// GET /api/map/markers - marker layer rebuilt from the current snapshot
async fn get_markers(State(state): State<Arc<MapAppState>>) -> Json<MarkerLayer> {
    Json(MarkerLayer::rebuild(&state.dashboard.map.current()))
}
