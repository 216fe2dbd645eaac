// HTTP and WebSocket APIs

pub mod map;
pub mod registration;
pub mod stats;
pub mod tourists;
pub mod websocket;

pub use map::{create_map_router, MapAppState};
pub use registration::{create_registration_router, RegistrationAppState};
pub use stats::{create_stats_router, StatsAppState};
pub use tourists::{create_tourists_router, TouristsAppState, EMPTY_STATE_MESSAGE};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::map::MapView;
use crate::registration::{MemoryClipboard, QrFetcher, RegistrationFlow};
use crate::tracking::Dashboard;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// GET /api/health - liveness
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the full dashboard router over one mounted dashboard and one
/// registration flow
pub fn create_app_router(
    dashboard: Arc<Dashboard>,
    flow: RegistrationFlow,
    fetcher: QrFetcher,
) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(create_map_router(Arc::new(MapAppState {
            dashboard: Arc::clone(&dashboard),
            view: MapView::default(),
        })))
        .merge(create_tourists_router(Arc::new(TouristsAppState {
            dashboard: Arc::clone(&dashboard),
        })))
        .merge(create_stats_router(Arc::new(StatsAppState {
            dashboard: Arc::clone(&dashboard),
        })))
        .merge(create_registration_router(Arc::new(RegistrationAppState {
            flow,
            fetcher,
            clipboard: Arc::new(MemoryClipboard::default()),
        })))
        .merge(create_ws_router(Arc::new(WsAppState { dashboard })))
        .layer(CorsLayer::permissive())
}
