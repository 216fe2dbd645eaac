use crate::tracking::{
    filter_tourists, Dashboard, FilteredView, StatusCounts, StatusFilter, TouristQuery,
    TouristRecord, UnknownStatusFilter,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Message shown when no tourist matches the search
pub const EMPTY_STATE_MESSAGE: &str = "No tourists found matching your criteria";

/// Shared state for the tourist list API
pub struct TouristsAppState {
    pub dashboard: Arc<Dashboard>,
}

/// Query parameters for the tourist list
#[derive(Deserialize, Default)]
pub struct TouristListParams {
    /// Case-insensitive substring over name, passport number and place
    pub search: Option<String>,
    /// all | safe | distress
    pub status: Option<String>,
}

/// Row emphasis on the list surface
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowTone {
    Normal,
    Alert,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristRow {
    #[serde(flatten)]
    pub tourist: TouristRecord,
    pub tone: RowTone,
    /// "Alert Response" is rendered for distress rows only. It has no action.
    pub alert_response: bool,
}

impl From<TouristRecord> for TouristRow {
    fn from(tourist: TouristRecord) -> Self {
        let distress = tourist.status.is_distress();
        Self {
            tourist,
            tone: if distress { RowTone::Alert } else { RowTone::Normal },
            alert_response: distress,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ListBody {
    Rows { rows: Vec<TouristRow> },
    Empty { message: &'static str },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristListResponse {
    pub sequence: u64,
    /// Size of the unfiltered snapshot
    pub total: usize,
    /// Tallies over the unfiltered snapshot
    pub counts: StatusCounts,
    pub status_filter: StatusFilter,
    #[serde(flatten)]
    pub body: ListBody,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create tourist list router
pub fn create_tourists_router(state: Arc<TouristsAppState>) -> Router {
    Router::new()
        .route("/api/tourists", get(list_tourists))
        .with_state(state)
}

/// GET /api/tourists - filtered tourist list
///
/// Query parameters:
/// - `search`: substring, case-insensitive (e.g., ?search=mike)
/// - `status`: all | safe | distress (default all)
///
/// Both filters combine with AND. Snapshot order is preserved.
async fn list_tourists(
    State(state): State<Arc<TouristsAppState>>,
    Query(params): Query<TouristListParams>,
) -> Result<Json<TouristListResponse>, TouristsError> {
    let status: StatusFilter = params
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: UnknownStatusFilter| TouristsError::BadStatus(e.to_string()))?;

    let query = TouristQuery::new(params.search.unwrap_or_default(), status);
    let snapshot = state.dashboard.tourists.current();

    let body = match filter_tourists(&snapshot.data, &query) {
        FilteredView::Rows(rows) => ListBody::Rows {
            rows: rows.into_iter().map(TouristRow::from).collect(),
        },
        FilteredView::Empty => ListBody::Empty {
            message: EMPTY_STATE_MESSAGE,
        },
    };

    Ok(Json(TouristListResponse {
        sequence: snapshot.sequence,
        total: snapshot.data.len(),
        counts: StatusCounts::tally(&snapshot.data),
        status_filter: status,
        body,
    }))
}

#[derive(Debug)]
enum TouristsError {
    BadStatus(String),
}

impl IntoResponse for TouristsError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            TouristsError::BadStatus(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_state() -> Arc<TouristsAppState> {
        let (dashboard, _writers) = Dashboard::seeded();
        Arc::new(TouristsAppState {
            dashboard: Arc::new(dashboard),
        })
    }

    fn params(search: Option<&str>, status: Option<&str>) -> TouristListParams {
        TouristListParams {
            search: search.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_all_tourists() {
        let result = list_tourists(State(create_test_state()), Query(params(None, None)))
            .await
            .unwrap();

        assert_eq!(result.0.total, 6);
        assert_eq!(result.0.counts, StatusCounts { safe: 5, distress: 1 });
        let ListBody::Rows { rows } = &result.0.body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].tourist.id, "TST-001");
    }

    #[tokio::test]
    async fn test_distress_row_has_alert_response() {
        let result = list_tourists(
            State(create_test_state()),
            Query(params(Some("mike"), None)),
        )
        .await
        .unwrap();

        let ListBody::Rows { rows } = &result.0.body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tone, RowTone::Alert);
        assert!(rows[0].alert_response);
    }

    #[tokio::test]
    async fn test_empty_state_branch() {
        let result = list_tourists(
            State(create_test_state()),
            Query(params(Some("mike"), Some("safe"))),
        )
        .await
        .unwrap();

        assert!(matches!(
            result.0.body,
            ListBody::Empty {
                message: EMPTY_STATE_MESSAGE
            }
        ));
        // Header counts still cover the full snapshot
        assert_eq!(result.0.total, 6);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let err = list_tourists(
            State(create_test_state()),
            Query(params(None, Some("lost"))),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
