use crate::registration::{
    download_file_name, Clipboard, FlowPhase, FlowStatus, QrFetcher, QrModalView,
    RegistrationError, RegistrationFlow, RegistrationForm, TouristId,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Shared state for the registration API
pub struct RegistrationAppState {
    pub flow: RegistrationFlow,
    pub fetcher: QrFetcher,
    /// Target of "Copy ID"
    pub clipboard: Arc<dyn Clipboard>,
}

/// Success response for a submitted registration
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationResponse {
    tourist_id: TouristId,
    phase: FlowPhase,
    modal: QrModalView,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create registration router
pub fn create_registration_router(state: Arc<RegistrationAppState>) -> Router {
    Router::new()
        .route("/api/registrations", post(submit_registration))
        .route(
            "/api/registrations/current",
            get(current_registration).delete(close_registration),
        )
        .route("/api/registrations/current/copy", post(copy_tourist_id))
        .route("/api/registrations/:id/qr", get(fetch_qr_image))
        .with_state(state)
}

/// POST /api/registrations - submit the form, wait out the processing delay
/// and return the issued tourist ID with its QR display
async fn submit_registration(
    State(state): State<Arc<RegistrationAppState>>,
    Json(form): Json<RegistrationForm>,
) -> Result<Response, RegistrationApiError> {
    let modal = state.flow.submit(form).await?;

    let body = RegistrationResponse {
        tourist_id: modal.tourist_id().clone(),
        phase: FlowPhase::Complete,
        modal: modal.view(Instant::now()),
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /api/registrations/current - flow phase and open QR display
async fn current_registration(State(state): State<Arc<RegistrationAppState>>) -> Json<FlowStatus> {
    Json(state.flow.status())
}

/// DELETE /api/registrations/current - close the QR display
async fn close_registration(
    State(state): State<Arc<RegistrationAppState>>,
) -> Result<StatusCode, RegistrationApiError> {
    if state.flow.close() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RegistrationApiError::NoOpenDisplay)
    }
}

/// POST /api/registrations/current/copy - copy the issued ID. A clipboard
/// failure is only logged; the display reports `copied: false`.
async fn copy_tourist_id(
    State(state): State<Arc<RegistrationAppState>>,
) -> Result<Json<QrModalView>, RegistrationApiError> {
    let modal = state
        .flow
        .copy_id(state.clipboard.as_ref())
        .ok_or(RegistrationApiError::NoOpenDisplay)?;
    Ok(Json(modal.view(Instant::now())))
}

/// GET /api/registrations/:id/qr - load the QR image for the open display.
///
/// A failed load flips the display into its error state; there is no retry.
async fn fetch_qr_image(
    State(state): State<Arc<RegistrationAppState>>,
    Path(id): Path<String>,
) -> Result<Response, RegistrationApiError> {
    let modal = state
        .flow
        .modal()
        .filter(|modal| modal.tourist_id().as_str() == id)
        .ok_or(RegistrationApiError::NoOpenDisplay)?;

    match state.fetcher.fetch(modal.qr_url()).await {
        Ok(png) => {
            state.flow.record_image_result(modal.tourist_id(), true);
            let disposition = format!(
                "inline; filename=\"{}\"",
                download_file_name(modal.tourist_id())
            );
            Ok((
                [
                    (header::CONTENT_TYPE, "image/png".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                png,
            )
                .into_response())
        }
        Err(e) => {
            warn!(tourist_id = %modal.tourist_id(), error = %e, "QR image unavailable");
            state.flow.record_image_result(modal.tourist_id(), false);
            Err(RegistrationApiError::QrUnavailable(e.to_string()))
        }
    }
}

/// Registration API error types
#[derive(Debug)]
enum RegistrationApiError {
    Flow(RegistrationError),
    NoOpenDisplay,
    QrUnavailable(String),
}

impl From<RegistrationError> for RegistrationApiError {
    fn from(e: RegistrationError) -> Self {
        RegistrationApiError::Flow(e)
    }
}

impl IntoResponse for RegistrationApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            RegistrationApiError::Flow(e) => {
                let status = match e {
                    RegistrationError::InvalidForm(_) => StatusCode::BAD_REQUEST,
                    RegistrationError::AlreadySubmitting => StatusCode::CONFLICT,
                    RegistrationError::Discarded => StatusCode::GONE,
                };
                (status, e.to_string())
            }
            RegistrationApiError::NoOpenDisplay => (
                StatusCode::NOT_FOUND,
                "No QR display open for this tourist ID".to_string(),
            ),
            RegistrationApiError::QrUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
