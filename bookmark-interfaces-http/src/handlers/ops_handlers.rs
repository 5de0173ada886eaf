use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use bookmark_application::AppState;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    match state.view_log.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!("view log ping failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
