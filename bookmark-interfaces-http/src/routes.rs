use axum::Router;

use bookmark_application::AppState;

use crate::handlers::{entry_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/healthz/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/healthz/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/:course_id",
            axum::routing::get(entry_handlers::redirect_to_entry),
        )
        .with_state(state)
}
