use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use latchkey_doors::Registry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the control surface over a loaded registry.
///
/// Unmatched paths and unmatched methods on known paths both answer
/// 404 `{"error": "not found"}`.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/doors", get(handlers::list_doors))
        .route("/doors/{id}", get(handlers::show_door))
        .route("/doors/{id}/open", post(handlers::unlock))
        .route("/doors/{id}/unlock", post(handlers::unlock))
        .route("/doors/{id}/mag/engage", post(handlers::mag_engage))
        .route("/doors/{id}/mag/disengage", post(handlers::mag_disengage))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(registry))
}
