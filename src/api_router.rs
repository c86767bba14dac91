//! Combines the per-module routers into the single /api/v1 surface.

use crate::shared::state::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::leads::configure())
        .merge(crate::compliance::configure())
        .merge(crate::analytics::configure())
        .merge(crate::directory::configure())
        .merge(crate::whatsapp::configure())
        .merge(crate::events::configure())
}

/// Full application: API under /api/v1 with CORS and request tracing.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", configure_api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
