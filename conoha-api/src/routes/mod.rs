// Routes module - Centralizes all route definitions
pub mod public;

use axum::routing::post;
use axum::Router;
use std::sync::Arc;

use crate::app::AppState;
use crate::handlers::minecraft::minecraft;

/// Build the main application router
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(public::create_public_routes())
        .route("/minecraft", post(minecraft))
}
