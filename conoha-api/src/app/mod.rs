// Application state and wiring
pub mod state;

pub use state::AppState;

use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::create_router;

/// Create CORS layer with permissive settings
pub fn create_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application: routes, CORS, state.
pub fn build_app(state: Arc<AppState>) -> Router {
    create_router().layer(create_cors()).with_state(state)
}

/// Serve until `shutdown` resolves, then stop accepting and drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")
}
