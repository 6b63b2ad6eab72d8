// Library entry point for the binary and the integration tests

pub mod api_docs;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod routes;
pub mod status_label;
pub mod stream;
pub mod version;

pub use app::AppState;
