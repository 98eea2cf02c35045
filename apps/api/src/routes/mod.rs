pub mod analyze;
pub mod health;
pub mod services;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and the text fields on top of two files.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes * 2 + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ai-services", get(services::handle_list_services))
        .route("/analyze", post(analyze::handle_analyze))
        .route("/analyze-text", post(analyze::handle_analyze_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
