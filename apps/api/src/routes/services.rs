use axum::{extract::State, Json};
use serde::Serialize;

use crate::providers::ProviderInfo;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<ProviderInfo>,
}

/// GET /ai-services
/// Availability is evaluated per request, so a credential added or removed
/// at runtime shows up on the next call.
pub async fn handle_list_services(State(state): State<AppState>) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        services: state.registry.list_providers(),
    })
}
