use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /health
/// Always 200 while the process is up.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Resume analyzer API is running",
        "timestamp": Utc::now().to_rfc3339()
    }))
}
