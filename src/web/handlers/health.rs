// GET /health — liveness probe. Touches nothing but the clock.

use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::web::{SERVICE_NAME, VERSION};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION,
        "service": SERVICE_NAME,
        "description": "Platform-aware content moderation",
    }))
}
