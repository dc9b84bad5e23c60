// POST /moderate — validate, moderate, wrap in the response envelope.
//
// Returns 400 for a missing/malformed body or invalid content. Moderation
// itself never fails: producer problems come back as a fail-safe result
// with confidence 0.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use crate::moderation::models::{ModerationRequest, ModerationRequestBody};
use crate::web::{api_error, AppState, VERSION};

pub async fn moderate(
    State(state): State<AppState>,
    body: Result<Json<ModerationRequestBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected moderation request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Request body is required",
                    "example": {
                        "content": "Text to moderate",
                        "platform": "substack",
                        "context": "Comment on newsletter about AI",
                    },
                })),
            )
                .into_response();
        }
    };

    let request = match ModerationRequest::try_from(body) {
        Ok(request) => request,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let result = state.moderator.moderate(&request).await;

    info!(
        action = %result.suggested_action,
        confidence = result.confidence,
        elapsed_ms = result.processing_time_ms,
        "Moderation request served"
    );

    Json(serde_json::json!({
        "success": true,
        "data": result,
        "metadata": {
            "timestamp": Utc::now().to_rfc3339(),
            "version": VERSION,
        },
    }))
    .into_response()
}
