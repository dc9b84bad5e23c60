// Web server — thin Axum boundary around the Moderator.
//
// Routes:
//   POST /moderate  validate, moderate, return the result envelope
//   GET  /health    liveness, independent of the moderation core
//
// No auth and no rate limiting: this is meant to sit behind whatever gateway
// the deployment already has.

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::moderation::Moderator;

pub mod handlers;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "ModerationKit API";

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub moderator: Moderator,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(moderator: Moderator, port: u16, bind: &str) -> Result<()> {
    let producers = moderator.producer_names().join(", ");
    let app = build_router(AppState { moderator });

    let addr = format!("{bind}:{port}");
    info!(signals = %producers, "ModerationKit API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/moderate", post(handlers::moderate::moderate))
        .route("/health", get(handlers::health::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
