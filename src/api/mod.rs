//! HTTP surface.
//!
//! Two chat endpoints route prompts into the chat boundary and render the
//! result as JSON:
//! - `GET /inventory/chat?prompt=...` applies an inventory request, also
//!   served at `/soda/chat`
//! - `POST /transaction/chat?prompt=...` searches the transaction log
//!
//! plus `GET /health` for liveness checks.

/// Error rendering
pub mod error;

use crate::{
    chat::{self, IntentExtractor},
    core::decision::Outcome,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Shared state available to every handler.
///
/// Cheap to clone: both the connection pool and the extractor sit behind an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, created once at startup
    pub db: Arc<DatabaseConnection>,
    /// Prompt extractor
    pub extractor: Arc<dyn IntentExtractor>,
}

impl AppState {
    /// Bundles the process-wide handles.
    #[must_use]
    pub fn new(db: DatabaseConnection, extractor: Arc<dyn IntentExtractor>) -> Self {
        Self {
            db: Arc::new(db),
            extractor,
        }
    }
}

/// Query string of both chat endpoints.
#[derive(Debug, Deserialize)]
pub struct ChatParams {
    /// The user's free-text request
    #[serde(default)]
    pub prompt: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status.code()).unwrap_or(StatusCode::OK);
        (status, Json(self.reply)).into_response()
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn inventory_chat(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Outcome> {
    chat::handle_inventory_prompt(&state.db, state.extractor.as_ref(), &params.prompt).await
}

async fn transaction_chat(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Json<Vec<chat::TransactionRecord>>> {
    chat::handle_transaction_prompt(&state.db, state.extractor.as_ref(), &params.prompt)
        .await
        .map(Json)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| Error::Config {
                message: format!("Invalid CORS origin {origin:?}: {e}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Builds the application router.
///
/// # Errors
/// Returns [`Error::Config`] if a CORS origin is not a valid header value.
pub fn router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(health_check))
        .route("/inventory/chat", get(inventory_chat))
        .route("/soda/chat", get(inventory_chat))
        .route("/transaction/chat", post(transaction_chat))
        .with_state(state)
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}
