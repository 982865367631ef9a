use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

use crate::database::CompanyStore;
use crate::handlers::companies;
use crate::middleware::GateChain;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CompanyStore>,
}

impl AppState {
    pub fn new(store: impl CompanyStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the HTTP surface. Create and delete sit behind `gates`; reads and
/// updates are open.
pub fn router(state: AppState, gates: &GateChain) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/companies",
            get(companies::list).merge(gates.wrap(post(companies::create))),
        )
        .route(
            "/companies/:id",
            get(companies::get)
                .put(companies::update)
                .merge(gates.wrap(delete(companies::delete))),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
