pub mod error;
pub mod gifts;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get},
};

use giftlist_db::Database;
use giftlist_types::api::HealthResponse;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// The gift routes, relative to wherever the caller nests them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/gifts", get(gifts::list_gifts).post(gifts::create_gift))
        .route("/gifts/{id}", delete(gifts::delete_gift))
        .with_state(state)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
