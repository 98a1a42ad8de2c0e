use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, info, warn};

use giftlist_db::models::GiftRow;
use giftlist_types::api::DeleteGiftResponse;
use giftlist_types::{Gift, NewGift};

use crate::AppState;
use crate::error::ApiError;

/// GET /gifts: every suggestion, newest first.
pub async fn list_gifts(State(state): State<AppState>) -> Result<Json<Vec<Gift>>, ApiError> {
    let rows = blocking(state, "Error fetching gifts", |state| state.db.list_gifts()).await?;

    Ok(Json(rows.into_iter().map(gift_from_row).collect()))
}

/// POST /gifts: validate, insert, and echo back the stored row.
pub async fn create_gift(
    State(state): State<AppState>,
    payload: Result<Json<NewGift>, JsonRejection>,
) -> Result<(StatusCode, Json<Gift>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let gift = req.validate()?;

    let row = blocking(state, "Error adding gift", move |state| {
        state.db.insert_gift(&gift.nome, &gift.presente, &gift.link)
    })
    .await?;

    info!("Gift {} suggested by {}", row.id, row.nome);
    Ok((StatusCode::CREATED, Json(gift_from_row(row))))
}

/// DELETE /gifts/{id}: 404 when nothing was removed.
pub async fn delete_gift(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteGiftResponse>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let removed = blocking(state, "Error deleting gift", move |state| state.db.delete_gift(id)).await?;
    if !removed {
        return Err(ApiError::NotFound(id));
    }

    info!("Gift {} deleted", id);
    Ok(Json(DeleteGiftResponse {
        message: "Gift deleted".into(),
    }))
}

/// Run blocking DB work off the async runtime.
async fn blocking<F, T>(state: AppState, context: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::storage(context, e)
        })?
        .map_err(|e| ApiError::storage(context, e))
}

fn gift_from_row(row: GiftRow) -> Gift {
    let created_at = parse_timestamp(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on gift {}", row.created_at, row.id);
        DateTime::default()
    });

    Gift {
        id: row.id,
        nome: row.nome,
        presente: row.presente,
        link: row.link,
        created_at,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by plain datetime('now') have no timezone suffix.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}
