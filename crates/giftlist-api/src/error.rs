use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use giftlist_types::ValidationError;
use giftlist_types::api::ErrorBody;

/// Every failure a gift handler can return. Each variant maps to one status
/// code and an `{error, message}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("No gift with id {0}")]
    NotFound(i64),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn storage(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Storage {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(e) => ErrorBody {
                error: e.title().into(),
                message: e.to_string(),
            },
            ApiError::BadRequest(message) => ErrorBody {
                error: "Invalid request".into(),
                message: message.clone(),
            },
            ApiError::NotFound(_) => ErrorBody {
                error: "Gift not found".into(),
                message: self.to_string(),
            },
            ApiError::Storage { context, source } => ErrorBody {
                error: (*context).into(),
                message: source.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { context, source } = &self {
            error!("{}: {:#}", context, source);
        }
        (self.status(), Json(self.body())).into_response()
    }
}
