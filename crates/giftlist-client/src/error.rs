use std::path::PathBuf;

use giftlist_types::ValidationError;

use crate::remote::RemoteError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Local cache error: {0}")]
    Store(#[from] StoreError),

    #[error("No gift with id {0} in the local cache")]
    NotFound(i64),

    #[error("Gift was not saved to any storage path")]
    NotSaved,

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid gift file {}: {source}", .path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
