use serde::{Deserialize, Serialize};

// -- Errors --

/// Body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

// -- Gifts --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGiftResponse {
    pub message: String,
}

// -- Health --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
