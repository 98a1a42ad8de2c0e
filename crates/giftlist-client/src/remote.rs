use reqwest::{Client, Response, StatusCode};
use url::Url;

use giftlist_types::api::ErrorBody;
use giftlist_types::{Gift, NewGift};

use crate::fallback::Failure;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never produced a response: DNS, refused connection, timeout.
    #[error("API unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}{}", describe(.body))]
    Status {
        status: StatusCode,
        body: Option<ErrorBody>,
    },

    /// The API answered 2xx but the body was not what we expected.
    #[error("Unexpected API response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl RemoteError {
    pub fn failure(&self) -> Failure {
        match self {
            RemoteError::Unreachable(_) => Failure::Connectivity,
            RemoteError::Status { .. } | RemoteError::Decode(_) => Failure::Rejected,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin client for the three gift routes under a base URL.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    base: String,
}

impl RemoteClient {
    pub fn new(base: &Url) -> Self {
        Self {
            http: Client::new(),
            base: base.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn list(&self) -> Result<Vec<Gift>, RemoteError> {
        let resp = self
            .http
            .get(format!("{}/gifts", self.base))
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        check(resp).await?.json().await.map_err(RemoteError::Decode)
    }

    pub async fn create(&self, gift: &NewGift) -> Result<Gift, RemoteError> {
        let resp = self
            .http
            .post(format!("{}/gifts", self.base))
            .json(gift)
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        check(resp).await?.json().await.map_err(RemoteError::Decode)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        let resp = self
            .http
            .delete(format!("{}/gifts/{}", self.base, id))
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        check(resp).await?;
        Ok(())
    }
}

fn describe(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .map(|b| format!(": {} ({})", b.error, b.message))
        .unwrap_or_default()
}

async fn check(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.json::<ErrorBody>().await.ok();
    Err(RemoteError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_drops_trailing_slash() {
        let url = Url::parse("http://localhost:3000/api/").unwrap();
        assert_eq!(RemoteClient::new(&url).base(), "http://localhost:3000/api");
    }

    #[test]
    fn status_errors_are_rejections() {
        let err = RemoteError::Status {
            status: StatusCode::NOT_FOUND,
            body: Some(ErrorBody {
                error: "Gift not found".into(),
                message: "No gift with id 3".into(),
            }),
        };
        assert_eq!(err.failure(), Failure::Rejected);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            err.to_string(),
            "API returned 404 Not Found: Gift not found (No gift with id 3)"
        );
    }
}
