use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// A single gift suggestion. Records are created and deleted, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
    pub id: i64,
    pub nome: String,
    pub presente: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    pub created_at: DateTime<Utc>,
}

impl Gift {
    /// Ordering used for every list: newest `created_at` first, then highest id.
    pub fn newest_first(a: &Gift, b: &Gift) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }

    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

/// Creation payload, as sent by the form and accepted by `POST /gifts`.
///
/// Missing or `null` fields deserialize to empty strings so that validation,
/// not the JSON extractor, decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGift {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub presente: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name and gift are required")]
    MissingFields,
    #[error("Please provide a valid URL")]
    InvalidUrl,
}

impl ValidationError {
    /// Short label used as the `error` field of API error bodies.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Incomplete data",
            ValidationError::InvalidUrl => "Invalid URL",
        }
    }
}

impl NewGift {
    pub fn new(nome: impl Into<String>, presente: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            presente: presente.into(),
            link: link.into(),
        }
    }

    /// Trim every field and check it. `link` may be empty; otherwise it must
    /// parse as an absolute URL.
    pub fn validate(&self) -> Result<NewGift, ValidationError> {
        let nome = self.nome.trim();
        let presente = self.presente.trim();
        let link = self.link.trim();

        if nome.is_empty() || presente.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !link.is_empty() {
            Url::parse(link).map_err(|_| ValidationError::InvalidUrl)?;
        }

        Ok(NewGift::new(nome, presente, link))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
