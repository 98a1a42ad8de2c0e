use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ClientError;

const DEFAULT_RELOAD_DELAY_MS: u64 = 500;

/// Client settings. Passed into the controller at construction; nothing
/// reads the environment after this is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the API, e.g. `http://localhost:3000/api`.
    /// `None` means local-only mode.
    pub api_url: Option<Url>,
    pub cache_path: PathBuf,
    /// Pause between a successful submit and the list reload.
    pub reload_delay: Duration,
}

impl ClientConfig {
    pub fn local_only(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: None,
            cache_path: cache_path.into(),
            reload_delay: Duration::from_millis(DEFAULT_RELOAD_DELAY_MS),
        }
    }

    pub fn with_remote(api_url: Url, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: Some(api_url),
            ..Self::local_only(cache_path)
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("GIFTLIST_API_URL")
            .map(|raw| {
                Url::parse(raw.trim())
                    .map_err(|e| ClientError::Config(format!("GIFTLIST_API_URL '{}': {}", raw, e)))
            })
            .transpose()?;

        let cache_path = var("GIFTLIST_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_path);

        let reload_delay = match var("GIFTLIST_RELOAD_DELAY_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("GIFTLIST_RELOAD_DELAY_MS '{}' is not a number", raw))
            })?,
            None => DEFAULT_RELOAD_DELAY_MS,
        };

        Ok(Self {
            api_url,
            cache_path,
            reload_delay: Duration::from_millis(reload_delay),
        })
    }

    pub fn is_local_only(&self) -> bool {
        self.api_url.is_none()
    }
}

fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("giftlist").join("cache.json"))
        .unwrap_or_else(|| PathBuf::from("giftlist-cache.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_api_url_means_local_only() {
        let config = ClientConfig::from_lookup(lookup(&[("GIFTLIST_API_URL", "  ")])).unwrap();
        assert!(config.is_local_only());
        assert_eq!(config.reload_delay, Duration::from_millis(500));
    }

    #[test]
    fn reads_remote_and_cache_settings() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GIFTLIST_API_URL", "http://localhost:3000/api"),
            ("GIFTLIST_CACHE_PATH", "/tmp/gifts.json"),
            ("GIFTLIST_RELOAD_DELAY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.unwrap().as_str(), "http://localhost:3000/api");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/gifts.json"));
        assert_eq!(config.reload_delay, Duration::ZERO);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(ClientConfig::from_lookup(lookup(&[("GIFTLIST_API_URL", "localhost")])).is_err());
        assert!(
            ClientConfig::from_lookup(lookup(&[("GIFTLIST_RELOAD_DELAY_MS", "soon")])).is_err()
        );
    }
}
