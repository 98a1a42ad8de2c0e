use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Everything the server reads from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.into())
        };

        let port = var("GIFTLIST_PORT", "3000");
        let port: u16 = port
            .parse()
            .with_context(|| format!("GIFTLIST_PORT is not a valid port: {}", port))?;

        Ok(Self {
            host: var("GIFTLIST_HOST", "0.0.0.0"),
            port,
            db_path: var("GIFTLIST_DB_PATH", "gifts.db").into(),
            static_dir: var("GIFTLIST_STATIC_DIR", "public").into(),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address: {}", addr))
    }
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
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from("gifts.db"));
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("GIFTLIST_HOST", "127.0.0.1"),
            ("GIFTLIST_PORT", "8080"),
            ("GIFTLIST_STATIC_DIR", "site"),
        ]))
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("site"));
    }

    #[test]
    fn rejects_bad_port() {
        assert!(ServerConfig::from_lookup(lookup(&[("GIFTLIST_PORT", "http")])).is_err());
    }
}
