//! Process configuration
//!
//! Read once at startup (after `dotenvy::dotenv()`) and passed down to the
//! stores and services. Nothing reads the environment after this point.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::BibleError;

pub const DEFAULT_READING_VERSION: &str = "KR92";
pub const DEFAULT_STRONGS_VERSION: &str = "KJV";
pub const DEFAULT_TEXT_SEARCH_LIMIT: i64 = 50;
pub const DEFAULT_PORT: u16 = 3000;

/// Which store implementation backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    /// In-memory store seeded with the bundled sample dataset
    Memory,
}

impl FromStr for Backend {
    type Err = BibleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Backend::Postgres),
            "memory" | "demo" => Ok(Backend::Memory),
            other => Err(BibleError::InvalidInput(format!(
                "unknown BIBLE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub database_url: String,
    pub database_pool_size: u32,
    pub port: u16,
    /// Version shown when the caller does not pick one
    pub default_version: String,
    /// Version whose verses carry Strong's tags
    pub strongs_version: String,
    pub text_search_limit: i64,
    pub position_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Postgres,
            database_url: "postgresql://localhost:5432/bible".to_string(),
            database_pool_size: 10,
            port: DEFAULT_PORT,
            default_version: DEFAULT_READING_VERSION.to_string(),
            strongs_version: DEFAULT_STRONGS_VERSION.to_string(),
            text_search_limit: DEFAULT_TEXT_SEARCH_LIMIT,
            position_file: PathBuf::from(".bible-position.json"),
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, BibleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BibleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(backend) = lookup("BIBLE_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(size) = lookup("DATABASE_POOL_SIZE") {
            config.database_pool_size = parse_number("DATABASE_POOL_SIZE", &size)?;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(version) = lookup("DEFAULT_VERSION") {
            config.default_version = version;
        }
        if let Some(version) = lookup("STRONGS_VERSION") {
            config.strongs_version = version;
        }
        if let Some(limit) = lookup("TEXT_SEARCH_LIMIT") {
            config.text_search_limit = parse_number("TEXT_SEARCH_LIMIT", &limit)?;
            if config.text_search_limit <= 0 {
                return Err(BibleError::InvalidInput(
                    "TEXT_SEARCH_LIMIT must be positive".to_string(),
                ));
            }
        }
        if let Some(path) = lookup("POSITION_FILE") {
            config.position_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, BibleError> {
    value
        .trim()
        .parse()
        .map_err(|_| BibleError::InvalidInput(format!("{} is not a valid number: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(config.default_version, "KR92");
        assert_eq!(config.strongs_version, "KJV");
        assert_eq!(config.text_search_limit, 50);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIBLE_BACKEND", "memory"),
            ("PORT", "8080"),
            ("TEXT_SEARCH_LIMIT", "20"),
            ("DEFAULT_VERSION", "fin2017"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.text_search_limit, 20);
        assert_eq!(config.default_version, "fin2017");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("BIBLE_BACKEND", "redis")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("TEXT_SEARCH_LIMIT", "0")])).is_err());
    }
}
