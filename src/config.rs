//! Application configuration loaded from the environment at startup.
//!
//! A `.env` file in the working directory is honoured outside of tests.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub seed_sample_cards: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cardify.sqlite3"),
            seed_sample_cards: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = match lookup("CARDIFY_DB_PATH") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "CARDIFY_DB_PATH".to_string(),
                    "path must not be empty".to_string(),
                ));
            }
            Some(path) => PathBuf::from(path),
            None => defaults.database_path,
        };

        let seed_sample_cards = match lookup("CARDIFY_SEED_SAMPLE") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue("CARDIFY_SEED_SAMPLE".to_string(), value.clone())
            })?,
            None => defaults.seed_sample_cards,
        };

        let log_filter = lookup("RUST_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            database_path,
            seed_sample_cards,
            log_filter,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("cardify.sqlite3"));
        assert!(config.seed_sample_cards);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CARDIFY_DB_PATH", "/tmp/cards.db"),
            ("CARDIFY_SEED_SAMPLE", "no"),
            ("RUST_LOG", "cardify=debug"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.db"));
        assert!(!config.seed_sample_cards);
        assert_eq!(config.log_filter, "cardify=debug");
    }

    #[test]
    fn test_empty_db_path_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CARDIFY_DB_PATH", "  ")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(key, _)) if key == "CARDIFY_DB_PATH"));
    }

    #[test]
    fn test_bad_seed_flag_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CARDIFY_SEED_SAMPLE", "maybe")]));
        assert!(result.is_err());
    }
}
