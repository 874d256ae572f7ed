use std::path::PathBuf;

use felt_core::ContentTypeId;

/// Migration configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub content_type_id: ContentTypeId,
    pub fail_fast: bool,
}

impl Config {
    /// Load configuration from environment variables.
    /// FELT_DB_PATH defaults to "./felt.redb", FELT_FAIL_FAST to false.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = lookup("FELT_DB_PATH")
            .unwrap_or_else(|| "./felt.redb".to_string())
            .into();

        let content_type_id = lookup("FELT_CONTENT_TYPE_ID")
            .ok_or(ConfigError::Missing("FELT_CONTENT_TYPE_ID"))?
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid("FELT_CONTENT_TYPE_ID", "must be a valid u64"))?;

        let fail_fast = match lookup("FELT_FAIL_FAST").as_deref() {
            None | Some("") => false,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("FELT_FAIL_FAST", "must be true or false"))?,
        };

        Ok(Config {
            db_path,
            content_type_id: ContentTypeId(content_type_id),
            fail_fast,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
