//! Felt - keeps stored content fields in line with their content types.

pub mod config;
pub mod migrate;

pub use config::{Config, ConfigError};
pub use migrate::{migrate_content_type, MigrationStats};

// Re-export for convenience
pub use felt_core::{Content, ContentType, FieldHandler, Policy, StorageError};

/// Top-level error of the felt binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
