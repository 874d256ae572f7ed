use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use felt::{migrate_content_type, AppError, Config, FieldHandler, MigrationStats};
use felt_db::{init_database, RedbContentStore, RedbLanguageCatalog, RedbTypeCatalog};

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(stats) if stats.failed == 0 => {}
        Ok(stats) => {
            tracing::error!("{} content versions could not be migrated", stats.failed);
            std::process::exit(1);
        }
        Err(AppError::Config(e)) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Required: FELT_CONTENT_TYPE_ID=<number>");
            eprintln!("Optional: FELT_DB_PATH, FELT_FAIL_FAST");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<MigrationStats, AppError> {
    let config = Config::from_env()?;

    tracing::info!("Starting Felt migration");
    tracing::info!("Content type: {}", config.content_type_id);
    tracing::info!("Database path: {}", config.db_path.display());

    let db = init_database(&config.db_path)?;

    let type_catalog = Arc::new(RedbTypeCatalog::new(db.clone()));
    let language_catalog = Arc::new(RedbLanguageCatalog::new(db.clone()));
    let content_store = Arc::new(RedbContentStore::new(db));

    let handler = FieldHandler::new(type_catalog, language_catalog, content_store.clone());

    let stats = migrate_content_type(
        &handler,
        content_store.as_ref(),
        config.content_type_id,
        config.fail_fast,
    )?;

    Ok(stats)
}
