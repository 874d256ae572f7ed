//! Felt DB - redb implementation of the catalog and content store traits.

pub mod content_store;
pub mod language_catalog;
pub mod tables;
pub mod type_catalog;

pub use content_store::RedbContentStore;
pub use language_catalog::RedbLanguageCatalog;
pub use type_catalog::RedbTypeCatalog;

use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use felt_core::StorageError;

/// Initialize a database with all required tables.
pub fn init_database(path: impl AsRef<Path>) -> Result<Arc<Database>, StorageError> {
    let db = Database::create(path).map_err(persistence)?;

    RedbTypeCatalog::init_tables(&db)?;
    RedbLanguageCatalog::init_tables(&db)?;
    RedbContentStore::init_tables(&db)?;

    Ok(Arc::new(db))
}

/// Map a redb or serde_json failure to a persistence error.
pub(crate) fn persistence(e: impl std::fmt::Display) -> StorageError {
    StorageError::Persistence(e.to_string())
}

/// Create a table if it does not exist yet.
pub(crate) fn create_table<K, V>(
    db: &Database,
    table: TableDefinition<K, V>,
) -> Result<(), StorageError>
where
    K: redb::Key + 'static,
    V: redb::Value + 'static,
{
    let write_txn = db.begin_write().map_err(persistence)?;
    {
        let _ = write_txn.open_table(table).map_err(persistence)?;
    }
    write_txn.commit().map_err(persistence)?;
    Ok(())
}
