use std::sync::Arc;

use redb::Database;

use felt_core::{ContentType, ContentTypeId, StorageError, TypeCatalog};

use crate::tables::CONTENT_TYPES_TABLE;
use crate::{create_table, persistence};

/// redb implementation of TypeCatalog.
pub struct RedbTypeCatalog {
    db: Arc<Database>,
}

impl RedbTypeCatalog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        create_table(db, CONTENT_TYPES_TABLE)
    }

    /// Insert or replace a content type schema.
    pub fn save(&self, content_type: &ContentType) -> Result<(), StorageError> {
        let value = serde_json::to_vec(content_type).map_err(persistence)?;

        let write_txn = self.db.begin_write().map_err(persistence)?;
        {
            let mut table = write_txn
                .open_table(CONTENT_TYPES_TABLE)
                .map_err(persistence)?;
            table
                .insert(content_type.id.0, value.as_slice())
                .map_err(persistence)?;
        }
        write_txn.commit().map_err(persistence)?;

        Ok(())
    }
}

impl TypeCatalog for RedbTypeCatalog {
    fn load(&self, id: ContentTypeId) -> Result<ContentType, StorageError> {
        let read_txn = self.db.begin_read().map_err(persistence)?;
        let table = read_txn
            .open_table(CONTENT_TYPES_TABLE)
            .map_err(persistence)?;

        let Some(value) = table.get(id.0).map_err(persistence)? else {
            return Err(StorageError::ContentTypeNotFound(id));
        };
        serde_json::from_slice(value.value()).map_err(persistence)
    }
}
