use std::sync::Arc;

use redb::Database;

use felt_core::{Language, LanguageCatalog, LanguageId, StorageError};

use crate::tables::LANGUAGES_TABLE;
use crate::{create_table, persistence};

/// redb implementation of LanguageCatalog.
pub struct RedbLanguageCatalog {
    db: Arc<Database>,
}

impl RedbLanguageCatalog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        create_table(db, LANGUAGES_TABLE)
    }

    /// Insert or replace a language.
    pub fn save(&self, language: &Language) -> Result<(), StorageError> {
        let value = serde_json::to_vec(language).map_err(persistence)?;

        let write_txn = self.db.begin_write().map_err(persistence)?;
        {
            let mut table = write_txn.open_table(LANGUAGES_TABLE).map_err(persistence)?;
            table
                .insert(language.id.0, value.as_slice())
                .map_err(persistence)?;
        }
        write_txn.commit().map_err(persistence)?;

        Ok(())
    }
}

impl LanguageCatalog for RedbLanguageCatalog {
    fn load(&self, id: LanguageId) -> Result<Language, StorageError> {
        let read_txn = self.db.begin_read().map_err(persistence)?;
        let table = read_txn.open_table(LANGUAGES_TABLE).map_err(persistence)?;

        let Some(value) = table.get(id.0).map_err(persistence)? else {
            return Err(StorageError::LanguageNotFound(id));
        };
        serde_json::from_slice(value.value()).map_err(persistence)
    }
}
