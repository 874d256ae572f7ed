use std::sync::Arc;

use redb::{Database, ReadableTable};

use felt_core::{
    Content, ContentId, ContentSource, ContentStore, ContentTypeId, StorageError, StorageField,
};

use crate::tables::{encode_content_key, CONTENTS_TABLE};
use crate::{create_table, persistence};

/// redb implementation of ContentStore and ContentSource.
///
/// Each content version is stored as one row holding all of its fields, so
/// replacing the field set is a single-row write.
pub struct RedbContentStore {
    db: Arc<Database>,
}

impl RedbContentStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        create_table(db, CONTENTS_TABLE)
    }

    /// Store a content version, replacing any existing row for it.
    pub fn create(&self, content: &Content) -> Result<(), StorageError> {
        let key = encode_content_key(content.id.0, content.version_no);
        let value = serde_json::to_vec(content).map_err(persistence)?;

        let write_txn = self.db.begin_write().map_err(persistence)?;
        {
            let mut table = write_txn.open_table(CONTENTS_TABLE).map_err(persistence)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(persistence)?;
        }
        write_txn.commit().map_err(persistence)?;

        Ok(())
    }

    /// Load a content version.
    pub fn load(&self, content_id: ContentId, version_no: u32) -> Result<Content, StorageError> {
        let key = encode_content_key(content_id.0, version_no);

        let read_txn = self.db.begin_read().map_err(persistence)?;
        let table = read_txn.open_table(CONTENTS_TABLE).map_err(persistence)?;

        let Some(value) = table.get(key.as_slice()).map_err(persistence)? else {
            return Err(StorageError::ContentNotFound(content_id, version_no));
        };
        serde_json::from_slice(value.value()).map_err(persistence)
    }
}

impl ContentStore for RedbContentStore {
    fn update_fields(
        &self,
        content_id: ContentId,
        version_no: u32,
        fields: &[StorageField],
    ) -> Result<(), StorageError> {
        let key = encode_content_key(content_id.0, version_no);

        let write_txn = self.db.begin_write().map_err(persistence)?;
        {
            let mut table = write_txn.open_table(CONTENTS_TABLE).map_err(persistence)?;

            let mut content: Content = match table.get(key.as_slice()).map_err(persistence)? {
                Some(existing) => serde_json::from_slice(existing.value()).map_err(persistence)?,
                None => return Err(StorageError::ContentNotFound(content_id, version_no)),
            };
            content.fields = fields.to_vec();

            let value = serde_json::to_vec(&content).map_err(persistence)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(persistence)?;
        }
        write_txn.commit().map_err(persistence)?;

        Ok(())
    }
}

impl ContentSource for RedbContentStore {
    fn list_by_content_type(
        &self,
        content_type_id: ContentTypeId,
    ) -> Result<Vec<Content>, StorageError> {
        let read_txn = self.db.begin_read().map_err(persistence)?;
        let table = read_txn.open_table(CONTENTS_TABLE).map_err(persistence)?;

        let mut contents = Vec::new();
        for entry in table.iter().map_err(persistence)? {
            let (_, value) = entry.map_err(persistence)?;
            let content: Content = serde_json::from_slice(value.value()).map_err(persistence)?;
            if content.content_type_id == content_type_id {
                contents.push(content);
            }
        }

        Ok(contents)
    }
}
