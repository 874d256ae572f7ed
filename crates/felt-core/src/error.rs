use thiserror::Error;

use crate::ids::{ContentId, ContentTypeId, FieldDefinitionId, LanguageId};

#[derive(Error, Debug, PartialEq)]
pub enum StorageError {
    #[error("Content type not found: {0}")]
    ContentTypeNotFound(ContentTypeId),

    #[error("Language not found: {0}")]
    LanguageNotFound(LanguageId),

    #[error("Content not found: {0}, version={1}")]
    ContentNotFound(ContentId, u32),

    #[error("Could not find identifier for {field_definition_id} in {content_type_id}")]
    FieldDefinitionNotFound {
        field_definition_id: FieldDefinitionId,
        content_type_id: ContentTypeId,
    },

    #[error("No field definition with identifier \"{identifier}\" in {content_type_id}")]
    FieldDefinitionIdentifierNotFound {
        identifier: String,
        content_type_id: ContentTypeId,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl StorageError {
    /// Whether this error is one of the lookup failures (as opposed to a
    /// failure of the backing store itself).
    pub fn is_not_found(&self) -> bool {
        !matches!(self, StorageError::Persistence(_))
    }
}
