use crate::content::Content;
use crate::content_type::ContentType;
use crate::error::StorageError;
use crate::field::StorageField;
use crate::ids::{ContentId, ContentTypeId, LanguageId};
use crate::language::Language;

/// Read access to content type schemas.
pub trait TypeCatalog: Send + Sync {
    /// Load the current schema of a content type.
    fn load(&self, id: ContentTypeId) -> Result<ContentType, StorageError>;
}

/// Read access to languages.
pub trait LanguageCatalog: Send + Sync {
    fn load(&self, id: LanguageId) -> Result<Language, StorageError>;
}

/// Write access to the stored fields of content versions.
pub trait ContentStore: Send + Sync {
    /// Replace the full field set of a content version.
    fn update_fields(
        &self,
        content_id: ContentId,
        version_no: u32,
        fields: &[StorageField],
    ) -> Result<(), StorageError>;
}

/// Listing of stored content, used when migrating content to a changed type.
pub trait ContentSource: Send + Sync {
    /// All stored versions of all content items of a content type.
    fn list_by_content_type(
        &self,
        content_type_id: ContentTypeId,
    ) -> Result<Vec<Content>, StorageError>;
}

// In-memory implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::RwLock;

    /// In-memory content type catalog.
    #[derive(Default)]
    pub struct InMemoryTypeCatalog {
        types: RwLock<BTreeMap<ContentTypeId, ContentType>>,
    }

    impl InMemoryTypeCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace a content type.
        pub fn save(&self, content_type: ContentType) {
            self.types
                .write()
                .unwrap()
                .insert(content_type.id, content_type);
        }
    }

    impl TypeCatalog for InMemoryTypeCatalog {
        fn load(&self, id: ContentTypeId) -> Result<ContentType, StorageError> {
            self.types
                .read()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StorageError::ContentTypeNotFound(id))
        }
    }

    /// In-memory language catalog.
    #[derive(Default)]
    pub struct InMemoryLanguageCatalog {
        languages: RwLock<BTreeMap<LanguageId, Language>>,
    }

    impl InMemoryLanguageCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn save(&self, language: Language) {
            self.languages
                .write()
                .unwrap()
                .insert(language.id, language);
        }
    }

    impl LanguageCatalog for InMemoryLanguageCatalog {
        fn load(&self, id: LanguageId) -> Result<Language, StorageError> {
            self.languages
                .read()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StorageError::LanguageNotFound(id))
        }
    }

    /// A recorded `update_fields` call.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FieldUpdate {
        pub content_id: ContentId,
        pub version_no: u32,
        pub fields: Vec<StorageField>,
    }

    /// In-memory content store that records every write.
    #[derive(Default)]
    pub struct InMemoryContentStore {
        contents: RwLock<BTreeMap<(ContentId, u32), Content>>,
        updates: RwLock<Vec<FieldUpdate>>,
        fail_writes: RwLock<Option<String>>,
    }

    impl InMemoryContentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, content: Content) {
            self.contents
                .write()
                .unwrap()
                .insert((content.id, content.version_no), content);
        }

        pub fn get(&self, content_id: ContentId, version_no: u32) -> Option<Content> {
            self.contents
                .read()
                .unwrap()
                .get(&(content_id, version_no))
                .cloned()
        }

        /// Every `update_fields` call received so far, in order.
        pub fn updates(&self) -> Vec<FieldUpdate> {
            self.updates.read().unwrap().clone()
        }

        /// Make subsequent writes fail with a persistence error.
        pub fn fail_writes_with(&self, message: impl Into<String>) {
            *self.fail_writes.write().unwrap() = Some(message.into());
        }
    }

    impl ContentStore for InMemoryContentStore {
        fn update_fields(
            &self,
            content_id: ContentId,
            version_no: u32,
            fields: &[StorageField],
        ) -> Result<(), StorageError> {
            if let Some(message) = self.fail_writes.read().unwrap().clone() {
                return Err(StorageError::Persistence(message));
            }

            let mut contents = self.contents.write().unwrap();
            let content = contents
                .get_mut(&(content_id, version_no))
                .ok_or(StorageError::ContentNotFound(content_id, version_no))?;
            content.fields = fields.to_vec();

            self.updates.write().unwrap().push(FieldUpdate {
                content_id,
                version_no,
                fields: fields.to_vec(),
            });
            Ok(())
        }
    }

    impl ContentSource for InMemoryContentStore {
        fn list_by_content_type(
            &self,
            content_type_id: ContentTypeId,
        ) -> Result<Vec<Content>, StorageError> {
            Ok(self
                .contents
                .read()
                .unwrap()
                .values()
                .filter(|c| c.content_type_id == content_type_id)
                .cloned()
                .collect())
        }
    }

}
