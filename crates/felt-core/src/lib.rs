//! Felt Core - Content field model and reconciliation.
//!
//! This crate contains the content, content type and field types, the
//! collaborator traits for loading schemas and writing fields, and the
//! `FieldHandler` that reconciles stored fields with their content type.
//! It has no dependencies on other Felt crates.

pub mod content;
pub mod content_type;
pub mod error;
pub mod field;
pub mod field_map;
pub mod handler;
pub mod ids;
pub mod language;
pub mod policy;
pub mod storage;
pub mod value;

// Re-exports for convenience
pub use content::Content;
pub use content_type::{ContentType, FieldDefinition};
pub use error::StorageError;
pub use field::{Field, StorageField};
pub use field_map::{FieldGroup, FieldMap};
pub use handler::FieldHandler;
pub use ids::{ContentId, ContentTypeId, FieldDefinitionId, LanguageId};
pub use language::Language;
pub use policy::Policy;
pub use storage::{ContentSource, ContentStore, LanguageCatalog, TypeCatalog};
pub use value::FieldValue;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::{
    FieldUpdate, InMemoryContentStore, InMemoryLanguageCatalog, InMemoryTypeCatalog,
};
