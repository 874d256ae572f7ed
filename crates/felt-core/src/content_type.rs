use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::ids::{ContentTypeId, FieldDefinitionId, LanguageId};
use crate::value::FieldValue;

/// One field slot of a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldDefinitionId,
    /// Stable key, unchanged when the numeric id changes.
    pub identifier: String,
    pub field_type: String,
    pub is_translatable: bool,
    pub default_value: FieldValue,
}

impl FieldDefinition {
    pub fn new(
        id: FieldDefinitionId,
        identifier: impl Into<String>,
        field_type: impl Into<String>,
        is_translatable: bool,
        default_value: FieldValue,
    ) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            field_type: field_type.into(),
            is_translatable,
            default_value,
        }
    }
}

/// Schema of a content item: its ordered field definitions and default
/// language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: ContentTypeId,
    pub identifier: String,
    pub initial_language_id: LanguageId,
    pub field_definitions: Vec<FieldDefinition>,
}

impl ContentType {
    pub fn new(
        id: ContentTypeId,
        identifier: impl Into<String>,
        initial_language_id: LanguageId,
        field_definitions: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            initial_language_id,
            field_definitions,
        }
    }

    /// Resolve the identifier of the field definition with the given id.
    pub fn field_definition_identifier(
        &self,
        field_definition_id: FieldDefinitionId,
    ) -> Result<&str, StorageError> {
        self.field_definitions
            .iter()
            .find(|def| def.id == field_definition_id)
            .map(|def| def.identifier.as_str())
            .ok_or(StorageError::FieldDefinitionNotFound {
                field_definition_id,
                content_type_id: self.id,
            })
    }

    /// Field definitions indexed by identifier.
    pub fn field_definitions_by_identifier(&self) -> HashMap<&str, &FieldDefinition> {
        self.field_definitions
            .iter()
            .map(|def| (def.identifier.as_str(), def))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ContentType {
        ContentType::new(
            ContentTypeId(1),
            "article",
            LanguageId(2),
            vec![
                FieldDefinition::new(FieldDefinitionId(1), "title", "text", true, "".into()),
                FieldDefinition::new(FieldDefinitionId(5), "body", "richtext", true, "".into()),
            ],
        )
    }

    #[test]
    fn test_field_definition_identifier() {
        let ty = article();
        assert_eq!(ty.field_definition_identifier(FieldDefinitionId(5)).unwrap(), "body");
    }

    #[test]
    fn test_field_definition_identifier_not_found() {
        let ty = article();
        assert_eq!(
            ty.field_definition_identifier(FieldDefinitionId(3)),
            Err(StorageError::FieldDefinitionNotFound {
                field_definition_id: FieldDefinitionId(3),
                content_type_id: ContentTypeId(1),
            })
        );
    }

    #[test]
    fn test_field_definitions_by_identifier() {
        let ty = article();
        let by_identifier = ty.field_definitions_by_identifier();
        assert_eq!(by_identifier.len(), 2);
        assert_eq!(by_identifier["title"].id, FieldDefinitionId(1));
        assert!(!by_identifier.contains_key("subtitle"));
    }
}
