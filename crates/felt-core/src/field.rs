use serde::{Deserialize, Serialize};

use crate::ids::FieldDefinitionId;
use crate::value::FieldValue;

/// A single attribute value of a content item in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_definition_id: FieldDefinitionId,
    pub field_type: String,
    pub language_code: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(
        field_definition_id: FieldDefinitionId,
        field_type: impl Into<String>,
        language_code: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        Self {
            field_definition_id,
            field_type: field_type.into(),
            language_code: language_code.into(),
            value,
        }
    }
}

/// A field annotated with the identifier of its field definition.
///
/// The identifier survives content type edits that renumber field
/// definitions, so it is the key fields are correlated by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageField {
    pub field: Field,
    pub field_definition_identifier: String,
}

impl StorageField {
    pub fn new(field: Field, field_definition_identifier: impl Into<String>) -> Self {
        Self {
            field,
            field_definition_identifier: field_definition_identifier.into(),
        }
    }

    pub fn language_code(&self) -> &str {
        &self.field.language_code
    }

    /// Copy of this storage field moved to another language.
    pub fn translated(&self, language_code: &str) -> Self {
        let mut copy = self.clone();
        copy.field.language_code = language_code.to_string();
        copy
    }
}
