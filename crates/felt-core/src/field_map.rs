//! Ordered index of storage fields by field definition identifier and
//! language code.
//!
//! Flattening yields groups in the order their identifiers were first seen
//! and, within a group, languages in the order they were first inserted.
//! That order is the order fields are handed to the content store.

use crate::field::StorageField;

/// All values of one field definition, keyed by language code.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub identifier: String,
    entries: Vec<(String, StorageField)>,
}

impl FieldGroup {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, language_code: &str) -> Option<&StorageField> {
        self.entries
            .iter()
            .find(|(code, _)| code == language_code)
            .map(|(_, field)| field)
    }

    pub fn contains(&self, language_code: &str) -> bool {
        self.get(language_code).is_some()
    }

    /// Insert a value for a language. An existing value is replaced in place,
    /// a new language is appended.
    pub fn insert(&mut self, language_code: impl Into<String>, field: StorageField) {
        let language_code = language_code.into();
        match self
            .entries
            .iter_mut()
            .find(|(code, _)| *code == language_code)
        {
            Some((_, existing)) => *existing = field,
            None => self.entries.push((language_code, field)),
        }
    }

    pub fn remove(&mut self, language_code: &str) -> Option<StorageField> {
        let pos = self
            .entries
            .iter()
            .position(|(code, _)| code == language_code)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn entries(&self) -> &[(String, StorageField)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Storage fields grouped by field definition identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    groups: Vec<FieldGroup>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index storage fields. When two fields share identifier and language,
    /// the later one wins.
    pub fn from_storage_fields(storage_fields: impl IntoIterator<Item = StorageField>) -> Self {
        let mut map = Self::new();
        for storage_field in storage_fields {
            let language_code = storage_field.field.language_code.clone();
            map.group_mut_or_insert(&storage_field.field_definition_identifier)
                .insert(language_code, storage_field);
        }
        map
    }

    pub fn group(&self, identifier: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.identifier == identifier)
    }

    /// Get the group for an identifier, appending an empty one if missing.
    pub fn group_mut_or_insert(&mut self, identifier: &str) -> &mut FieldGroup {
        let pos = match self.groups.iter().position(|g| g.identifier == identifier) {
            Some(pos) => pos,
            None => {
                self.groups.push(FieldGroup::new(identifier));
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos]
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut FieldGroup> {
        self.groups.iter_mut()
    }

    pub fn get(&self, identifier: &str, language_code: &str) -> Option<&StorageField> {
        self.group(identifier)?.get(language_code)
    }

    /// Total number of storage fields.
    pub fn len(&self) -> usize {
        self.groups.iter().map(FieldGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten back to a list of storage fields.
    pub fn into_storage_fields(self) -> Vec<StorageField> {
        self.groups
            .into_iter()
            .flat_map(|g| g.entries.into_iter().map(|(_, field)| field))
            .collect()
    }
}
