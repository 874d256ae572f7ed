//! Reconciliation of stored content fields against the current content type.

use std::sync::Arc;

use crate::content::Content;
use crate::content_type::ContentType;
use crate::error::StorageError;
use crate::field::{Field, StorageField};
use crate::field_map::FieldMap;
use crate::ids::{ContentTypeId, LanguageId};
use crate::storage::{ContentStore, LanguageCatalog, TypeCatalog};

/// Maps fields to storage fields and keeps them in line with the content
/// type schema.
///
/// Stateless: every call loads the schema and languages it needs from the
/// catalogs, so instances can be shared between threads.
pub struct FieldHandler<T, L, C>
where
    T: TypeCatalog,
    L: LanguageCatalog,
    C: ContentStore,
{
    type_catalog: Arc<T>,
    language_catalog: Arc<L>,
    content_store: Arc<C>,
}

impl<T, L, C> FieldHandler<T, L, C>
where
    T: TypeCatalog,
    L: LanguageCatalog,
    C: ContentStore,
{
    pub fn new(type_catalog: Arc<T>, language_catalog: Arc<L>, content_store: Arc<C>) -> Self {
        Self {
            type_catalog,
            language_catalog,
            content_store,
        }
    }

    /// Attach the field definition identifier to each field.
    ///
    /// Fails if a field references a field definition the content type does
    /// not have.
    pub fn create_storage_fields(
        &self,
        fields: Vec<Field>,
        content_type_id: ContentTypeId,
    ) -> Result<Vec<StorageField>, StorageError> {
        let content_type = self.type_catalog.load(content_type_id)?;

        let mut storage_fields = Vec::with_capacity(fields.len());
        for field in fields {
            let identifier = content_type
                .field_definition_identifier(field.field_definition_id)?
                .to_string();
            storage_fields.push(StorageField::new(field, identifier));
        }
        Ok(storage_fields)
    }

    /// Unwrap the fields of storage fields, preserving order.
    pub fn extract_fields(&self, storage_fields: Vec<StorageField>) -> Vec<Field> {
        storage_fields.into_iter().map(|sf| sf.field).collect()
    }

    /// Bring the fields of `content` in line with the current schema of its
    /// content type.
    ///
    /// Fields whose definition was removed are dropped, fields whose
    /// definition was renumbered get the new id. The resulting field set is
    /// written to the content store only if something changed. Returns
    /// whether a write happened.
    pub fn update_fields_to_new_content_type(
        &self,
        content: &mut Content,
    ) -> Result<bool, StorageError> {
        let content_type = self.type_catalog.load(content.content_type_id)?;
        let definitions = content_type.field_definitions_by_identifier();

        // Reconcile a copy; `content` only changes once the store accepted it.
        let mut fields = content.fields.clone();
        let mut updated = false;
        fields.retain_mut(|storage_field| {
            let identifier = storage_field.field_definition_identifier.as_str();
            let Some(definition) = definitions.get(identifier) else {
                tracing::debug!(
                    "Dropping field {} of {}: no longer in {}",
                    identifier,
                    content.id,
                    content_type.id
                );
                updated = true;
                return false;
            };

            if definition.id != storage_field.field.field_definition_id {
                tracing::debug!(
                    "Renumbering field {} of {}: {} -> {}",
                    identifier,
                    content.id,
                    storage_field.field.field_definition_id,
                    definition.id
                );
                storage_field.field.field_definition_id = definition.id;
                updated = true;
            }
            true
        });

        if updated {
            self.content_store
                .update_fields(content.id, content.version_no, &fields)?;
            content.fields = fields;
            tracing::info!(
                "Updated {} version {} to current {}",
                content.id,
                content.version_no,
                content_type.id
            );
        }

        Ok(updated)
    }

    /// Ensure every field definition has a value in the default language and
    /// in each requested language.
    ///
    /// Missing default-language values come from the field definition's
    /// default. Missing values in other languages are copies of the
    /// default-language value.
    pub fn complete_fields_by_content_type(
        &self,
        storage_fields: Vec<StorageField>,
        content_type_id: ContentTypeId,
        language_ids: &[LanguageId],
    ) -> Result<Vec<StorageField>, StorageError> {
        let mut field_map = FieldMap::from_storage_fields(storage_fields);
        let content_type = self.type_catalog.load(content_type_id)?;

        let language_codes = language_ids
            .iter()
            .map(|id| self.language_catalog.load(*id).map(|lang| lang.language_code))
            .collect::<Result<Vec<_>, _>>()?;
        let default_language_code = self.default_language_code(&content_type)?;

        for definition in &content_type.field_definitions {
            let group = field_map.group_mut_or_insert(&definition.identifier);

            let default_field = match group.get(&default_language_code) {
                Some(existing) => existing.clone(),
                None => {
                    tracing::debug!(
                        "Using default value for {} in {}",
                        definition.identifier,
                        default_language_code
                    );
                    let synthesized = StorageField::new(
                        Field::new(
                            definition.id,
                            definition.field_type.clone(),
                            default_language_code.clone(),
                            definition.default_value.clone(),
                        ),
                        definition.identifier.clone(),
                    );
                    group.insert(default_language_code.clone(), synthesized.clone());
                    synthesized
                }
            };

            for language_code in &language_codes {
                if !group.contains(language_code) {
                    group.insert(language_code.clone(), default_field.translated(language_code));
                }
            }
        }

        Ok(field_map.into_storage_fields())
    }

    /// Remove values that do not need to be stored.
    ///
    /// A value equal to its field definition's default is dropped. When a
    /// field has no default-language value, the first remaining value is
    /// copied into the default language. Values of non-translatable fields
    /// outside the default language are dropped.
    pub fn remove_redundant_field_values(
        &self,
        storage_fields: Vec<StorageField>,
        content_type_id: ContentTypeId,
    ) -> Result<Vec<StorageField>, StorageError> {
        let content_type = self.type_catalog.load(content_type_id)?;
        let definitions = content_type.field_definitions_by_identifier();
        let default_language_code = self.default_language_code(&content_type)?;

        let mut field_map = FieldMap::from_storage_fields(storage_fields);

        for group in field_map.groups_mut() {
            let definition = definitions
                .get(group.identifier.as_str())
                .copied()
                .ok_or_else(|| StorageError::FieldDefinitionIdentifierNotFound {
                    identifier: group.identifier.clone(),
                    content_type_id,
                })?;

            let mut missing_default_language = !group.contains(&default_language_code);

            // Iterate a snapshot; the group is modified as we go.
            let entries = group.entries().to_vec();
            for (language_code, storage_field) in entries {
                if storage_field.field.value == definition.default_value {
                    group.remove(&language_code);
                    continue;
                }

                if missing_default_language {
                    tracing::debug!(
                        "Copying {} value of {} into default language {}",
                        language_code,
                        definition.identifier,
                        default_language_code
                    );
                    group.insert(
                        default_language_code.clone(),
                        storage_field.translated(&default_language_code),
                    );
                    missing_default_language = false;
                }

                if !definition.is_translatable && language_code != default_language_code {
                    group.remove(&language_code);
                }
            }

            if group.is_empty() {
                tracing::debug!("No values of {} need storing", definition.identifier);
            }
        }

        Ok(field_map.into_storage_fields())
    }

    fn default_language_code(&self, content_type: &ContentType) -> Result<String, StorageError> {
        Ok(self
            .language_catalog
            .load(content_type.initial_language_id)?
            .language_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::FieldDefinition;
    use crate::ids::{ContentId, FieldDefinitionId};
    use crate::language::Language;
    use crate::storage::memory::{
        InMemoryContentStore, InMemoryLanguageCatalog, InMemoryTypeCatalog,
    };
    use crate::value::FieldValue;
    use pretty_assertions::assert_eq;

    const ARTICLE: ContentTypeId = ContentTypeId(1);
    const ENG: LanguageId = LanguageId(2);
    const FRE: LanguageId = LanguageId(4);
    const GER: LanguageId = LanguageId(8);

    type TestHandler =
        FieldHandler<InMemoryTypeCatalog, InMemoryLanguageCatalog, InMemoryContentStore>;

    struct Fixture {
        handler: TestHandler,
        types: Arc<InMemoryTypeCatalog>,
        store: Arc<InMemoryContentStore>,
    }

    fn fixture(definitions: Vec<FieldDefinition>) -> Fixture {
        let types = Arc::new(InMemoryTypeCatalog::new());
        types.save(ContentType::new(ARTICLE, "article", ENG, definitions));

        let languages = Arc::new(InMemoryLanguageCatalog::new());
        languages.save(Language::new(ENG, "eng-GB", "English"));
        languages.save(Language::new(FRE, "fre-FR", "French"));
        languages.save(Language::new(GER, "ger-DE", "German"));

        let store = Arc::new(InMemoryContentStore::new());
        Fixture {
            handler: FieldHandler::new(types.clone(), languages, store.clone()),
            types,
            store,
        }
    }

    fn title() -> FieldDefinition {
        FieldDefinition::new(FieldDefinitionId(1), "title", "text", true, "".into())
    }

    fn sku() -> FieldDefinition {
        FieldDefinition::new(FieldDefinitionId(2), "sku", "text", false, "".into())
    }

    fn sf(identifier: &str, id: u64, lang: &str, value: &str) -> StorageField {
        StorageField::new(
            Field::new(FieldDefinitionId(id), "text", lang, value.into()),
            identifier,
        )
    }

    /// (identifier, language, text) of each storage field.
    fn cells(fields: &[StorageField]) -> Vec<(&str, &str, &str)> {
        fields
            .iter()
            .map(|f| {
                (
                    f.field_definition_identifier.as_str(),
                    f.field.language_code.as_str(),
                    f.field.value.data.as_str().unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_create_storage_fields() {
        let fx = fixture(vec![title(), sku()]);
        let fields = vec![
            Field::new(FieldDefinitionId(2), "text", "eng-GB", "A-1".into()),
            Field::new(FieldDefinitionId(1), "text", "eng-GB", "Hello".into()),
        ];

        let storage_fields = fx
            .handler
            .create_storage_fields(fields.clone(), ARTICLE)
            .unwrap();

        assert_eq!(storage_fields[0].field_definition_identifier, "sku");
        assert_eq!(storage_fields[1].field_definition_identifier, "title");
        assert_eq!(fx.handler.extract_fields(storage_fields), fields);
    }

    #[test]
    fn test_create_storage_fields_unknown_definition() {
        let fx = fixture(vec![title()]);
        let fields = vec![Field::new(FieldDefinitionId(9), "text", "eng-GB", "x".into())];

        let err = fx
            .handler
            .create_storage_fields(fields, ARTICLE)
            .unwrap_err();

        assert_eq!(
            err,
            StorageError::FieldDefinitionNotFound {
                field_definition_id: FieldDefinitionId(9),
                content_type_id: ARTICLE,
            }
        );
    }

    #[test]
    fn test_create_storage_fields_unknown_type() {
        let fx = fixture(vec![title()]);
        let err = fx
            .handler
            .create_storage_fields(Vec::new(), ContentTypeId(99))
            .unwrap_err();
        assert_eq!(err, StorageError::ContentTypeNotFound(ContentTypeId(99)));
    }

    #[test]
    fn test_complete_copies_default_language_value() {
        let fx = fixture(vec![title()]);

        let completed = fx
            .handler
            .complete_fields_by_content_type(
                vec![sf("title", 1, "eng-GB", "Hello")],
                ARTICLE,
                &[FRE],
            )
            .unwrap();

        assert_eq!(
            cells(&completed),
            vec![
                ("title", "eng-GB", "Hello"),
                ("title", "fre-FR", "Hello"),
            ]
        );
    }

    #[test]
    fn test_complete_uses_definition_defaults_for_missing_fields() {
        let mut subtitle = FieldDefinition::new(
            FieldDefinitionId(3),
            "subtitle",
            "text",
            true,
            FieldValue::new("Untitled"),
        );
        subtitle.field_type = "string".to_string();
        let fx = fixture(vec![title(), subtitle]);

        let completed = fx
            .handler
            .complete_fields_by_content_type(
                vec![sf("title", 1, "eng-GB", "Hello")],
                ARTICLE,
                &[FRE, GER],
            )
            .unwrap();

        assert_eq!(
            cells(&completed),
            vec![
                ("title", "eng-GB", "Hello"),
                ("title", "fre-FR", "Hello"),
                ("title", "ger-DE", "Hello"),
                ("subtitle", "eng-GB", "Untitled"),
                ("subtitle", "fre-FR", "Untitled"),
                ("subtitle", "ger-DE", "Untitled"),
            ]
        );
        assert_eq!(completed[4].field.field_definition_id, FieldDefinitionId(3));
        assert_eq!(completed[4].field.field_type, "string");
    }

    #[test]
    fn test_complete_keeps_existing_translations_and_order() {
        let fx = fixture(vec![title()]);

        let completed = fx
            .handler
            .complete_fields_by_content_type(
                vec![
                    sf("title", 1, "fre-FR", "Bonjour"),
                    sf("title", 1, "eng-GB", "Hello"),
                ],
                ARTICLE,
                &[GER, FRE],
            )
            .unwrap();

        assert_eq!(
            cells(&completed),
            vec![
                ("title", "fre-FR", "Bonjour"),
                ("title", "eng-GB", "Hello"),
                ("title", "ger-DE", "Hello"),
            ]
        );
    }

    #[test]
    fn test_complete_without_default_language_uses_schema_default() {
        let fx = fixture(vec![title()]);

        let completed = fx
            .handler
            .complete_fields_by_content_type(
                vec![sf("title", 1, "fre-FR", "Bonjour")],
                ARTICLE,
                &[GER],
            )
            .unwrap();

        assert_eq!(
            cells(&completed),
            vec![
                ("title", "fre-FR", "Bonjour"),
                ("title", "eng-GB", ""),
                ("title", "ger-DE", ""),
            ]
        );
    }

    #[test]
    fn test_complete_unknown_language() {
        let fx = fixture(vec![title()]);
        let err = fx
            .handler
            .complete_fields_by_content_type(Vec::new(), ARTICLE, &[LanguageId(77)])
            .unwrap_err();
        assert_eq!(err, StorageError::LanguageNotFound(LanguageId(77)));
    }

    #[test]
    fn test_complete_synthesized_values_are_independent() {
        let fx = fixture(vec![FieldDefinition::new(
            FieldDefinitionId(1),
            "tags",
            "keywords",
            true,
            FieldValue::new(serde_json::json!(["news"])),
        )]);

        let mut completed = fx
            .handler
            .complete_fields_by_content_type(Vec::new(), ARTICLE, &[FRE])
            .unwrap();
        completed[1].field.value.data = serde_json::json!(["actualités"]);

        assert_eq!(completed[0].field.value.data, serde_json::json!(["news"]));
        let ty = fx.types.load(ARTICLE).unwrap();
        assert_eq!(
            ty.field_definitions[0].default_value.data,
            serde_json::json!(["news"])
        );
    }

    #[test]
    fn test_remove_drops_default_values() {
        let fx = fixture(vec![title()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(vec![sf("title", 1, "eng-GB", "")], ARTICLE)
            .unwrap();

        assert!(remaining.is_empty());
    }

    #[test]
    fn test_remove_keeps_translations() {
        let fx = fixture(vec![title()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(
                vec![
                    sf("title", 1, "eng-GB", "Hello"),
                    sf("title", 1, "fre-FR", "Bonjour"),
                    sf("title", 1, "ger-DE", ""),
                ],
                ARTICLE,
            )
            .unwrap();

        assert_eq!(
            cells(&remaining),
            vec![
                ("title", "eng-GB", "Hello"),
                ("title", "fre-FR", "Bonjour"),
            ]
        );
    }

    #[test]
    fn test_remove_non_translatable_keeps_default_language_only() {
        let fx = fixture(vec![sku()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(
                vec![
                    sf("sku", 2, "fre-FR", "A-1-fr"),
                    sf("sku", 2, "eng-GB", "A-1"),
                    sf("sku", 2, "ger-DE", "A-1-de"),
                ],
                ARTICLE,
            )
            .unwrap();

        assert_eq!(cells(&remaining), vec![("sku", "eng-GB", "A-1")]);
    }

    #[test]
    fn test_remove_backfills_missing_default_language() {
        let fx = fixture(vec![sku()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(
                vec![
                    sf("sku", 2, "fre-FR", "A-1-fr"),
                    sf("sku", 2, "ger-DE", "A-1-de"),
                ],
                ARTICLE,
            )
            .unwrap();

        assert_eq!(cells(&remaining), vec![("sku", "eng-GB", "A-1-fr")]);
        assert_eq!(remaining[0].language_code(), "eng-GB");
    }

    #[test]
    fn test_remove_backfill_skips_default_values() {
        let fx = fixture(vec![sku()]);

        // The French value equals the default and is dropped before it can
        // serve as the default-language copy.
        let remaining = fx
            .handler
            .remove_redundant_field_values(
                vec![sf("sku", 2, "fre-FR", ""), sf("sku", 2, "ger-DE", "A-1-de")],
                ARTICLE,
            )
            .unwrap();

        assert_eq!(cells(&remaining), vec![("sku", "eng-GB", "A-1-de")]);
    }

    #[test]
    fn test_remove_backfill_for_translatable_field() {
        let fx = fixture(vec![title()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(vec![sf("title", 1, "fre-FR", "Bonjour")], ARTICLE)
            .unwrap();

        assert_eq!(
            cells(&remaining),
            vec![
                ("title", "fre-FR", "Bonjour"),
                ("title", "eng-GB", "Bonjour"),
            ]
        );
    }

    #[test]
    fn test_remove_backfill_is_never_a_default_value() {
        // The backfilled copy is taken from a value that already passed the
        // default check, so it cannot itself equal the default.
        let fx = fixture(vec![sku()]);

        let remaining = fx
            .handler
            .remove_redundant_field_values(
                vec![sf("sku", 2, "fre-FR", ""), sf("sku", 2, "ger-DE", "")],
                ARTICLE,
            )
            .unwrap();

        assert!(remaining.is_empty());
    }

    #[test]
    fn test_remove_unknown_identifier() {
        let fx = fixture(vec![title()]);

        let err = fx
            .handler
            .remove_redundant_field_values(vec![sf("subtitle", 3, "eng-GB", "x")], ARTICLE)
            .unwrap_err();

        assert_eq!(
            err,
            StorageError::FieldDefinitionIdentifierNotFound {
                identifier: "subtitle".to_string(),
                content_type_id: ARTICLE,
            }
        );
    }

    #[test]
    fn test_update_drops_removed_definitions() {
        let fx = fixture(vec![title()]);
        let mut content = Content::new(
            ContentId(10),
            ARTICLE,
            3,
            vec![
                sf("title", 1, "eng-GB", "Hello"),
                sf("subtitle", 2, "eng-GB", "World"),
            ],
        );
        fx.store.insert(content.clone());

        let updated = fx
            .handler
            .update_fields_to_new_content_type(&mut content)
            .unwrap();

        assert!(updated);
        assert_eq!(content.fields, vec![sf("title", 1, "eng-GB", "Hello")]);

        let updates = fx.store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].content_id, ContentId(10));
        assert_eq!(updates[0].version_no, 3);
        assert_eq!(updates[0].fields, content.fields);
        assert_eq!(
            fx.store.get(ContentId(10), 3).unwrap().fields,
            content.fields
        );
    }

    #[test]
    fn test_update_renumbers_changed_definitions() {
        let mut renumbered = title();
        renumbered.id = FieldDefinitionId(11);
        let fx = fixture(vec![renumbered]);
        let mut content = Content::new(
            ContentId(10),
            ARTICLE,
            1,
            vec![sf("title", 1, "eng-GB", "Hello"), sf("title", 1, "fre-FR", "Bonjour")],
        );
        fx.store.insert(content.clone());

        assert!(fx
            .handler
            .update_fields_to_new_content_type(&mut content)
            .unwrap());

        assert!(content
            .fields
            .iter()
            .all(|f| f.field.field_definition_id == FieldDefinitionId(11)));
        assert_eq!(fx.store.updates().len(), 1);
    }

    #[test]
    fn test_update_without_changes_does_not_write() {
        let fx = fixture(vec![title(), sku()]);
        let mut content = Content::new(
            ContentId(10),
            ARTICLE,
            1,
            vec![sf("title", 1, "eng-GB", "Hello"), sf("sku", 2, "eng-GB", "A-1")],
        );
        let before = content.clone();

        let updated = fx
            .handler
            .update_fields_to_new_content_type(&mut content)
            .unwrap();

        assert!(!updated);
        assert_eq!(content, before);
        assert!(fx.store.updates().is_empty());
    }

    #[test]
    fn test_update_propagates_persistence_error() {
        let fx = fixture(vec![title()]);
        let mut content = Content::new(
            ContentId(10),
            ARTICLE,
            1,
            vec![
                sf("title", 1, "eng-GB", "Hello"),
                sf("subtitle", 2, "eng-GB", "World"),
            ],
        );
        fx.store.insert(content.clone());
        fx.store.fail_writes_with("connection reset");
        let before = content.clone();

        let err = fx
            .handler
            .update_fields_to_new_content_type(&mut content)
            .unwrap_err();

        assert_eq!(err, StorageError::Persistence("connection reset".to_string()));
        // Nothing is applied when the write fails
        assert_eq!(content, before);
        assert_eq!(fx.store.get(ContentId(10), 1).unwrap(), before);
    }

    #[test]
    fn test_update_unknown_content_version() {
        let fx = fixture(vec![title()]);
        let mut content = Content::new(
            ContentId(10),
            ARTICLE,
            4,
            vec![sf("subtitle", 2, "eng-GB", "World")],
        );
        let before = content.clone();

        let err = fx
            .handler
            .update_fields_to_new_content_type(&mut content)
            .unwrap_err();

        assert_eq!(err, StorageError::ContentNotFound(ContentId(10), 4));
        assert_eq!(content, before);
    }
}
