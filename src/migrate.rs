use felt_core::{
    ContentSource, ContentStore, ContentTypeId, FieldHandler, LanguageCatalog, StorageError,
    TypeCatalog,
};

/// Outcome of migrating the content of one content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Content versions inspected.
    pub scanned: usize,
    /// Content versions whose fields were rewritten.
    pub updated: usize,
    /// Content versions that could not be migrated.
    pub failed: usize,
}

/// Bring every stored version of every content item of a content type in
/// line with the type's current schema.
///
/// With `fail_fast` the first failing item aborts the migration, otherwise
/// failures are logged, counted and skipped.
pub fn migrate_content_type<T, L, C, S>(
    handler: &FieldHandler<T, L, C>,
    source: &S,
    content_type_id: ContentTypeId,
    fail_fast: bool,
) -> Result<MigrationStats, StorageError>
where
    T: TypeCatalog,
    L: LanguageCatalog,
    C: ContentStore,
    S: ContentSource,
{
    let mut stats = MigrationStats::default();

    for mut content in source.list_by_content_type(content_type_id)? {
        stats.scanned += 1;

        match handler.update_fields_to_new_content_type(&mut content) {
            Ok(true) => stats.updated += 1,
            Ok(false) => {}
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(
                    "Failed to migrate {} version {}: {}",
                    content.id,
                    content.version_no,
                    e
                );
            }
        }
    }

    tracing::info!(
        "Migrated {}: scanned={}, updated={}, failed={}",
        content_type_id,
        stats.scanned,
        stats.updated,
        stats.failed
    );

    Ok(stats)
}
