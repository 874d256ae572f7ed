use redb::TableDefinition;

/// Table for storing content type schemas.
/// Key: content type id
/// Value: serialized ContentType as bytes
pub const CONTENT_TYPES_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("content_types");

/// Table for storing languages.
/// Key: language id
/// Value: serialized Language as bytes
pub const LANGUAGES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("languages");

/// Table for storing content versions with their fields.
/// Key: (content_id, version_no) as bytes
/// Value: serialized Content as bytes
pub const CONTENTS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("contents");

/// Encode a content key (content_id, version_no) to bytes.
pub fn encode_content_key(content_id: u64, version_no: u32) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&content_id.to_be_bytes());
    key[8..].copy_from_slice(&version_no.to_be_bytes());
    key
}
