use serde::{Deserialize, Serialize};

use crate::field::StorageField;
use crate::ids::{ContentId, ContentTypeId};

/// One version of a content item together with its stored fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub content_type_id: ContentTypeId,
    pub version_no: u32,
    pub fields: Vec<StorageField>,
}

impl Content {
    pub fn new(
        id: ContentId,
        content_type_id: ContentTypeId,
        version_no: u32,
        fields: Vec<StorageField>,
    ) -> Self {
        Self {
            id,
            content_type_id,
            version_no,
            fields,
        }
    }
}
