use serde::{Deserialize, Serialize};

/// Type-dependent payload of a field.
///
/// Equality is structural and `clone` produces an independent deep copy, so
/// values synthesized for several languages never share state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldValue {
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl FieldValue {
    pub fn new(data: impl Into<serde_json::Value>) -> Self {
        Self {
            data: data.into(),
            external_data: None,
            sort_key: None,
        }
    }

    /// A value with null data.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    pub fn with_external_data(mut self, external_data: impl Into<serde_json::Value>) -> Self {
        self.external_data = Some(external_data.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_null() && self.external_data.is_none()
    }
}

impl From<&str> for FieldValue {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}
