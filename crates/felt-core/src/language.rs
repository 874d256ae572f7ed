use serde::{Deserialize, Serialize};

use crate::ids::LanguageId;

/// A language content can be translated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    /// Locale style code, e.g. "eng-GB".
    pub language_code: String,
    pub name: String,
    #[serde(default = "enabled")]
    pub is_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Language {
    pub fn new(id: LanguageId, language_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            language_code: language_code.into(),
            name: name.into(),
            is_enabled: true,
        }
    }
}
