use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Access-control policy record.
///
/// Grants the functions of a module, optionally narrowed by limitations.
/// Evaluation happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policy {
    pub module: String,
    pub module_function: String,
    /// Limitation name to limitation values.
    #[serde(default)]
    pub limitations: BTreeMap<String, Vec<String>>,
}

impl Policy {
    pub fn new(module: impl Into<String>, module_function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            module_function: module_function.into(),
            limitations: BTreeMap::new(),
        }
    }

    pub fn with_limitation<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limitations
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_equality_ignores_limitation_order() {
        let a = Policy::new("content", "read")
            .with_limitation("Section", ["1", "2"])
            .with_limitation("Class", ["article"]);
        let b = Policy::new("content", "read")
            .with_limitation("Class", ["article"])
            .with_limitation("Section", ["1", "2"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_policy_serialization() {
        let policy = Policy::new("content", "edit").with_limitation("Owner", ["self"]);
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "module": "content",
                "module_function": "edit",
                "limitations": {"Owner": ["self"]}
            })
        );

        let decoded: Policy = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, policy);
    }

    #[test]
    fn test_policy_without_limitations() {
        let decoded: Policy =
            serde_json::from_str(r#"{"module":"*","module_function":"*"}"#).unwrap();
        assert!(decoded.limitations.is_empty());
    }
}
