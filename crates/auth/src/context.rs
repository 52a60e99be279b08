use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rolegate_core::SubjectId;

/// One authorization question: may the subject perform `action` on `resource`?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessContext {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl AccessContext {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            subject_id: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn for_subject(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
