//! Generic attribute-map record

use super::traits::{Linkable, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A record stored as a map of attributes plus inline has-one relations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: u64,
    /// Collection name, filled in by the owning source
    pub class_name: String,
    pub fields: BTreeMap<String, Value>,
    pub relations: BTreeMap<String, Document>,
    pub link: Option<String>,
}

impl Document {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_relation(mut self, name: impl Into<String>, related: Document) -> Self {
        self.relations.insert(name.into(), related);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl Record for Document {
    fn id(&self) -> u64 {
        self.id
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "ID" => Some(Value::from(self.id)),
            _ => self.fields.get(name).cloned(),
        }
    }

    fn relation(&self, name: &str) -> Option<&dyn Record> {
        self.relations.get(name).map(|r| r as &dyn Record)
    }

    fn as_linkable(&self) -> Option<&dyn Linkable> {
        self.link
            .as_ref()
            .filter(|l| !l.is_empty())
            .map(|_| self as &dyn Linkable)
    }
}

impl Linkable for Document {
    fn link(&self) -> String {
        self.link.clone().unwrap_or_default()
    }
}
