//! Search result data models

use serde::{Deserialize, Serialize};

/// A record offered in the dropdown before selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier written to the hidden field on selection
    pub id: u64,
    /// Label shown in the dropdown
    pub name: String,
    /// Display text used next to the Edit button once selected
    #[serde(
        rename = "currentString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_string: Option<String>,
}

impl Candidate {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current_string: None,
        }
    }

    pub fn with_current_string(mut self, text: impl Into<String>) -> Self {
        self.current_string = Some(text.into());
        self
    }
}

/// Query parameters of the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free text typed by the editor
    #[serde(default)]
    pub query: String,
}
