//! Settings structures for the has-one autocomplete server

use crate::source::Document;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, read from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub sources: Vec<SourceConfig>,
    pub fields: Vec<FieldSettings>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (HASONE_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("HASONE_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("HASONE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("HASONE_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("HASONE_BASE_URL") {
            self.server.base_url = Some(val);
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Title of the demo edit form
    pub form_title: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            form_title: "Edit record".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
    /// Prefix prepended to field search links
    pub base_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
        }
    }
}

/// Settings for the widget's lookup client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Lookup request timeout in seconds
    pub request_timeout: f64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
        }
    }
}

/// An in-memory record collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Collection name (e.g. "Author")
    pub name: String,
    /// Fields searched when a field does not list its own
    pub searchable_fields: Vec<String>,
    /// Link pattern for records without an explicit link; `{id}` is replaced
    pub link_template: Option<String>,
    pub records: Vec<Document>,
}

/// Declarative configuration of one has-one field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Form field name; also the name of the stored identifier
    pub name: String,
    /// Label shown next to the field
    pub title: Option<String>,
    /// Source collection name
    pub source: String,
    /// Attribute shown as the record's label
    pub label_field: String,
    /// Searchable field specs; empty means the source's defaults
    pub search_fields: Vec<String>,
    pub results_limit: usize,
    pub default_text: String,
    pub placeholder_text: String,
    /// Debounce delay in milliseconds
    pub delay_ms: u64,
    /// Shortest query that triggers a lookup
    pub min_length: usize,
    pub clear_button: bool,
    /// Initially stored identifier
    pub value: Option<u64>,
    pub disabled: bool,
    pub readonly: bool,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: None,
            source: String::new(),
            label_field: crate::field::DEFAULT_LABEL_FIELD.to_string(),
            search_fields: Vec::new(),
            results_limit: crate::field::DEFAULT_RESULTS_LIMIT,
            default_text: crate::field::DEFAULT_TEXT.to_string(),
            placeholder_text: crate::field::DEFAULT_PLACEHOLDER.to_string(),
            delay_ms: crate::field::DEFAULT_DELAY_MS,
            min_length: crate::field::DEFAULT_MIN_LENGTH,
            clear_button: false,
            value: None,
            disabled: false,
            readonly: false,
        }
    }
}
