//! Has-one autocomplete form field
//!
//! A field binds a configuration to a source collection and carries its form
//! state: the stored identifier and whether it is disabled or read-only.

mod config;
mod formatter;
mod registry;

pub use config::*;
pub use formatter::{current_item_text, label_of};
pub use registry::{FieldLoader, FieldRegistry};

use crate::error::{Error, Result};
use crate::search::{Candidate, SearchResolver};
use crate::source::{DataSource, Record};
use crate::web::Templates;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// A has-one relation picker bound to one source collection
#[derive(Clone)]
pub struct HasOneField {
    resolver: SearchResolver,
    value: Option<u64>,
    disabled: bool,
    readonly: bool,
    base_url: String,
}

impl HasOneField {
    /// Build a field; the source must be the collection the config names
    pub fn new(config: FieldConfig, source: Arc<dyn DataSource>) -> Result<Self> {
        if config.source != source.name() {
            return Err(Error::Configuration(format!(
                "field '{}' expects source '{}' but was given '{}'",
                config.name,
                config.source,
                source.name()
            )));
        }

        Ok(Self {
            resolver: SearchResolver::new(Arc::new(config), source),
            value: None,
            disabled: false,
            readonly: false,
            base_url: String::new(),
        })
    }

    pub fn with_value(mut self, value: Option<u64>) -> Self {
        self.value = value;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Prefix for links generated by this field (no trailing slash)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.config().name
    }

    pub fn config(&self) -> &FieldConfig {
        self.resolver.config()
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// URL of this field's search action
    pub fn search_link(&self) -> String {
        format!(
            "{}/field/{}/search",
            self.base_url,
            urlencoding::encode(self.name())
        )
    }

    /// Handle a search request; refused before querying when the field is
    /// disabled or read-only
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        if self.disabled || self.readonly {
            warn!("Search on locked field {} refused", self.name());
            return Err(Error::Forbidden(self.name().to_string()));
        }
        self.resolver.search(query).await
    }

    /// The currently selected record, if any
    pub async fn item(&self) -> Result<Option<Arc<dyn Record>>> {
        match self.value {
            Some(id) if id > 0 => self.resolver.source().get_by_id(id).await,
            _ => Ok(None),
        }
    }

    /// Text shown next to the Edit button for the current selection
    pub async fn current_item_text(&self) -> Result<String> {
        let item = self.item().await?;
        current_item_text(self.config(), item.as_deref())
    }

    /// Render the field markup the client widget binds to
    pub async fn render(&self, templates: &Templates) -> Result<String> {
        let config = self.config();
        let value = self.value.unwrap_or(0);
        let view = FieldView {
            name: &config.name,
            title: config.display_title(),
            current_text: self.current_item_text().await?,
            default_text: &config.default_text,
            placeholder: &config.placeholder_text,
            search_url: self.search_link(),
            delay_ms: config.delay.as_millis() as u64,
            value,
            clear_button: config.clear_button,
            clear_visible: value > 0,
            locked: self.disabled || self.readonly,
        };
        templates.render("field.html", &view)
    }
}

/// Template context for `field.html`
#[derive(Debug, Serialize)]
struct FieldView<'a> {
    name: &'a str,
    title: &'a str,
    current_text: String,
    default_text: &'a str,
    placeholder: &'a str,
    search_url: String,
    delay_ms: u64,
    value: u64,
    clear_button: bool,
    clear_visible: bool,
    locked: bool,
}
