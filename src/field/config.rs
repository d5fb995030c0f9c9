//! Immutable per-field configuration

use crate::search::{ResultProcessor, SearchStrategy};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Attribute used as the record label unless configured otherwise
pub const DEFAULT_LABEL_FIELD: &str = "Title";
/// Maximum number of candidates returned per search
pub const DEFAULT_RESULTS_LIMIT: usize = 40;
/// Text shown when nothing is selected
pub const DEFAULT_TEXT: &str = "(none)";
/// Placeholder of the search input
pub const DEFAULT_PLACEHOLDER: &str = "Search";
/// Idle time after the last keystroke before a lookup, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 300;
/// Shortest query that triggers a lookup
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Settings of one has-one field, fixed once the field is built
#[derive(Clone)]
pub struct FieldConfig {
    /// Form field name; the selected identifier is submitted under it
    pub name: String,
    pub title: Option<String>,
    /// Source collection name
    pub source: String,
    pub label_field: String,
    /// Explicit searchable field specs; empty means the source's defaults
    pub search_fields: Vec<String>,
    pub results_limit: usize,
    pub default_text: String,
    pub placeholder_text: String,
    pub delay: Duration,
    pub min_length: usize,
    pub clear_button: bool,
    /// Replaces the default filter/sort/limit stage
    pub search_strategy: Option<Arc<dyn SearchStrategy>>,
    /// Replaces the default projection stage
    pub result_processor: Option<Arc<dyn ResultProcessor>>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            source: source.into(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            search_fields: Vec::new(),
            results_limit: DEFAULT_RESULTS_LIMIT,
            default_text: DEFAULT_TEXT.to_string(),
            placeholder_text: DEFAULT_PLACEHOLDER.to_string(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            min_length: DEFAULT_MIN_LENGTH,
            clear_button: false,
            search_strategy: None,
            result_processor: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_label_field(mut self, field: impl Into<String>) -> Self {
        self.label_field = field.into();
        self
    }

    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_results_limit(mut self, limit: usize) -> Self {
        self.results_limit = limit;
        self
    }

    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = text.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_clear_button(mut self, enabled: bool) -> Self {
        self.clear_button = enabled;
        self
    }

    pub fn with_search_strategy(mut self, strategy: Arc<dyn SearchStrategy>) -> Self {
        self.search_strategy = Some(strategy);
        self
    }

    pub fn with_result_processor(mut self, processor: Arc<dyn ResultProcessor>) -> Self {
        self.result_processor = Some(processor);
        self
    }

    /// Title shown in the form, falling back to the field name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("label_field", &self.label_field)
            .field("search_fields", &self.search_fields)
            .field("results_limit", &self.results_limit)
            .field("default_text", &self.default_text)
            .field("delay", &self.delay)
            .field("clear_button", &self.clear_button)
            .field("custom_search", &self.search_strategy.is_some())
            .field("custom_processor", &self.result_processor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::new("AuthorID", "Author");
        assert_eq!(config.label_field, "Title");
        assert_eq!(config.results_limit, 40);
        assert_eq!(config.default_text, "(none)");
        assert_eq!(config.placeholder_text, "Search");
        assert_eq!(config.delay, Duration::from_millis(300));
        assert!(!config.clear_button);
        assert_eq!(config.display_title(), "AuthorID");
    }

    #[test]
    fn test_builder() {
        let config = FieldConfig::new("AuthorID", "Author")
            .with_title("Author")
            .with_label_field("Name")
            .with_search_fields(["Name", "Email:StartsWith"])
            .with_results_limit(2)
            .with_clear_button(true);

        assert_eq!(config.search_fields, vec!["Name", "Email:StartsWith"]);
        assert_eq!(config.results_limit, 2);
        assert_eq!(config.display_title(), "Author");
        assert!(format!("{:?}", config).contains("custom_search: false"));
    }
}
