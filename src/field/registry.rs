//! Field registry and loading from configuration

use super::config::FieldConfig;
use super::HasOneField;
use crate::config::{FieldSettings, Settings};
use crate::error::{Error, Result};
use crate::source::SourceRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Registry of fields by name, keeping declaration order for rendering
pub struct FieldRegistry {
    fields: HashMap<String, Arc<HasOneField>>,
    order: Vec<String>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, field: HasOneField) {
        let name = field.name().to_string();
        if self.fields.insert(name.clone(), Arc::new(field)).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<HasOneField>> {
        self.fields.get(name)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<HasOneField>> {
        self.order.iter().filter_map(|name| self.fields.get(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader for building fields from configuration
pub struct FieldLoader;

impl FieldLoader {
    /// Load all configured fields; a field naming an unknown source is fatal
    pub fn load(settings: &Settings, sources: &SourceRegistry) -> Result<FieldRegistry> {
        let mut registry = FieldRegistry::new();
        let base_url = settings.server.base_url.clone().unwrap_or_default();

        for fs in &settings.fields {
            let source = sources.get(&fs.source).ok_or_else(|| {
                Error::Configuration(format!(
                    "field '{}' uses unknown source '{}'",
                    fs.name, fs.source
                ))
            })?;

            let field = HasOneField::new(Self::config_from(fs), source.clone())?
                .with_value(fs.value)
                .with_disabled(fs.disabled)
                .with_readonly(fs.readonly)
                .with_base_url(base_url.clone());

            info!("Loaded field: {} -> {}", fs.name, fs.source);
            registry.register(field);
        }

        Ok(registry)
    }

    /// Translate declarative settings into a field configuration
    pub fn config_from(fs: &FieldSettings) -> FieldConfig {
        let mut config = FieldConfig::new(fs.name.clone(), fs.source.clone())
            .with_label_field(fs.label_field.clone())
            .with_search_fields(fs.search_fields.clone())
            .with_results_limit(fs.results_limit)
            .with_default_text(fs.default_text.clone())
            .with_placeholder_text(fs.placeholder_text.clone())
            .with_delay(Duration::from_millis(fs.delay_ms))
            .with_min_length(fs.min_length)
            .with_clear_button(fs.clear_button);
        if let Some(title) = &fs.title {
            config = config.with_title(title.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::source::SourceLoader;

    fn settings() -> Settings {
        Settings {
            sources: vec![SourceConfig {
                name: "Author".into(),
                ..Default::default()
            }],
            fields: vec![
                FieldSettings {
                    name: "AuthorID".into(),
                    source: "Author".into(),
                    delay_ms: 150,
                    value: Some(3),
                    ..Default::default()
                },
                FieldSettings {
                    name: "EditorID".into(),
                    source: "Author".into(),
                    readonly: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_load_fields() {
        let settings = settings();
        let sources = SourceLoader::load(&settings);
        let registry = FieldLoader::load(&settings, &sources).unwrap();

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["AuthorID", "EditorID"]);

        let author = registry.get("AuthorID").unwrap();
        assert_eq!(author.config().delay, Duration::from_millis(150));
        assert_eq!(author.value(), Some(3));
        assert!(registry.get("EditorID").unwrap().is_readonly());
    }

    #[test]
    fn test_unknown_source_is_fatal() {
        let mut settings = settings();
        settings.fields[0].source = "Team".into();
        let sources = SourceLoader::load(&settings);

        assert!(matches!(
            FieldLoader::load(&settings, &sources),
            Err(Error::Configuration(_))
        ));
    }
}
