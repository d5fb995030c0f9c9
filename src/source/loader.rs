//! Source loader for building in-memory collections from configuration

use super::memory::InMemorySource;
use super::registry::SourceRegistry;
use crate::config::{Settings, SourceConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing data sources from configuration
pub struct SourceLoader;

impl SourceLoader {
    /// Load all configured sources
    pub fn load(settings: &Settings) -> SourceRegistry {
        let mut registry = SourceRegistry::new();

        for config in &settings.sources {
            if config.name.is_empty() {
                warn!("Skipping source without a name");
                continue;
            }
            if registry.contains(&config.name) {
                warn!("Duplicate source '{}', later definition wins", config.name);
            }

            let source = Self::create_source(config);
            info!("Loaded source: {} ({} records)", config.name, source.len());
            registry.register(Arc::new(source));
        }

        registry
    }

    /// Build one source, filling in links from the template
    pub fn create_source(config: &SourceConfig) -> InMemorySource {
        let records = config.records.iter().cloned().map(|mut record| {
            if record.link.is_none() {
                if let Some(template) = &config.link_template {
                    record.link = Some(template.replace("{id}", &record.id.to_string()));
                }
            }
            record
        });

        InMemorySource::new(config.name.clone())
            .with_searchable_fields(config.searchable_fields.clone())
            .with_records(records)
    }
}
