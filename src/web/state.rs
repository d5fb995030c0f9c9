//! Application state shared across handlers

use crate::config::Settings;
use crate::field::{FieldLoader, FieldRegistry};
use crate::source::SourceRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Fields served by this instance
    pub fields: Arc<FieldRegistry>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state, loading fields against the given sources
    pub fn new(settings: Settings, sources: &SourceRegistry) -> anyhow::Result<Self> {
        let fields = FieldLoader::load(&settings, sources)?;
        Ok(Self::with_fields(settings, fields)?)
    }

    /// Create state from an already built field registry
    pub fn with_fields(settings: Settings, fields: FieldRegistry) -> crate::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            fields: Arc::new(fields),
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Title of the demo edit form
    pub fn form_title(&self) -> &str {
        &self.settings.general.form_title
    }
}
