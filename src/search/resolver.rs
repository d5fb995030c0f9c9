//! Search resolution for one field

use super::models::Candidate;
use super::strategy::{
    DefaultProcessor, DefaultSearch, ResultProcessor, SearchContext, SearchStrategy,
};
use crate::error::Result;
use crate::field::FieldConfig;
use crate::source::DataSource;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Runs the search and projection stages for a field's source
#[derive(Clone)]
pub struct SearchResolver {
    config: Arc<FieldConfig>,
    source: Arc<dyn DataSource>,
}

impl SearchResolver {
    pub fn new(config: Arc<FieldConfig>, source: Arc<dyn DataSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// Resolve query text to an ordered candidate list.
    ///
    /// Each stage runs the configured override when present and the built-in
    /// behavior otherwise; the two are independent.
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        let start = Instant::now();
        let ctx = SearchContext {
            config: &self.config,
            source: self.source.as_ref(),
        };

        let results = match &self.config.search_strategy {
            Some(strategy) => strategy.search(query, &ctx).await?,
            None => DefaultSearch.search(query, &ctx).await?,
        };

        let candidates = match &self.config.result_processor {
            Some(processor) => processor.process(results, &ctx)?,
            None => DefaultProcessor.process(results, &ctx)?,
        };

        debug!(
            "Field {}: {} candidates for '{}' in {}ms",
            self.config.name,
            candidates.len(),
            query,
            start.elapsed().as_millis()
        );

        Ok(candidates)
    }
}
