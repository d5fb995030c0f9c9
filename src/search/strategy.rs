//! Overridable search and projection stages

use super::models::Candidate;
use crate::error::{Error, Result};
use crate::field::{current_item_text, label_of, FieldConfig};
use crate::query::{Filter, ListQuery, SearchField, SortKey};
use crate::source::{DataSource, Record};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// What a stage can see of the field it runs for
pub struct SearchContext<'a> {
    pub config: &'a FieldConfig,
    pub source: &'a dyn DataSource,
}

/// Turns the raw query text into a record set
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    async fn search(&self, query: &str, ctx: &SearchContext<'_>) -> Result<Vec<Arc<dyn Record>>>;
}

/// Turns a record set into the candidates sent to the widget
pub trait ResultProcessor: Send + Sync {
    fn process(&self, results: Vec<Arc<dyn Record>>, ctx: &SearchContext<'_>)
        -> Result<Vec<Candidate>>;
}

/// Disjunctive filter over the searchable fields, ascending multi-key sort, hard limit
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSearch;

impl DefaultSearch {
    /// Searchable fields in effect: explicit configuration, else the source's defaults
    pub fn active_fields(ctx: &SearchContext<'_>) -> Result<Vec<SearchField>> {
        let specs = if ctx.config.search_fields.is_empty() {
            ctx.source.searchable_fields()
        } else {
            ctx.config.search_fields.clone()
        };

        if specs.is_empty() {
            return Err(Error::Configuration(format!(
                "No searchable fields could be found for class \"{}\"",
                ctx.source.name()
            )));
        }

        specs.iter().map(|s| SearchField::parse(s)).collect()
    }

    /// Build the list query for `text`
    pub fn build_query(fields: &[SearchField], text: &str, limit: usize) -> ListQuery {
        let sort = fields
            .iter()
            .map(|f| SortKey::asc(f.path.clone()))
            .collect();

        ListQuery::new()
            .filter_any(Filter::any(fields, text))
            .sort(sort)
            .limit(limit)
    }
}

#[async_trait]
impl SearchStrategy for DefaultSearch {
    async fn search(&self, query: &str, ctx: &SearchContext<'_>) -> Result<Vec<Arc<dyn Record>>> {
        let fields = Self::active_fields(ctx)?;
        debug!(
            "Searching {} for '{}' on [{}]",
            ctx.source.name(),
            query,
            fields
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let list = Self::build_query(&fields, query, ctx.config.results_limit);
        ctx.source.list(&list).await
    }
}

/// Projects each record to `{id, name, currentString}`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProcessor;

impl ResultProcessor for DefaultProcessor {
    fn process(
        &self,
        results: Vec<Arc<dyn Record>>,
        ctx: &SearchContext<'_>,
    ) -> Result<Vec<Candidate>> {
        results
            .iter()
            .map(|record| {
                let name = label_of(ctx.config, record.as_ref())?;
                let current = current_item_text(ctx.config, Some(record.as_ref()))?;
                Ok(Candidate::new(record.id(), name).with_current_string(current))
            })
            .collect()
    }
}
