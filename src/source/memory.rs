//! In-memory data source

use super::document::Document;
use super::traits::{DataSource, Record};
use crate::error::Result;
use crate::query::ListQuery;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A fixed collection of documents held in memory
pub struct InMemorySource {
    name: String,
    searchable_fields: Vec<String>,
    records: Vec<Arc<Document>>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchable_fields: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Declare the default searchable fields of this collection
    pub fn with_searchable_fields(mut self, fields: Vec<String>) -> Self {
        self.searchable_fields = fields;
        self
    }

    /// Add a record; its class name is set to the collection name
    pub fn insert(&mut self, mut record: Document) {
        record.class_name = self.name.clone();
        self.records.push(Arc::new(record));
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = Document>) -> Self {
        for record in records {
            self.insert(record);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn searchable_fields(&self) -> Vec<String> {
        self.searchable_fields.clone()
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Arc<dyn Record>>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.clone() as Arc<dyn Record>))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Arc<dyn Record>>> {
        let results = query.apply(self.records.iter().map(|r| r.clone() as Arc<dyn Record>));
        debug!(
            "{}: {} of {} records matched",
            self.name,
            results.len(),
            self.records.len()
        );
        Ok(results)
    }
}
