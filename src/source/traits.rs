//! Record and data source traits
//!
//! These are the seams to the host application's ORM. A record always exposes
//! its identity and attributes; a navigable link is an optional capability.

use crate::error::Result;
use crate::query::ListQuery;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A persisted (or not yet persisted) record of a source collection
pub trait Record: Send + Sync + fmt::Debug {
    /// Identifier; 0 means the record has no persisted identity
    fn id(&self) -> u64;

    /// Name of the collection this record belongs to
    fn class_name(&self) -> &str;

    /// Attribute value by name
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Related record reached through a has-one relation
    fn relation(&self, _name: &str) -> Option<&dyn Record> {
        None
    }

    /// Link capability, if this record type has one
    fn as_linkable(&self) -> Option<&dyn Linkable> {
        None
    }
}

/// Records that can be navigated to
pub trait Linkable {
    fn link(&self) -> String;
}

/// Resolve a dotted attribute path, following relations for all but the last segment
pub fn resolve_path(record: &dyn Record, path: &[String]) -> Option<Value> {
    let (last, hops) = path.split_last()?;
    let mut current = record;
    for hop in hops {
        current = current.relation(hop)?;
    }
    current.attribute(last)
}

/// A queryable record collection
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Collection name (e.g. "Author")
    fn name(&self) -> &str;

    /// Fields the collection declares as searchable by default
    fn searchable_fields(&self) -> Vec<String> {
        vec![]
    }

    /// Fetch one record by identifier
    async fn get_by_id(&self, id: u64) -> Result<Option<Arc<dyn Record>>>;

    /// Run a filtered, sorted, limited query
    async fn list(&self, query: &ListQuery) -> Result<Vec<Arc<dyn Record>>>;
}
