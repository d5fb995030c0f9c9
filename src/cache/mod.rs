//! Client-side search cache
//!
//! Remembers lookup responses by exact query text. Entries are never
//! invalidated or evicted; the cache lives as long as the widgets holding it.

use crate::search::Candidate;
use moka::sync::Cache;

/// Cache of candidate lists keyed by exact query text.
///
/// Cloning yields a handle to the same entries, so one cache can be shared by
/// several widgets on the same form.
#[derive(Clone)]
pub struct SearchCache {
    cache: Cache<String, Vec<Candidate>>,
}

impl SearchCache {
    /// Create an empty, unbounded cache
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    /// Get the cached candidates for this exact text
    pub fn get(&self, term: &str) -> Option<Vec<Candidate>> {
        self.cache.get(term)
    }

    /// Store the candidates returned for this exact text
    pub fn insert(&self, term: impl Into<String>, candidates: Vec<Candidate>) {
        self.cache.insert(term.into(), candidates);
    }

    pub fn contains(&self, term: &str) -> bool {
        self.cache.contains_key(term)
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}
