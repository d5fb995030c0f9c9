//! hasone-autocomplete: an autocompleting picker for has-one relations
//!
//! The server side renders the field markup and answers search requests
//! against a source collection. The client side is a widget state machine
//! that binds to that markup, debounces typing, caches lookups and writes the
//! chosen identifier back into the form.

pub mod cache;
pub mod config;
pub mod error;
pub mod field;
pub mod network;
pub mod query;
pub mod search;
pub mod source;
pub mod web;
pub mod widget;

pub use config::Settings;
pub use error::{Error, Result};
pub use field::{FieldConfig, HasOneField};
pub use search::{Candidate, SearchResolver};
pub use widget::AutocompleteWidget;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
