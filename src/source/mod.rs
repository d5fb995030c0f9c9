//! Data source module
//!
//! Defines the record and source traits the resolver queries through, plus an
//! in-memory implementation and a registry loaded from configuration.

mod document;
mod loader;
mod memory;
mod registry;
mod traits;

pub use document::Document;
pub use loader::SourceLoader;
pub use memory::InMemorySource;
pub use registry::SourceRegistry;
pub use traits::*;
