//! Search resolution module
//!
//! Turns the free text typed into a has-one field into candidates: a
//! disjunctive filter over the searchable fields, an ascending multi-key sort,
//! a hard result cap and a projection to `{id, name, currentString}`.

mod models;
mod resolver;
mod strategy;

pub use models::*;
pub use resolver::SearchResolver;
pub use strategy::{
    DefaultProcessor, DefaultSearch, ResultProcessor, SearchContext, SearchStrategy,
};
