//! HTTP networking module
//!
//! Provides the HTTP client the widget uses to reach a field's search action.

mod client;

pub use client::HttpClient;
