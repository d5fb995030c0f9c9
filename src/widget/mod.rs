//! Client-side autocomplete widget
//!
//! The widget is a state machine over a [`FieldBinding`]. It performs no I/O
//! itself: time is passed in explicitly and lookups go through a
//! [`LookupClient`], so a host can drive it from a browser bridge, a terminal
//! or a test.

mod binding;
mod state;

pub use binding::*;
pub use state::{
    AutocompleteWidget, LookupStep, LookupTicket, WidgetState, LOOKUP_FAILED_MESSAGE,
};

use crate::cache::SearchCache;
use crate::error::Result;
use crate::search::Candidate;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Transport used to call a field's search action
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(&self, search_url: &str, term: &str) -> Result<Vec<Candidate>>;
}

/// Blocking user-facing alert
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier that only writes the alert to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Mount a widget on every editable field container in `html`, sharing one cache
pub fn mount_all(
    html: &str,
    cache: &SearchCache,
    notifier: Arc<dyn Notifier>,
) -> Result<Vec<AutocompleteWidget>> {
    Ok(FieldBinding::all_from_markup(html)?
        .into_iter()
        .map(|binding| AutocompleteWidget::bind(binding, cache.clone(), notifier.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldConfig, HasOneField};
    use crate::source::{Document, InMemorySource};
    use crate::web::Templates;
    use serde_json::json;
    use std::time::Duration;

    fn author_field() -> HasOneField {
        let source = InMemorySource::new("Author")
            .with_searchable_fields(vec!["Name".into()])
            .with_records(vec![Document::new(4)
                .with_field("Name", json!("Joanna"))
                .with_link("/authors/4")]);
        HasOneField::new(
            FieldConfig::new("AuthorID", "Author")
                .with_label_field("Name")
                .with_delay(Duration::from_millis(150))
                .with_clear_button(true),
            Arc::new(source),
        )
        .unwrap()
    }

    async fn rendered(value: Option<u64>) -> String {
        let field = author_field().with_value(value);
        field.render(&Templates::new().unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_bind_rendered_field() {
        let html = rendered(Some(4)).await;
        let widgets = mount_all(&html, &SearchCache::new(), Arc::new(LogNotifier)).unwrap();
        assert_eq!(widgets.len(), 1);

        let widget = &widgets[0];
        let binding = widget.binding();
        assert_eq!(binding.name, "AuthorID");
        assert_eq!(binding.search_url, "/field/AuthorID/search");
        assert_eq!(widget.delay(), Duration::from_millis(150));
        assert_eq!(binding.default_text, "(none)");
        assert!(binding.current_text.contains("Joanna"));
        assert_eq!(widget.selection(), Some(4));
        assert!(binding.has_clear_button);
        assert!(binding.clear_visible);
        assert_eq!(widget.state(), WidgetState::Closed);
    }

    #[tokio::test]
    async fn test_bind_rendered_empty_field() {
        let html = rendered(None).await;
        let widget = mount_all(&html, &SearchCache::new(), Arc::new(LogNotifier))
            .unwrap()
            .remove(0);

        assert_eq!(widget.selection(), None);
        assert_eq!(widget.binding().current_text, "(none)");
        assert!(!widget.binding().clear_visible);
    }

    #[tokio::test]
    async fn test_mount_skips_locked_fields() {
        let templates = Templates::new().unwrap();
        let open = author_field().with_value(Some(4));
        let locked = author_field().with_value(Some(4)).with_readonly(true);
        let disabled = author_field().with_disabled(true);

        let mut page = String::new();
        for field in [&locked, &open, &disabled] {
            page.push_str(&field.render(&templates).await.unwrap());
        }

        let widgets = mount_all(&page, &SearchCache::new(), Arc::new(LogNotifier)).unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].selection(), Some(4));
        assert_eq!(widgets[0].binding().search_url, "/field/AuthorID/search");
    }
}
