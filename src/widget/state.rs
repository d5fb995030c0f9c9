//! Autocomplete widget state machine

use super::binding::FieldBinding;
use super::{LookupClient, Notifier};
use crate::cache::SearchCache;
use crate::error::Result;
use crate::field::{DEFAULT_DELAY_MS, DEFAULT_MIN_LENGTH, DEFAULT_TEXT};
use crate::search::Candidate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Message shown when a lookup fails
pub const LOOKUP_FAILED_MESSAGE: &str =
    "An error occurred while fetching data from the server\nPlease try again later.";

/// Visible state of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Showing the current label and the Edit button
    Closed,
    /// Search input shown and focused, dropdown filled as the user types
    Open,
    /// Closed right after a selection updated the label and identifier
    Selected,
}

/// A lookup the host must perform over the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    /// Sequence number; only the latest issued ticket may render
    pub seq: u64,
    pub term: String,
    pub search_url: String,
}

/// Outcome of polling the debounce timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStep {
    /// Nothing pending, or the delay has not elapsed yet
    Idle,
    /// Text unchanged since the last lookup, or shorter than the minimum
    Skipped,
    /// Served from the cache without a request
    Cached,
    /// A request must be issued
    Fetch(LookupTicket),
}

type ChangeListener = Box<dyn FnMut(&str) + Send>;

/// Client-side widget for one has-one field
pub struct AutocompleteWidget {
    binding: FieldBinding,
    state: WidgetState,
    cache: SearchCache,
    notifier: Arc<dyn Notifier>,
    delay: Duration,
    min_length: usize,
    /// Text of the last lookup; identical text does not trigger another
    term: Option<String>,
    deadline: Option<Instant>,
    issued_seq: u64,
    dropdown: Vec<Candidate>,
    listeners: Vec<ChangeListener>,
}

impl AutocompleteWidget {
    /// Mount a widget on a bound field container
    pub fn bind(binding: FieldBinding, cache: SearchCache, notifier: Arc<dyn Notifier>) -> Self {
        let delay = binding
            .delay
            .unwrap_or(Duration::from_millis(DEFAULT_DELAY_MS));

        let mut widget = Self {
            binding,
            state: WidgetState::Closed,
            cache,
            notifier,
            delay,
            min_length: DEFAULT_MIN_LENGTH,
            term: None,
            deadline: None,
            issued_seq: 0,
            dropdown: Vec::new(),
            listeners: Vec::new(),
        };
        widget.refresh_clear_button();
        widget
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Unmount, handing back the field state for form submission
    pub fn unmount(self) -> FieldBinding {
        self.binding
    }

    /// Subscribe to changes of the identifier field
    pub fn on_change(&mut self, listener: impl FnMut(&str) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Candidates currently shown in the dropdown
    pub fn dropdown(&self) -> &[Candidate] {
        &self.dropdown
    }

    /// Selected identifier; `None` when the field holds 0 or nothing
    pub fn selection(&self) -> Option<u64> {
        self.binding
            .id_value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
    }

    /// When the pending lookup becomes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Edit button: show and focus the search input
    pub fn edit(&mut self) {
        self.state = WidgetState::Open;
        self.binding.search_visible = true;
        self.binding.search_focused = true;
    }

    /// Cancel button: close without touching the selection
    pub fn cancel(&mut self) {
        self.close(WidgetState::Closed);
    }

    fn close(&mut self, next: WidgetState) {
        self.binding.search_text.clear();
        // Forget the term so the same text looks up again next time
        self.term = None;
        self.deadline = None;
        // Requests still in flight belong to the closed session
        self.issued_seq += 1;
        self.dropdown.clear();
        self.binding.search_visible = false;
        self.binding.search_focused = false;
        self.state = next;
    }

    /// Keystroke in the search input; re-arms the debounce timer
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        if self.state != WidgetState::Open {
            debug!("Ignoring input on closed field {}", self.binding.name);
            return;
        }
        self.binding.search_text = text.into();
        self.deadline = Some(now + self.delay);
    }

    /// Fire the debounced lookup if its delay has elapsed
    pub fn poll(&mut self, now: Instant) -> LookupStep {
        match self.deadline {
            Some(deadline) if self.state == WidgetState::Open && now >= deadline => {}
            _ => return LookupStep::Idle,
        }
        self.deadline = None;

        let text = self.binding.search_text.clone();
        if self.term.as_deref() == Some(text.as_str()) {
            return LookupStep::Skipped;
        }
        self.term = Some(text.clone());

        if text.chars().count() < self.min_length {
            self.dropdown.clear();
            return LookupStep::Skipped;
        }

        if let Some(cached) = self.cache.get(&text) {
            debug!("Cache hit for '{}' on {}", text, self.binding.name);
            self.dropdown = cached;
            return LookupStep::Cached;
        }

        self.issued_seq += 1;
        LookupStep::Fetch(LookupTicket {
            seq: self.issued_seq,
            term: text,
            search_url: self.binding.search_url.clone(),
        })
    }

    /// Apply the outcome of a fetched lookup; returns whether it was rendered
    pub fn complete(&mut self, ticket: LookupTicket, outcome: Result<Vec<Candidate>>) -> bool {
        let latest = ticket.seq == self.issued_seq;

        match outcome {
            Ok(candidates) => {
                self.cache.insert(ticket.term.clone(), candidates.clone());
                if latest && self.state == WidgetState::Open {
                    self.dropdown = candidates;
                    true
                } else {
                    debug!(
                        "Discarding response #{} for '{}' (latest #{})",
                        ticket.seq, ticket.term, self.issued_seq
                    );
                    false
                }
            }
            Err(e) => {
                error!("Lookup for '{}' on {} failed: {}", ticket.term, self.binding.name, e);
                if latest {
                    if self.term.as_deref() == Some(ticket.term.as_str()) {
                        self.term = None;
                    }
                    self.notifier.alert(LOOKUP_FAILED_MESSAGE);
                }
                false
            }
        }
    }

    /// Poll and, when a request is due, run it through `client`
    pub async fn tick<C>(&mut self, client: &C, now: Instant) -> LookupStep
    where
        C: LookupClient + ?Sized,
    {
        let step = self.poll(now);
        if let LookupStep::Fetch(ticket) = &step {
            let outcome = client.lookup(&ticket.search_url, &ticket.term).await;
            self.complete(ticket.clone(), outcome);
        }
        step
    }

    /// Pick a dropdown entry by position
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.dropdown.get(index).cloned() {
            Some(candidate) => {
                self.select(&candidate);
                true
            }
            None => false,
        }
    }

    /// Apply a chosen candidate and close the search input
    pub fn select(&mut self, candidate: &Candidate) {
        self.binding.current_text = candidate
            .current_string
            .clone()
            .unwrap_or_else(|| candidate.name.clone());

        let id = candidate.id.to_string();
        if self.binding.id_value != id {
            self.set_id(id);
        }

        self.close(WidgetState::Selected);
    }

    /// Clear button: reset to the default text and identifier 0
    pub fn clear(&mut self) -> bool {
        if !self.binding.has_clear_button {
            return false;
        }

        let default_text = self.binding.default_text.trim();
        self.binding.current_text = if default_text.is_empty() {
            DEFAULT_TEXT.to_string()
        } else {
            default_text.to_string()
        };
        self.set_id("0".to_string());
        true
    }

    /// Identifier written by something other than the widget (another script)
    pub fn set_id_externally(&mut self, value: impl Into<String>) {
        self.set_id(value.into());
    }

    /// Write the identifier and raise the change event
    fn set_id(&mut self, value: String) {
        self.binding.id_value = value;
        self.refresh_clear_button();
        let value = self.binding.id_value.clone();
        for listener in self.listeners.iter_mut() {
            listener(&value);
        }
    }

    fn refresh_clear_button(&mut self) {
        if self.binding.has_clear_button {
            let value = self.binding.id_value.trim();
            self.binding.clear_visible = !(value.is_empty() || value == "0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct FakeClient {
        responses: HashMap<String, Vec<Candidate>>,
        calls: AtomicUsize,
    }

    impl FakeClient {
        fn with(mut self, term: &str, candidates: Vec<Candidate>) -> Self {
            self.responses.insert(term.to_string(), candidates);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LookupClient for FakeClient {
        async fn lookup(&self, _search_url: &str, term: &str) -> Result<Vec<Candidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(term)
                .cloned()
                .ok_or(Error::Status(500))
        }
    }

    fn binding(clear: bool) -> FieldBinding {
        FieldBinding {
            name: "AuthorID".into(),
            search_url: "/field/AuthorID/search".into(),
            delay: None,
            default_text: "(none)".into(),
            current_text: "(none)".into(),
            id_value: "0".into(),
            search_text: String::new(),
            search_visible: false,
            search_focused: false,
            has_clear_button: clear,
            clear_visible: true,
        }
    }

    fn widget() -> (AutocompleteWidget, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let widget = AutocompleteWidget::bind(binding(true), SearchCache::new(), notifier.clone());
        (widget, notifier)
    }

    fn authors() -> Vec<Candidate> {
        vec![
            Candidate::new(2, "Joanna").with_current_string("<a href='/a/2'>Joanna</a>"),
            Candidate::new(1, "John").with_current_string("<a href='/a/1'>John</a>"),
        ]
    }

    #[test]
    fn test_edit_and_cancel() {
        let (mut widget, _) = widget();
        assert_eq!(widget.state(), WidgetState::Closed);

        widget.edit();
        assert_eq!(widget.state(), WidgetState::Open);
        assert!(widget.binding().search_visible);
        assert!(widget.binding().search_focused);

        widget.input("jo", Instant::now());
        widget.cancel();
        assert_eq!(widget.state(), WidgetState::Closed);
        assert_eq!(widget.binding().search_text, "");
        assert!(!widget.binding().search_visible);
        assert!(widget.next_deadline().is_none());
        assert_eq!(widget.binding().id_value, "0");
    }

    #[test]
    fn test_input_ignored_when_closed() {
        let (mut widget, _) = widget();
        widget.input("jo", Instant::now());
        assert!(widget.next_deadline().is_none());
        assert_eq!(widget.binding().search_text, "");
    }

    #[test]
    fn test_debounce_rearms_on_each_keystroke() {
        let (mut widget, _) = widget();
        let t0 = Instant::now();
        assert_eq!(widget.delay(), Duration::from_millis(300));

        widget.edit();
        widget.input("j", t0);
        assert_eq!(widget.poll(t0 + Duration::from_millis(200)), LookupStep::Idle);

        widget.input("jo", t0 + Duration::from_millis(200));
        assert_eq!(widget.poll(t0 + Duration::from_millis(400)), LookupStep::Idle);

        match widget.poll(t0 + Duration::from_millis(500)) {
            LookupStep::Fetch(ticket) => {
                assert_eq!(ticket.term, "jo");
                assert_eq!(ticket.seq, 1);
                assert_eq!(ticket.search_url, "/field/AuthorID/search");
            }
            other => panic!("expected fetch, got {:?}", other),
        }
        assert_eq!(widget.poll(t0 + Duration::from_secs(5)), LookupStep::Idle);
    }

    #[test]
    fn test_markup_delay_override() {
        let mut b = binding(false);
        b.delay = Some(Duration::from_millis(50));
        let widget =
            AutocompleteWidget::bind(b, SearchCache::new(), Arc::new(crate::widget::LogNotifier));
        assert_eq!(widget.delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_min_length() {
        let (widget, _) = widget();
        let mut widget = widget.with_min_length(2);
        let t0 = Instant::now();
        widget.edit();
        widget.input("j", t0);
        assert_eq!(widget.poll(t0 + widget.delay()), LookupStep::Skipped);
    }

    #[tokio::test]
    async fn test_cache_idempotence() {
        let (mut widget, _) = widget();
        let client = FakeClient::default().with("jo", authors());
        let t0 = Instant::now();

        widget.edit();
        widget.input("jo", t0);
        let first = widget.tick(&client, t0 + widget.delay()).await;
        assert!(matches!(first, LookupStep::Fetch(_)));
        let first_dropdown = widget.dropdown().to_vec();
        assert_eq!(first_dropdown, authors());

        // Unchanged text is not looked up again while open
        widget.input("jo", t0 + Duration::from_secs(1));
        assert_eq!(
            widget.tick(&client, t0 + Duration::from_secs(2)).await,
            LookupStep::Skipped
        );

        // After closing the same text is searched again, from the cache
        widget.cancel();
        widget.edit();
        widget.input("jo", t0 + Duration::from_secs(3));
        assert_eq!(
            widget.tick(&client, t0 + Duration::from_secs(4)).await,
            LookupStep::Cached
        );
        assert_eq!(widget.dropdown(), first_dropdown.as_slice());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_shared_cache_between_widgets() {
        let cache = SearchCache::new();
        let client = FakeClient::default().with("jo", authors());
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::default());
        let mut first = AutocompleteWidget::bind(binding(false), cache.clone(), notifier.clone());
        let mut second = AutocompleteWidget::bind(binding(false), cache, notifier);
        let t0 = Instant::now();

        for widget in [&mut first, &mut second] {
            let due = t0 + widget.delay();
            widget.edit();
            widget.input("jo", t0);
            widget.tick(&client, due).await;
        }
        assert_eq!(client.calls(), 1);
        assert_eq!(second.dropdown(), authors().as_slice());
    }

    #[test]
    fn test_stale_response_discarded() {
        let (mut widget, _) = widget();
        let t0 = Instant::now();
        widget.edit();

        widget.input("j", t0);
        let LookupStep::Fetch(older) = widget.poll(t0 + widget.delay()) else {
            panic!("expected fetch");
        };
        widget.input("jo", t0 + Duration::from_secs(1));
        let LookupStep::Fetch(newer) = widget.poll(t0 + Duration::from_secs(2)) else {
            panic!("expected fetch");
        };
        assert!(newer.seq > older.seq);

        assert!(widget.complete(newer, Ok(authors())));
        let slow = vec![Candidate::new(9, "Jim")];
        assert!(!widget.complete(older, Ok(slow.clone())));

        assert_eq!(widget.dropdown(), authors().as_slice());
        // Still correct for its own text, so it is cached
        assert_eq!(widget.cache.get("j"), Some(slow));
    }

    #[test]
    fn test_response_after_close_is_discarded() {
        let (mut widget, notifier) = widget();
        let t0 = Instant::now();

        widget.edit();
        widget.input("jo", t0);
        let LookupStep::Fetch(jo) = widget.poll(t0 + widget.delay()) else {
            panic!("expected fetch");
        };
        widget.cancel();

        widget.edit();
        widget.input("mark", t0 + Duration::from_secs(1));
        assert!(!widget.complete(jo.clone(), Ok(authors())));
        assert!(widget.dropdown().is_empty());
        assert!(!widget.select_index(0));
        assert_eq!(widget.binding().search_text, "mark");
        // Correct for its own text, so still cached
        assert_eq!(widget.cache.get("jo"), Some(authors()));

        // A failure from the closed session stays silent
        assert!(!widget.complete(jo, Err(Error::Status(500))));
        assert!(notifier.alerts.lock().unwrap().is_empty());

        let LookupStep::Fetch(mark) = widget.poll(t0 + Duration::from_secs(2)) else {
            panic!("expected fetch");
        };
        let marks = vec![Candidate::new(3, "Mark")];
        assert!(widget.complete(mark, Ok(marks.clone())));
        assert_eq!(widget.dropdown(), marks.as_slice());
    }

    #[test]
    fn test_response_after_selection_is_discarded() {
        let (mut widget, _) = widget();
        let t0 = Instant::now();

        widget.edit();
        widget.input("jo", t0);
        let LookupStep::Fetch(jo) = widget.poll(t0 + widget.delay()) else {
            panic!("expected fetch");
        };
        widget.select(&Candidate::new(3, "Mark"));
        widget.edit();

        assert!(!widget.complete(jo, Ok(authors())));
        assert!(widget.dropdown().is_empty());
    }

    #[tokio::test]
    async fn test_failure_not_cached_and_retryable() {
        let (mut widget, notifier) = widget();
        let client = FakeClient::default();
        let t0 = Instant::now();

        widget.edit();
        widget.input("mark", t0);
        widget.tick(&client, t0 + widget.delay()).await;

        assert_eq!(widget.state(), WidgetState::Open);
        assert!(!widget.cache.contains("mark"));
        assert!(widget.dropdown().is_empty());
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);

        // Re-typing the same text retries
        widget.input("mark", t0 + Duration::from_secs(1));
        let retry = widget.tick(&client, t0 + Duration::from_secs(2)).await;
        assert!(matches!(retry, LookupStep::Fetch(_)));
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_select_round_trip() {
        let (mut widget, _) = widget();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let seen = changes.clone();
        widget.on_change(move |v| seen.lock().unwrap().push(v.to_string()));

        widget.edit();
        widget.input("fo", Instant::now());
        widget.select(&Candidate::new(5, "Foo").with_current_string("<a href='/x'>Foo</a>"));

        assert_eq!(widget.binding().current_text, "<a href='/x'>Foo</a>");
        assert_eq!(widget.binding().id_value, "5");
        assert_eq!(widget.selection(), Some(5));
        assert_eq!(widget.state(), WidgetState::Selected);
        assert_eq!(widget.binding().search_text, "");
        assert!(!widget.binding().search_visible);
        assert_eq!(*changes.lock().unwrap(), vec!["5".to_string()]);

        // Same identifier again: no change event
        widget.edit();
        widget.select(&Candidate::new(5, "Foo"));
        assert_eq!(widget.binding().current_text, "Foo");
        assert_eq!(changes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_index_from_dropdown() {
        let (mut widget, _) = widget();
        let client = FakeClient::default().with("jo", authors());
        let t0 = Instant::now();

        widget.edit();
        widget.input("jo", t0);
        widget.tick(&client, t0 + widget.delay()).await;

        assert!(!widget.select_index(7));
        assert!(widget.select_index(1));
        assert_eq!(widget.selection(), Some(1));
        assert_eq!(widget.binding().current_text, "<a href='/a/1'>John</a>");
        assert!(widget.dropdown().is_empty());
    }

    #[test]
    fn test_clear() {
        let (mut widget, _) = widget();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let seen = changes.clone();
        widget.on_change(move |v| seen.lock().unwrap().push(v.to_string()));

        widget.select(&Candidate::new(3, "Mark"));
        assert!(widget.binding().clear_visible);

        assert!(widget.clear());
        assert_eq!(widget.binding().id_value, "0");
        assert_eq!(widget.binding().current_text, "(none)");
        assert_eq!(widget.selection(), None);
        assert!(!widget.binding().clear_visible);
        assert_eq!(*changes.lock().unwrap(), vec!["3".to_string(), "0".to_string()]);
    }

    #[test]
    fn test_clear_with_custom_and_empty_default() {
        let mut custom = binding(true);
        custom.default_text = "  Nobody ".into();
        let notifier = Arc::new(RecordingNotifier::default());
        let mut widget = AutocompleteWidget::bind(custom, SearchCache::new(), notifier.clone());
        widget.clear();
        assert_eq!(widget.binding().current_text, "Nobody");

        let mut empty = binding(true);
        empty.default_text = "   ".into();
        let mut widget = AutocompleteWidget::bind(empty, SearchCache::new(), notifier);
        widget.clear();
        assert_eq!(widget.binding().current_text, "(none)");
    }

    #[test]
    fn test_clear_disabled_without_button() {
        let mut widget = AutocompleteWidget::bind(
            binding(false),
            SearchCache::new(),
            Arc::new(RecordingNotifier::default()),
        );
        widget.set_id_externally("4");
        assert!(!widget.clear());
        assert_eq!(widget.binding().id_value, "4");
    }

    #[test]
    fn test_clear_button_visibility_follows_identifier() {
        let (mut widget, _) = widget();
        // Bound with id 0: hidden from the start
        assert!(!widget.binding().clear_visible);

        widget.set_id_externally("7");
        assert!(widget.binding().clear_visible);
        widget.set_id_externally("0");
        assert!(!widget.binding().clear_visible);
        widget.set_id_externally("12");
        assert!(widget.binding().clear_visible);
        widget.set_id_externally(" ");
        assert!(!widget.binding().clear_visible);
    }
}
