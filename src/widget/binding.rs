//! Binding between the widget and the rendered field markup
//!
//! The field markup is one `.hasoneautocomplete` container holding marked
//! children. The binding locates each child inside its container by class
//! name and mirrors the parts of their state the widget reads and writes.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

pub const CONTAINER_CLASS: &str = "hasoneautocomplete";
pub const CURRENT_TEXT_CLASS: &str = "hasoneautocomplete-currenttext";
pub const SEARCH_CLASS: &str = "hasoneautocomplete-search";
pub const ID_CLASS: &str = "hasoneautocomplete-id";
pub const EDIT_BUTTON_CLASS: &str = "hasoneautocomplete-editbutton";
pub const CANCEL_BUTTON_CLASS: &str = "hasoneautocomplete-cancelbutton";
pub const CLEAR_BUTTON_CLASS: &str = "hasoneautocomplete-clearbutton";
/// Class added to the container while the search input is shown
pub const SHOW_SEARCH_CLASS: &str = "showsearch";
/// Class of disabled or read-only containers, rendered without search controls
pub const LOCKED_CLASS: &str = "readonly";

/// Widget-side view of one field container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    /// Name of the hidden identifier input
    pub name: String,
    /// `data-search-url` of the search input
    pub search_url: String,
    /// `data-autocomplete-delay` override, when present and numeric
    pub delay: Option<Duration>,
    /// `data-default-text` of the container
    pub default_text: String,
    /// Inner HTML of the current-text slot
    pub current_text: String,
    /// Value of the hidden identifier input
    pub id_value: String,
    /// Value of the search input
    pub search_text: String,
    /// Whether the search input is shown
    pub search_visible: bool,
    pub search_focused: bool,
    pub has_clear_button: bool,
    pub clear_visible: bool,
}

fn selector(class: &str) -> Result<Selector> {
    Selector::parse(&format!(".{}", class)).map_err(|e| Error::Markup(e.to_string()))
}

fn child<'a>(container: ElementRef<'a>, class: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(container.select(&selector(class)?).next())
}

fn required<'a>(container: ElementRef<'a>, class: &str) -> Result<ElementRef<'a>> {
    child(container, class)?.ok_or_else(|| Error::Markup(format!("missing .{}", class)))
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("style")
        .map(|s| s.replace(' ', "").contains("display:none"))
        .unwrap_or(false)
}

impl FieldBinding {
    /// Bind the first field container found in `html`
    pub fn from_markup(html: &str) -> Result<Self> {
        Self::all_from_markup(html)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Markup(format!("no .{} container", CONTAINER_CLASS)))
    }

    /// Bind every editable field container found in `html`; locked
    /// containers are skipped
    pub fn all_from_markup(html: &str) -> Result<Vec<Self>> {
        let document = Html::parse_fragment(html);
        let containers = selector(CONTAINER_CLASS)?;
        document
            .select(&containers)
            .filter(|container| !has_class(*container, LOCKED_CLASS))
            .map(Self::from_container)
            .collect()
    }

    fn from_container(container: ElementRef<'_>) -> Result<Self> {
        let current = required(container, CURRENT_TEXT_CLASS)?;
        let search = required(container, SEARCH_CLASS)?;
        let id = required(container, ID_CLASS)?;
        required(container, EDIT_BUTTON_CLASS)?;
        required(container, CANCEL_BUTTON_CLASS)?;
        let clear = child(container, CLEAR_BUTTON_CLASS)?;

        let search_url = search
            .value()
            .attr("data-search-url")
            .ok_or_else(|| Error::Markup("search input has no data-search-url".to_string()))?
            .to_string();

        let delay = search
            .value()
            .attr("data-autocomplete-delay")
            .and_then(|d| d.trim().parse::<u64>().ok())
            .map(Duration::from_millis);

        Ok(Self {
            name: id.value().attr("name").unwrap_or_default().to_string(),
            search_url,
            delay,
            default_text: container
                .value()
                .attr("data-default-text")
                .unwrap_or_default()
                .to_string(),
            current_text: current.inner_html(),
            id_value: id.value().attr("value").unwrap_or_default().to_string(),
            search_text: search.value().attr("value").unwrap_or_default().to_string(),
            search_visible: has_class(container, SHOW_SEARCH_CLASS),
            search_focused: false,
            has_clear_button: clear.is_some(),
            clear_visible: clear.map(|c| !is_hidden(c)).unwrap_or(false),
        })
    }
}
