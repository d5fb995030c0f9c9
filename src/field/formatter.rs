//! Current-item text shown next to the Edit button

use super::config::FieldConfig;
use crate::error::{Error, Result};
use crate::query::value_text;
use crate::source::Record;

/// Display text for `item`: the default text when there is no persisted
/// record, otherwise its label, wrapped in a link when the record has one
pub fn current_item_text(config: &FieldConfig, item: Option<&dyn Record>) -> Result<String> {
    let Some(item) = item.filter(|i| i.id() > 0) else {
        return Ok(config.default_text.clone());
    };

    let text = label_of(config, item)?;

    Ok(match item.as_linkable().map(|l| l.link()) {
        Some(link) if !link.is_empty() => {
            format!("<a href='{}' target='_blank'>{}</a>", link, text)
        }
        _ => text,
    })
}

/// Plain label attribute of a record
pub fn label_of(config: &FieldConfig, item: &dyn Record) -> Result<String> {
    item.attribute(&config.label_field)
        .as_ref()
        .and_then(value_text)
        .ok_or_else(|| Error::AttributeMissing {
            field: config.label_field.clone(),
            class: item.class_name().to_string(),
        })
}
