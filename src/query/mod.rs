//! Search field parsing and list query evaluation
//!
//! Searchable fields are written the way editors configure them:
//! - Plain attribute: `Name`
//! - Dotted path through a relation: `Team.Name`
//! - Explicit operator: `Email:StartsWith`
//! - Operator with modifiers: `Name:ExactMatch:case`, `Code:PartialMatch:not`
//!
//! A field without an operator searches with `PartialMatch:nocase`.

use crate::error::{Error, Result};
use crate::source::{resolve_path, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

static PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid path regex")
});

/// Comparison applied between a record attribute and the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    ExactMatch,
    PartialMatch,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl MatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOp::ExactMatch => "ExactMatch",
            MatchOp::PartialMatch => "PartialMatch",
            MatchOp::StartsWith => "StartsWith",
            MatchOp::EndsWith => "EndsWith",
            MatchOp::GreaterThan => "GreaterThan",
            MatchOp::GreaterThanOrEqual => "GreaterThanOrEqual",
            MatchOp::LessThan => "LessThan",
            MatchOp::LessThanOrEqual => "LessThanOrEqual",
        }
    }
}

impl FromStr for MatchOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ExactMatch" => Ok(MatchOp::ExactMatch),
            "PartialMatch" => Ok(MatchOp::PartialMatch),
            "StartsWith" => Ok(MatchOp::StartsWith),
            "EndsWith" => Ok(MatchOp::EndsWith),
            "GreaterThan" => Ok(MatchOp::GreaterThan),
            "GreaterThanOrEqual" => Ok(MatchOp::GreaterThanOrEqual),
            "LessThan" => Ok(MatchOp::LessThan),
            "LessThanOrEqual" => Ok(MatchOp::LessThanOrEqual),
            other => Err(Error::Configuration(format!(
                "unknown search operator '{}'",
                other
            ))),
        }
    }
}

/// A parsed searchable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchField {
    /// Attribute path, one segment per relation hop
    pub path: Vec<String>,
    /// Comparison operator
    pub op: MatchOp,
    /// Compare case-sensitively
    pub case_sensitive: bool,
    /// Invert the match
    pub negate: bool,
}

impl SearchField {
    /// Parse a field spec such as `Team.Name` or `Email:StartsWith:case`
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parts = spec.trim().split(':');
        let path = parts.next().unwrap_or_default();

        if !PATH_RE.is_match(path) {
            return Err(Error::Configuration(format!(
                "malformed search field '{}'",
                spec
            )));
        }

        let path = path.split('.').map(String::from).collect();

        let Some(op) = parts.next() else {
            return Ok(Self {
                path,
                op: MatchOp::PartialMatch,
                case_sensitive: false,
                negate: false,
            });
        };

        let mut field = Self {
            path,
            op: op.parse()?,
            case_sensitive: false,
            negate: false,
        };

        for modifier in parts {
            match modifier {
                "case" => field.case_sensitive = true,
                "nocase" => field.case_sensitive = false,
                "not" => field.negate = true,
                other => {
                    return Err(Error::Configuration(format!(
                        "unknown search modifier '{}' in '{}'",
                        other, spec
                    )))
                }
            }
        }

        Ok(field)
    }

    /// Dotted attribute path without the operator suffix
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Test a single record against the query text
    pub fn matches(&self, record: &dyn Record, text: &str) -> bool {
        let matched = resolve_path(record, &self.path)
            .as_ref()
            .and_then(value_text)
            .map(|value| self.compare(&value, text))
            .unwrap_or(false);

        matched != self.negate
    }

    fn compare(&self, value: &str, text: &str) -> bool {
        let (value, text) = if self.case_sensitive {
            (value.to_string(), text.to_string())
        } else {
            (value.to_lowercase(), text.to_lowercase())
        };

        match self.op {
            MatchOp::ExactMatch => value == text,
            MatchOp::PartialMatch => value.contains(&text),
            MatchOp::StartsWith => value.starts_with(&text),
            MatchOp::EndsWith => value.ends_with(&text),
            MatchOp::GreaterThan => compare_text(&value, &text) == Ordering::Greater,
            MatchOp::GreaterThanOrEqual => compare_text(&value, &text) != Ordering::Less,
            MatchOp::LessThan => compare_text(&value, &text) == Ordering::Less,
            MatchOp::LessThanOrEqual => compare_text(&value, &text) != Ordering::Greater,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path_string(), self.op.as_str())?;
        if self.case_sensitive {
            write!(f, ":case")?;
        } else {
            write!(f, ":nocase")?;
        }
        if self.negate {
            write!(f, ":not")?;
        }
        Ok(())
    }
}

/// One field compared against one value
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: SearchField,
    pub value: String,
}

/// Disjunction of conditions: a record passes if any condition matches
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    /// Build a filter matching `text` against any of `fields`
    pub fn any(fields: &[SearchField], text: &str) -> Self {
        Self {
            conditions: fields
                .iter()
                .map(|field| Condition {
                    field: field.clone(),
                    value: text.to_string(),
                })
                .collect(),
        }
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        self.conditions
            .iter()
            .any(|c| c.field.matches(record, &c.value))
    }
}

/// Ascending sort on an attribute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub path: Vec<String>,
}

impl SortKey {
    pub fn asc(path: Vec<String>) -> Self {
        Self { path }
    }
}

/// Filter, sort and limit for a list of records
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Vec<SortKey>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_any(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the query over an in-memory record set
    pub fn apply<I>(&self, records: I) -> Vec<Arc<dyn Record>>
    where
        I: IntoIterator<Item = Arc<dyn Record>>,
    {
        let mut matched: Vec<Arc<dyn Record>> = records
            .into_iter()
            .filter(|r| self.filter.as_ref().map_or(true, |f| f.matches(r.as_ref())))
            .collect();

        // Stable sort keeps source order for full ties
        matched.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|key| {
                    compare_values(
                        resolve_path(a.as_ref(), &key.path).as_ref(),
                        resolve_path(b.as_ref(), &key.path).as_ref(),
                    )
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
    }
}

/// Text form of an attribute used for matching; null never matches
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Numeric comparison when both sides parse as numbers, text otherwise
fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Ascending order over attribute values: missing/null first, then booleans,
/// numbers, and strings (case-insensitive, exact order breaks ties)
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        (Some(x), Some(y)) if rank(a) == 4 && rank(b) == 4 => x.to_string().cmp(&y.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}
