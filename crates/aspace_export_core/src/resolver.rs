//! Field resolution.
//!
//! [`resolve`] walks a [`FieldPath`] over a node's JSON document one
//! component at a time and reports the first component that does not exist.
//! [`FieldResolver`] turns those results into a [`Record`], substituting the
//! [`Missing`] placeholder for failed lookups and computing the derived
//! `date` field.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::config::ExportConfig;
use crate::date::{DEFAULT_DATE_SEPARATOR, normalize_date};
use crate::missing::Missing;
use crate::node::ArchivalNode;
use crate::path::FieldPath;
use crate::record::Record;

/// A dotted path stopped at a component that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{path}' has no attribute '{component}'")]
pub struct MissingAttribute {
    /// The full path being resolved.
    pub path: String,
    /// The component that could not be found.
    pub component: String,
    /// Position of `component` within the path.
    pub position: usize,
}

/// Resolves `path` against `node`.
///
/// Objects are indexed by key and arrays by decimal position. When an object
/// is a reference (`{"ref": uri}`) without the requested key, the referenced
/// record is loaded through the node and the walk continues there.
pub fn resolve<N: ArchivalNode>(node: &N, path: &FieldPath) -> Result<Value, MissingAttribute> {
    let mut segments = path.segments().iter().enumerate();
    let mut current = match segments.next() {
        Some((_, head)) => node.json().get(head).cloned(),
        None => None,
    }
    .ok_or_else(|| missing_at(path, 0))?;

    for (position, segment) in segments {
        current = step(node, &current, segment).ok_or_else(|| missing_at(path, position))?;
    }

    Ok(current)
}

fn missing_at(path: &FieldPath, position: usize) -> MissingAttribute {
    MissingAttribute {
        path: path.to_string(),
        component: path.segments()[position].clone(),
        position,
    }
}

fn step<N: ArchivalNode>(node: &N, current: &Value, segment: &str) -> Option<Value> {
    match current {
        Value::Object(map) => map
            .get(segment)
            .cloned()
            .or_else(|| follow_reference(node, map, segment)),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .cloned(),
        _ => None,
    }
}

fn follow_reference<N: ArchivalNode>(
    node: &N,
    map: &Map<String, Value>,
    segment: &str,
) -> Option<Value> {
    if let Some(resolved) = map.get("_resolved")
        && let Some(value) = resolved.get(segment)
    {
        return Some(value.clone());
    }

    let uri = map.get("ref").and_then(Value::as_str)?;
    match node.dereference(uri) {
        Ok(record) => record.get(segment).cloned(),
        Err(e) => {
            warn!("Failed to load {}: {}", uri, e);
            None
        }
    }
}

/// Renders a resolved value. `null` is an absence, not text.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Builds records from field specifications.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    missing: Missing,
    date_sep: String,
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self::new(Missing::default(), DEFAULT_DATE_SEPARATOR)
    }
}

impl FieldResolver {
    pub fn new(missing: Missing, date_sep: impl Into<String>) -> Self {
        Self {
            missing,
            date_sep: date_sep.into(),
        }
    }

    /// Creates a resolver using the placeholder and date separator from
    /// `config`.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            Missing::new(config.placeholder.clone()),
            config.date_separator.clone(),
        )
    }

    /// The sentinel substituted for missing attributes.
    pub fn missing(&self) -> &Missing {
        &self.missing
    }

    /// Resolves every field in `fields` against `node`.
    ///
    /// Never fails: missing attributes become the placeholder and are logged
    /// as warnings.
    pub fn resolve<N: ArchivalNode>(&self, node: &N, fields: &[FieldPath]) -> Record {
        let mut record = Record::with_capacity(fields.len());
        let mut date: Option<Option<String>> = None;

        for field in fields {
            if record.contains(field.as_str()) {
                continue;
            }

            let value = if field.is_date() {
                let derived = date.get_or_insert_with(|| self.derived_date(node));
                self.resolve_date(field, derived)
            } else {
                match resolve(node, field) {
                    Ok(value) => render(&value),
                    Err(missing) => self.substitute(&missing),
                }
            };

            record.insert(field.as_str(), value);
        }

        record
    }

    /// The display form of the node's first date, or `None` when there is no
    /// usable date.
    pub fn derived_date<N: ArchivalNode>(&self, node: &N) -> Option<String> {
        let dates = match node.dates() {
            Ok(dates) => dates,
            Err(e) => {
                warn!("{}: {}", node.uri(), e);
                return None;
            }
        };

        match normalize_date(dates.first()?, &self.date_sep) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("{}: {}", node.uri(), e);
                None
            }
        }
    }

    fn resolve_date(&self, field: &FieldPath, derived: &Option<String>) -> Option<String> {
        if field.segments().len() == 1 {
            return derived.clone();
        }

        // A derived date is plain text; it has no attributes of its own.
        self.substitute(&MissingAttribute {
            path: field.to_string(),
            component: field.segments()[1].clone(),
            position: 1,
        })
    }

    fn substitute(&self, missing: &MissingAttribute) -> Option<String> {
        let fallback = missing
            .path
            .split('.')
            .skip(missing.position + 1)
            .fold(&self.missing, |sentinel, segment| sentinel.attr(segment));
        warn!("{}: replacing with {:?}", missing, fallback);
        Some(fallback.to_string())
    }
}
