//! Display formatting for view pages, list cells and form pages.

use crate::config::{EntryFormat, FormField, ResourceConfig, TableColumn};
use crate::service::RecordOption;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_PLACEHOLDER: &str = "-";
pub const ICON_TRUE: &str = "heroicon-o-check-circle";
pub const ICON_FALSE: &str = "heroicon-o-x-circle";

const DATE_DISPLAY: &str = "%b %-d, %Y";
const DATE_TIME_DISPLAY: &str = "%b %-d, %Y %H:%M:%S";

/// One infolist entry resolved against a record.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RenderedEntry {
    pub name: String,
    pub label: String,
    pub format: EntryFormat,
    pub value: Value,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
}

/// A form field with the value the page should show.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedField {
    #[serde(flatten)]
    pub field: FormField,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub record_options: Vec<RecordOption>,
}

fn is_absent(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn raw_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
}

fn format_date(s: &str) -> Option<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_instant(s).map(|dt| dt.date()))
        .map(|d| d.format(DATE_DISPLAY).to_string())
}

fn format_date_time(s: &str) -> Option<String> {
    parse_instant(s)
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.format(DATE_TIME_DISPLAY).to_string())
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Display text and icon of a present value. Malformed values fall back to their raw text.
pub fn format_value(format: EntryFormat, v: &Value) -> (String, Option<&'static str>) {
    match format {
        EntryFormat::Date => (v.as_str().and_then(format_date).unwrap_or_else(|| raw_text(v)), None),
        EntryFormat::DateTime => (v.as_str().and_then(format_date_time).unwrap_or_else(|| raw_text(v)), None),
        EntryFormat::Boolean => {
            let on = truthy(v);
            (on.to_string(), Some(if on { ICON_TRUE } else { ICON_FALSE }))
        }
        EntryFormat::Json => (serde_json::to_string(v).unwrap_or_else(|_| raw_text(v)), None),
        EntryFormat::Numeric | EntryFormat::Text | EntryFormat::Badge => (raw_text(v), None),
    }
}

/// Resolve every infolist entry of `resource` against `record`. Never fails: absent
/// values show the entry placeholder.
pub fn render_infolist(resource: &ResourceConfig, record: &Value) -> Vec<RenderedEntry> {
    resource
        .infolist
        .iter()
        .map(|entry| {
            let value = record.get(&entry.name);
            let (display, icon) = if is_absent(value) && entry.format != EntryFormat::Boolean {
                (
                    entry.placeholder.clone().unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
                    None,
                )
            } else {
                format_value(entry.format, value.unwrap_or(&Value::Null))
            };
            RenderedEntry {
                name: entry.name.clone(),
                label: entry.label.clone(),
                format: entry.format,
                value: value.cloned().unwrap_or(Value::Null),
                display,
                icon,
            }
        })
        .collect()
}

/// Display strings of one list row, keyed by table column.
pub fn render_row(columns: &[TableColumn], record: &Value) -> Map<String, Value> {
    columns
        .iter()
        .map(|c| {
            let value = record.get(&c.name);
            let display = if is_absent(value) && c.format != EntryFormat::Boolean {
                DEFAULT_PLACEHOLDER.to_string()
            } else {
                format_value(c.format, value.unwrap_or(&Value::Null)).0
            };
            (c.name.clone(), Value::String(display))
        })
        .collect()
}

/// Form fields with their current values: the record's on edit, the declared defaults on create.
pub fn render_form(
    resource: &ResourceConfig,
    record: Option<&Value>,
    mut options: HashMap<String, Vec<RecordOption>>,
) -> Vec<RenderedField> {
    resource
        .form
        .iter()
        .map(|field| {
            let value = match record {
                Some(r) => r.get(&field.name).cloned().unwrap_or(Value::Null),
                None => field.default.clone().unwrap_or(Value::Null),
            };
            RenderedField {
                field: field.clone(),
                value,
                record_options: options.remove(&field.name).unwrap_or_default(),
            }
        })
        .collect()
}
