//! Form validation from resource descriptors.

use crate::config::{ColumnDef, ColumnType, FormField, ResourceConfig, Widget};
use crate::error::{AppError, FieldErrors};
use crate::morph::{MorphKind, MorphRef};
use crate::service::CrudService;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use sqlx::PgPool;

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// How much of the form a request must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Required fields enforced, form defaults applied, generated fields filled.
    Create,
    /// Required fields enforced, nothing defaulted.
    Replace,
    /// Only the fields present are validated.
    Patch,
}

pub struct FormValidator;

impl FormValidator {
    /// Validate and coerce `body` against the resource form. Unknown keys are dropped;
    /// every field error is collected before failing.
    pub fn validate(resource: &ResourceConfig, body: &Value, mode: Mode) -> Result<Map<String, Value>, AppError> {
        let body = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("request body must be a JSON object".into()))?;
        let mut out = Map::new();
        let mut errors = FieldErrors::new();

        for field in &resource.form {
            let Some(column) = resource.column(&field.name) else { continue };
            let raw = body.get(&field.name);
            if raw.is_none() && mode == Mode::Patch {
                continue;
            }
            let mut value = match raw {
                Some(v) => match coerce(resource, field, column, v) {
                    Ok(v) => v,
                    Err(msg) => {
                        errors.entry(field.name.clone()).or_default().push(msg);
                        continue;
                    }
                },
                None => Value::Null,
            };

            if value.is_null() && mode == Mode::Create {
                if field.generated {
                    value = Value::String(uuid::Uuid::new_v4().simple().to_string());
                } else if let Some(default) = &field.default {
                    value = default.clone();
                }
            }

            if value.is_null() {
                if field.required {
                    errors
                        .entry(field.name.clone())
                        .or_default()
                        .push(format!("The {} field is required.", field.label));
                    continue;
                }
                if raw.is_none() {
                    continue;
                }
                if !column.nullable {
                    if mode == Mode::Create && column.has_default() {
                        continue;
                    }
                    errors
                        .entry(field.name.clone())
                        .or_default()
                        .push(format!("The {} field cannot be empty.", field.label));
                    continue;
                }
            }
            out.insert(field.name.clone(), value);
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(AppError::InvalidForm(errors))
        }
    }

    /// Every relationship value names an existing row, and the morph pair (if any)
    /// names an allowed kind with an existing target. `values` must hold the full record
    /// for the morph check to see both halves of the pair.
    pub async fn check_references(
        pool: &PgPool,
        resource: &ResourceConfig,
        values: &Map<String, Value>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        for field in &resource.form {
            let Some(rel) = &field.relationship else { continue };
            let Some(id) = values.get(&field.name).and_then(Value::as_i64) else { continue };
            if !CrudService::exists(pool, &rel.table, id).await? {
                errors
                    .entry(field.name.clone())
                    .or_default()
                    .push(format!("The selected {} is invalid.", field.label.to_lowercase()));
            }
        }

        if let Some(morph) = &resource.morph {
            let type_value = values.get(&morph.type_field).unwrap_or(&Value::Null);
            let id_value = values.get(&morph.id_field).unwrap_or(&Value::Null);
            match MorphRef::from_values(type_value, id_value, &morph.kinds) {
                Ok(target) => {
                    if !CrudService::exists(pool, target.kind.table(), target.id).await? {
                        errors
                            .entry(morph.id_field.clone())
                            .or_default()
                            .push(format!("The referenced {} does not exist.", target.kind.model()));
                    }
                }
                Err(e) => errors.entry(morph.id_field.clone()).or_default().push(e.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(resource = %resource.slug, ?errors, "reference check failed");
            Err(AppError::InvalidForm(errors))
        }
    }
}

fn is_morph_type(resource: &ResourceConfig, name: &str) -> bool {
    resource.morph.as_ref().is_some_and(|m| m.type_field == name)
}

/// Coerce one submitted value to what the column stores. Blank strings become null.
fn coerce(resource: &ResourceConfig, field: &FormField, column: &ColumnDef, v: &Value) -> Result<Value, String> {
    if let Value::String(s) = v {
        if s.trim().is_empty() {
            return Ok(Value::Null);
        }
    }
    if v.is_null() {
        return Ok(Value::Null);
    }
    let label = &field.label;
    if contains_nul(v) {
        return Err(format!("The {} field must not contain null characters.", label));
    }

    match field.widget {
        Widget::NumericInput => {
            let n = number_of(v).ok_or_else(|| format!("The {} field must be a number.", label))?;
            if column.column_type.is_integer() {
                let i = integer_of(&n).ok_or_else(|| format!("The {} field must be an integer.", label))?;
                let fits = column.column_type != ColumnType::Integer
                    || i.as_i64().is_some_and(|i| i32::try_from(i).is_ok());
                if !fits {
                    return Err(format!(
                        "The {} field must be between {} and {}.",
                        label,
                        i32::MIN,
                        i32::MAX
                    ));
                }
                Ok(i)
            } else {
                Ok(n)
            }
        }
        Widget::Select if field.relationship.is_some() => number_of(v)
            .and_then(|n| integer_of(&n))
            .filter(|n| n.as_i64().is_some_and(|id| id > 0))
            .ok_or_else(|| format!("The selected {} is invalid.", label.to_lowercase())),
        Widget::Select => {
            let raw = scalar_text(v).ok_or_else(|| format!("The selected {} is invalid.", label.to_lowercase()))?;
            let value = if is_morph_type(resource, &field.name) {
                MorphKind::parse(&raw).map(|k| k.alias().to_string()).unwrap_or(raw)
            } else {
                raw
            };
            if !field.options.is_empty() && !field.options.iter().any(|o| o.value == value) {
                return Err(format!("The selected {} is invalid.", label.to_lowercase()));
            }
            Ok(Value::String(value))
        }
        Widget::Toggle => match v {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("The {} field must be true or false.", label)),
            },
            _ => Err(format!("The {} field must be true or false.", label)),
        },
        Widget::DatePicker => {
            let s = v.as_str().map(str::trim).unwrap_or_default();
            let well_formed = Regex::new(DATE_PATTERN).map(|re| re.is_match(s)).unwrap_or(false);
            match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(d) if well_formed => Ok(Value::String(d.format("%Y-%m-%d").to_string())),
                _ => Err(format!("The {} field must be a valid date.", label)),
            }
        }
        Widget::DateTimePicker => v
            .as_str()
            .and_then(parse_date_time)
            .map(|dt| Value::String(dt.to_rfc3339()))
            .ok_or_else(|| format!("The {} field must be a valid date.", label)),
        Widget::KeyValue => match v {
            Value::Object(_) => Ok(v.clone()),
            _ => Err(format!("The {} field must be a set of key-value pairs.", label)),
        },
        Widget::TextInput | Widget::Textarea => {
            let s = scalar_text(v).ok_or_else(|| format!("The {} field must be a string.", label))?;
            if let Some(max) = field.max_length {
                if s.chars().count() > max as usize {
                    return Err(format!(
                        "The {} field must not be greater than {} characters.",
                        label, max
                    ));
                }
            }
            Ok(Value::String(s))
        }
    }
}

/// PostgreSQL text and jsonb cannot hold U+0000.
fn contains_nul(v: &Value) -> bool {
    match v {
        Value::String(s) => s.contains('\0'),
        Value::Array(items) => items.iter().any(contains_nul),
        Value::Object(map) => map.iter().any(|(k, v)| k.contains('\0') || contains_nul(v)),
        _ => false,
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_of(v: &Value) -> Option<Value> {
    match v {
        Value::Number(_) => Some(v.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Value::from(i));
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

fn integer_of(n: &Value) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::from(i));
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| Value::from(f as i64))
}

/// RFC 3339, or `YYYY-MM-DD HH:MM:SS` taken as UTC.
fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
