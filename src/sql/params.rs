//! Typed bind values for runtime-built queries.

use crate::config::ColumnType;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a PostgreSQL placeholder. Each variant reports its own wire type,
/// and the SQL casts the placeholder to the column type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
    Json(Value),
    I64Array(Vec<i64>),
}

impl PgBindValue {
    /// Bind value for an already validated form value stored in a column of type `ty`.
    pub fn for_column(ty: ColumnType, v: &Value) -> Self {
        if v.is_null() {
            return PgBindValue::Null;
        }
        match ty {
            ColumnType::Jsonb => PgBindValue::Json(v.clone()),
            ColumnType::Boolean => match v {
                Value::Bool(b) => PgBindValue::Bool(*b),
                other => PgBindValue::Text(text_of(other)),
            },
            ColumnType::BigSerial | ColumnType::BigInt | ColumnType::Integer => match v.as_i64() {
                Some(n) => PgBindValue::I64(n),
                None => PgBindValue::Text(text_of(v)),
            },
            ColumnType::Double => match v.as_f64() {
                Some(n) => PgBindValue::F64(n),
                None => PgBindValue::Text(text_of(v)),
            },
            ColumnType::Text | ColumnType::Date | ColumnType::Timestamptz => PgBindValue::Text(text_of(v)),
        }
    }
}

fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<&str> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf)?,
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
            PgBindValue::I64Array(ids) => <Vec<i64> as Encode<Postgres>>::encode_by_ref(ids, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::Text(_) => <&str as Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::Json(_) => <Value as Type<Postgres>>::type_info(),
            PgBindValue::I64Array(_) => <Vec<i64> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binds_follow_column_type() {
        assert_eq!(PgBindValue::for_column(ColumnType::BigInt, &json!(7)), PgBindValue::I64(7));
        assert_eq!(PgBindValue::for_column(ColumnType::Double, &json!(7)), PgBindValue::F64(7.0));
        assert_eq!(PgBindValue::for_column(ColumnType::Boolean, &json!(true)), PgBindValue::Bool(true));
        assert_eq!(
            PgBindValue::for_column(ColumnType::Date, &json!("2025-01-05")),
            PgBindValue::Text("2025-01-05".into())
        );
        assert_eq!(
            PgBindValue::for_column(ColumnType::Jsonb, &json!({"a": 1})),
            PgBindValue::Json(json!({"a": 1}))
        );
        assert_eq!(PgBindValue::for_column(ColumnType::Text, &Value::Null), PgBindValue::Null);
    }
}
