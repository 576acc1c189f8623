//! Generic CRUD execution against PostgreSQL.

use crate::config::{ColumnType, ResourceConfig};
use crate::error::AppError;
use crate::sql::{self, ListParams, QueryBuf};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

/// Bulk actions touch at most this many records.
pub const BULK_LIMIT: usize = 100;

/// Options offered by a relationship select.
const OPTION_LIMIT: u32 = 50;

/// One relationship select option.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecordOption {
    pub value: i64,
    pub label: String,
}

pub struct CrudService;

impl CrudService {
    /// One page of rows plus the total count under the same search.
    pub async fn list(
        pool: &PgPool,
        resource: &ResourceConfig,
        params: &ListParams,
    ) -> Result<(Vec<Value>, u64), AppError> {
        let q = sql::count(resource, params.search.as_deref());
        log_query(&q);
        let total: i64 = bind_all(sqlx::query(&q.sql), &q).fetch_one(pool).await?.try_get(0)?;
        let q = sql::select_page(resource, params);
        log_query(&q);
        let rows = bind_all(sqlx::query(&q.sql), &q).fetch_all(pool).await?;
        Ok((rows.iter().map(|r| row_to_json(resource, r)).collect(), total.max(0) as u64))
    }

    pub async fn read(pool: &PgPool, resource: &ResourceConfig, id: i64) -> Result<Option<Value>, AppError> {
        let q = sql::select_by_id(resource, id);
        Self::fetch_optional(pool, resource, &q).await
    }

    /// Insert validated values. Returns the created row.
    pub async fn create(
        pool: &PgPool,
        resource: &ResourceConfig,
        values: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let q = sql::insert(resource, values);
        Self::fetch_optional(pool, resource, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Update the given columns of one row. Returns the updated row, or None when absent.
    pub async fn update(
        pool: &PgPool,
        resource: &ResourceConfig,
        id: i64,
        values: &Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::update(resource, id, values);
        Self::fetch_optional(pool, resource, &q).await
    }

    /// Delete one row. Returns whether it existed.
    pub async fn delete(pool: &PgPool, resource: &ResourceConfig, id: i64) -> Result<bool, AppError> {
        let q = sql::delete_by_id(resource, id);
        log_query(&q);
        let done = bind_all(sqlx::query(&q.sql), &q).execute(pool).await?;
        Ok(done.rows_affected() > 0)
    }

    /// Delete a batch of rows in one statement. Returns the number deleted.
    pub async fn delete_many(pool: &PgPool, resource: &ResourceConfig, ids: &[i64]) -> Result<u64, AppError> {
        if ids.len() > BULK_LIMIT {
            return Err(AppError::BadRequest(format!(
                "bulk delete limited to {} records",
                BULK_LIMIT
            )));
        }
        if ids.is_empty() {
            return Ok(0);
        }
        let q = sql::delete_many(resource, ids);
        log_query(&q);
        let done = bind_all(sqlx::query(&q.sql), &q).execute(pool).await?;
        Ok(done.rows_affected())
    }

    pub async fn exists(pool: &PgPool, table: &str, id: i64) -> Result<bool, AppError> {
        let q = sql::exists(table, id);
        log_query(&q);
        let row = bind_all(sqlx::query(&q.sql), &q).fetch_one(pool).await?;
        Ok(row.try_get::<bool, _>(0)?)
    }

    /// Id/label pairs of `table` for a relationship select.
    pub async fn options(pool: &PgPool, table: &str, title_column: &str) -> Result<Vec<RecordOption>, AppError> {
        let q = sql::select_options(table, title_column, OPTION_LIMIT);
        log_query(&q);
        let rows = sqlx::query(&q.sql).fetch_all(pool).await?;
        rows.iter()
            .map(|r| -> Result<RecordOption, AppError> {
                Ok(RecordOption {
                    value: r.try_get("id")?,
                    label: r.try_get::<Option<String>, _>("label")?.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn fetch_optional(pool: &PgPool, resource: &ResourceConfig, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        log_query(q);
        let row = bind_all(sqlx::query(&q.sql), q).fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(resource, &r)))
    }
}

fn log_query(q: &QueryBuf) {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
}

fn bind_all<'q>(mut query: Query<'q, Postgres, PgArguments>, q: &QueryBuf) -> Query<'q, Postgres, PgArguments> {
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

/// Decode a row by the declared column types. Columns that fail to decode become null.
fn row_to_json(resource: &ResourceConfig, row: &PgRow) -> Value {
    let mut map = Map::new();
    for c in &resource.columns {
        map.insert(c.name.clone(), cell_to_value(row, &c.name, c.column_type));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str, ty: ColumnType) -> Value {
    let decoded = match ty {
        ColumnType::BigSerial | ColumnType::BigInt => row.try_get::<Option<i64>, _>(name).map(|v| v.map(Value::from)),
        ColumnType::Integer => row.try_get::<Option<i32>, _>(name).map(|v| v.map(Value::from)),
        ColumnType::Double => row
            .try_get::<Option<f64>, _>(name)
            .map(|v| v.and_then(serde_json::Number::from_f64).map(Value::Number)),
        ColumnType::Text => row.try_get::<Option<String>, _>(name).map(|v| v.map(Value::String)),
        ColumnType::Boolean => row.try_get::<Option<bool>, _>(name).map(|v| v.map(Value::Bool)),
        ColumnType::Date => row
            .try_get::<Option<chrono::NaiveDate>, _>(name)
            .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))),
        ColumnType::Timestamptz => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)
            .map(|v| v.map(|d| Value::String(d.to_rfc3339()))),
        ColumnType::Jsonb => row.try_get::<Option<Value>, _>(name),
    };
    match decoded {
        Ok(v) => v.unwrap_or(Value::Null),
        Err(e) => {
            tracing::warn!(column = %name, error = %e, "column decode failed");
            Value::Null
        }
    }
}
