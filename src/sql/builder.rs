//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a resource descriptor.

use crate::config::{ResourceConfig, SortDirection};
use crate::sql::PgBindValue;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from descriptors).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Resolved list request: search term, whitelisted sort, page window.
#[derive(Clone, Debug, PartialEq)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: String,
    pub direction: SortDirection,
    pub limit: u32,
    pub offset: u64,
}

fn select_column_list(resource: &ResourceConfig) -> String {
    resource
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// ` WHERE (a::text ILIKE $n OR ...)` over the searchable columns, or nothing.
fn search_clause(resource: &ResourceConfig, search: Option<&str>, q: &mut QueryBuf) -> String {
    let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let cols: Vec<&str> = resource.table_schema.searchable_columns().collect();
    if cols.is_empty() {
        return String::new();
    }
    let n = q.push_param(PgBindValue::Text(like_pattern(term)));
    let ors: Vec<String> = cols
        .iter()
        .map(|c| format!("{}::text ILIKE ${}", quoted(c), n))
        .collect();
    format!(" WHERE ({})", ors.join(" OR "))
}

/// One page of rows. The sort column must already be whitelisted.
pub fn select_page(resource: &ResourceConfig, params: &ListParams) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = search_clause(resource, params.search.as_deref(), &mut q);
    let mut order = format!("{} {}", quoted(&params.sort), params.direction.sql());
    if params.sort != "id" {
        order.push_str(&format!(", {} {}", quoted("id"), params.direction.sql()));
    }
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT {} OFFSET {}",
        select_column_list(resource),
        quoted(&resource.table),
        where_clause,
        order,
        params.limit,
        params.offset
    );
    q
}

/// Row count under the same search filter as [`select_page`].
pub fn count(resource: &ResourceConfig, search: Option<&str>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = search_clause(resource, search, &mut q);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(&resource.table), where_clause);
    q
}

pub fn select_by_id(resource: &ResourceConfig, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}::bigint",
        select_column_list(resource),
        quoted(&resource.table),
        quoted("id"),
        n
    );
    q
}

/// INSERT of the given values; absent columns take their database default.
pub fn insert(resource: &ResourceConfig, values: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &resource.columns {
        if c.is_primary_key() {
            continue;
        }
        let Some(v) = values.get(&c.name) else { continue };
        let n = q.push_param(PgBindValue::for_column(c.column_type, v));
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}::{}", n, c.column_type.cast()));
    }
    let table = quoted(&resource.table);
    let returning = select_column_list(resource);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET only the given columns, and bump `updated_at`.
pub fn update(resource: &ResourceConfig, id: i64, values: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &resource.columns {
        if c.is_primary_key() || c.name == "updated_at" || c.name == "created_at" {
            continue;
        }
        let Some(v) = values.get(&c.name) else { continue };
        let n = q.push_param(PgBindValue::for_column(c.column_type, v));
        sets.push(format!("{} = ${}::{}", quoted(&c.name), n, c.column_type.cast()));
    }
    if resource.column("updated_at").is_some() {
        sets.push(format!("{} = NOW()", quoted("updated_at")));
    }
    let n = q.push_param(PgBindValue::I64(id));
    let table = quoted(&resource.table);
    let returning = select_column_list(resource);
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE {} = ${}::bigint", returning, table, quoted("id"), n)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = ${}::bigint RETURNING {}",
            table,
            sets.join(", "),
            quoted("id"),
            n,
            returning
        )
    };
    q
}

pub fn delete_by_id(resource: &ResourceConfig, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}::bigint",
        quoted(&resource.table),
        quoted("id"),
        n
    );
    q
}

pub fn delete_many(resource: &ResourceConfig, ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64Array(ids.to_vec()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ANY(${}::bigint[])",
        quoted(&resource.table),
        quoted("id"),
        n
    );
    q
}

/// `SELECT EXISTS(...)` for a row of any table by id; used for reference checks.
pub fn exists(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ${}::bigint)",
        quoted(table),
        quoted("id"),
        n
    );
    q
}

/// `(id, label)` pairs for a relationship select, ordered by label.
pub fn select_options(table: &str, title_column: &str, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {id}, {title}::text AS label FROM {table} ORDER BY {title}, {id} LIMIT {limit}",
        id = quoted("id"),
        title = quoted(title_column),
        table = quoted(table),
        limit = limit
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDef, ColumnType, TableColumn, TableSchema};
    use serde_json::json;

    fn item() -> ResourceConfig {
        ResourceConfig::new("ChecklistItem")
            .columns(vec![
                ColumnDef::foreign("trip_id", "trips"),
                ColumnDef::text("title"),
                ColumnDef::new("is_completed", ColumnType::Boolean).default_value(false),
            ])
            .table(TableSchema::new(vec![TableColumn::text("title").searchable()]))
            .with_timestamps()
    }

    fn list(search: Option<&str>) -> ListParams {
        ListParams {
            search: search.map(String::from),
            sort: "title".into(),
            direction: SortDirection::Asc,
            limit: 10,
            offset: 20,
        }
    }

    #[test]
    fn page_with_search_and_sort() {
        let q = select_page(&item(), &list(Some("50%")));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"trip_id\", \"title\", \"is_completed\", \"created_at\", \"updated_at\" \
             FROM \"checklist_items\" WHERE (\"title\"::text ILIKE $1) \
             ORDER BY \"title\" ASC, \"id\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(q.params, vec![PgBindValue::Text("%50\\%%".into())]);
    }

    #[test]
    fn blank_search_adds_no_filter() {
        let q = count(&item(), Some("  "));
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"checklist_items\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_casts_each_placeholder() {
        let values = json!({"trip_id": 3, "title": "Passport"});
        let q = insert(&item(), values.as_object().unwrap());
        assert_eq!(
            q.sql,
            "INSERT INTO \"checklist_items\" (\"trip_id\", \"title\") VALUES ($1::bigint, $2::text) \
             RETURNING \"id\", \"trip_id\", \"title\", \"is_completed\", \"created_at\", \"updated_at\""
        );
        assert_eq!(q.params, vec![PgBindValue::I64(3), PgBindValue::Text("Passport".into())]);
    }

    #[test]
    fn update_touches_updated_at_and_binds_id_last() {
        let values = json!({"is_completed": true, "id": 99});
        let q = update(&item(), 5, values.as_object().unwrap());
        assert!(q.sql.starts_with(
            "UPDATE \"checklist_items\" SET \"is_completed\" = $1::boolean, \"updated_at\" = NOW() WHERE \"id\" = $2::bigint"
        ));
        assert_eq!(q.params, vec![PgBindValue::Bool(true), PgBindValue::I64(5)]);
    }

    #[test]
    fn delete_many_uses_array_param() {
        let q = delete_many(&item(), &[1, 2]);
        assert_eq!(q.sql, "DELETE FROM \"checklist_items\" WHERE \"id\" = ANY($1::bigint[])");
        assert_eq!(q.params, vec![PgBindValue::I64Array(vec![1, 2])]);
    }

    #[test]
    fn exists_and_quoting() {
        assert_eq!(
            exists("trips", 4).sql,
            "SELECT EXISTS(SELECT 1 FROM \"trips\" WHERE \"id\" = $1::bigint)"
        );
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }
}
