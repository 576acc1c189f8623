//! DDL for the base tables and one table per registered resource.
//! Tables are created in foreign-key dependency order; every statement is idempotent.

use crate::config::{ColumnDef, ColumnType, ResourceConfig, ResourceRegistry};
use crate::error::{AppError, ConfigError};
use crate::sql::quoted;
use sqlx::PgPool;
use std::collections::HashSet;

/// A table to create: name, columns, and optional polymorphic pair to index.
#[derive(Clone, Debug)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub morph_index: Option<(String, String)>,
}

impl TableDef {
    fn new(name: &str, columns: Vec<ColumnDef>) -> Self {
        let mut columns = columns;
        columns.insert(0, ColumnDef::id());
        for ts in ["created_at", "updated_at"] {
            columns.push(ColumnDef::new(ts, ColumnType::Timestamptz).default_expression("NOW()"));
        }
        TableDef {
            name: name.to_string(),
            columns,
            morph_index: None,
        }
    }

    fn from_resource(r: &ResourceConfig) -> Self {
        TableDef {
            name: r.table.clone(),
            columns: r.columns.clone(),
            morph_index: r.morph.as_ref().map(|m| (m.type_field.clone(), m.id_field.clone())),
        }
    }

    fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter_map(|c| c.references.as_ref())
            .map(|fk| fk.table.as_str())
            .filter(move |t| *t != self.name)
    }
}

/// Users, trips and API tokens: referenced by resources, not administered through them.
pub fn base_tables() -> Vec<TableDef> {
    vec![
        TableDef::new(
            "users",
            vec![
                ColumnDef::text("name"),
                ColumnDef::text("email").unique(),
                ColumnDef::text("password"),
                ColumnDef::new("is_admin", ColumnType::Boolean).default_value(false),
            ],
        ),
        TableDef::new(
            "trips",
            vec![
                ColumnDef::foreign("user_id", "users"),
                ColumnDef::text("title"),
                ColumnDef::new("start_date", ColumnType::Date).nullable(),
                ColumnDef::new("end_date", ColumnType::Date).nullable(),
            ],
        ),
        TableDef::new(
            "personal_access_tokens",
            vec![
                ColumnDef::foreign("user_id", "users"),
                ColumnDef::text("name"),
                ColumnDef::text("token").unique(),
                ColumnDef::new("last_used_at", ColumnType::Timestamptz).nullable(),
                ColumnDef::new("expires_at", ColumnType::Timestamptz).nullable(),
            ],
        ),
    ]
}

/// Base tables first, then resource tables so that every referenced table precedes its referrers.
pub fn ordered_tables(registry: &ResourceRegistry) -> Result<Vec<TableDef>, ConfigError> {
    let mut pending: Vec<TableDef> = base_tables();
    pending.extend(registry.iter().map(TableDef::from_resource));

    let mut created: HashSet<String> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let before = pending.len();
        let mut rest = Vec::new();
        for t in pending {
            if t.dependencies().all(|d| created.contains(d)) {
                created.insert(t.name.clone());
                ordered.push(t);
            } else {
                rest.push(t);
            }
        }
        if rest.len() == before {
            let names: Vec<&str> = rest.iter().map(|t| t.name.as_str()).collect();
            return Err(ConfigError::Validation(format!(
                "foreign keys form a cycle or name unknown tables: {}",
                names.join(", ")
            )));
        }
        pending = rest;
    }
    Ok(ordered)
}

fn column_sql(table: &str, c: &ColumnDef) -> String {
    let mut def = format!("{} {}", quoted(&c.name), c.column_type.sql());
    if c.is_primary_key() {
        def.push_str(" PRIMARY KEY");
        return def;
    }
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(d) = &c.default {
        def.push_str(" DEFAULT ");
        def.push_str(&d.sql());
    }
    if let Some(fk) = &c.references {
        let on_delete = if c.nullable { "SET NULL" } else { "CASCADE" };
        def.push_str(&format!(
            " CONSTRAINT {} REFERENCES {} ({}) ON DELETE {}",
            quoted(&format!("{}_{}_foreign", table, c.name)),
            quoted(&fk.table),
            quoted(&fk.column),
            on_delete
        ));
    }
    def
}

/// `CREATE TABLE IF NOT EXISTS` followed by its index statements.
pub fn table_statements(t: &TableDef) -> Vec<String> {
    let cols: Vec<String> = t.columns.iter().map(|c| column_sql(&t.name, c)).collect();
    let mut out = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(&t.name),
        cols.join(",\n  ")
    )];
    for c in &t.columns {
        if c.unique {
            out.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&format!("{}_{}_unique", t.name, c.name)),
                quoted(&t.name),
                quoted(&c.name)
            ));
        } else if c.references.is_some() {
            out.push(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&format!("{}_{}_index", t.name, c.name)),
                quoted(&t.name),
                quoted(&c.name)
            ));
        }
    }
    if let Some((type_field, id_field)) = &t.morph_index {
        out.push(format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({}, {})",
            quoted(&format!("{}_{}_{}_index", t.name, type_field, id_field)),
            quoted(&t.name),
            quoted(type_field),
            quoted(id_field)
        ));
    }
    out
}

/// Create every table and index. Safe to run on every start.
pub async fn apply_migrations(pool: &PgPool, registry: &ResourceRegistry) -> Result<(), AppError> {
    let tables = ordered_tables(registry)?;
    let mut tx = pool.begin().await?;
    for t in &tables {
        for sql in table_statements(t) {
            tracing::debug!(sql = %sql, "migration");
            sqlx::query(&sql).execute(&mut *tx).await?;
        }
    }
    tx.commit().await?;
    tracing::info!(tables = tables.len(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;

    #[test]
    fn referenced_tables_come_first() {
        let registry = resources::registry().unwrap();
        let names: Vec<String> = ordered_tables(&registry).unwrap().into_iter().map(|t| t.name).collect();
        let pos = |n: &str| names.iter().position(|x| x == n).unwrap();
        assert_eq!(&names[..3], ["users", "trips", "personal_access_tokens"]);
        assert!(pos("map_checkpoints") < pos("checkpoint_images"));
        assert_eq!(names.len(), 15);
    }

    #[test]
    fn foreign_keys_cascade_or_null_out() {
        let registry = resources::registry().unwrap();
        let images = TableDef::from_resource(registry.get("checkpoint-images").unwrap());
        let create = &table_statements(&images)[0];
        assert!(create.contains(
            "\"map_checkpoint_id\" BIGINT NOT NULL CONSTRAINT \"checkpoint_images_map_checkpoint_id_foreign\" \
             REFERENCES \"map_checkpoints\" (\"id\") ON DELETE CASCADE"
        ));
        assert!(create.contains("REFERENCES \"users\" (\"id\") ON DELETE SET NULL"));
        assert!(create.contains("\"moderation_status\" TEXT NOT NULL DEFAULT 'pending'"));
        assert!(create.contains("\"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()"));
    }

    #[test]
    fn unique_and_morph_indexes() {
        let registry = resources::registry().unwrap();
        let shares = table_statements(&TableDef::from_resource(registry.get("shares").unwrap()));
        assert!(shares.contains(
            &"CREATE UNIQUE INDEX IF NOT EXISTS \"shares_token_unique\" ON \"shares\" (\"token\")".to_string()
        ));
        let favorites = table_statements(&TableDef::from_resource(registry.get("favorites").unwrap()));
        assert!(favorites.iter().any(|s| s.contains("(\"favoritable_type\", \"favoritable_id\")")));
    }
}
