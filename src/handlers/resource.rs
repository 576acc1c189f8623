//! Resource page handlers: navigation, list, create, view, edit, and the mutations behind them.

use crate::case::headline;
use crate::config::{PageKey, ResourceConfig, SortDirection};
use crate::error::AppError;
use crate::extractors::AdminUser;
use crate::render::{render_form, render_infolist, render_row};
use crate::response::{success_one, success_one_ok, success_one_with_meta, Pagination};
use crate::service::{CrudService, FormValidator, Mode, RecordOption, BULK_LIMIT};
use crate::sql::ListParams;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    /// Resolve against the table schema: defaults applied, sort checked against the whitelist.
    pub fn resolve(&self, resource: &ResourceConfig) -> Result<(ListParams, u32), AppError> {
        let schema = &resource.table_schema;
        let (default_column, default_direction) = &schema.default_sort;
        let sort = self.sort.clone().unwrap_or_else(|| default_column.clone());
        if !schema.is_sortable(&sort) {
            return Err(AppError::BadRequest(format!("cannot sort {} by '{}'", resource.slug, sort)));
        }
        let direction = match self.direction.as_deref() {
            None => *default_direction,
            Some(d) => SortDirection::parse(d)
                .ok_or_else(|| AppError::BadRequest(format!("direction must be asc or desc, got '{}'", d)))?,
        };
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        let params = ListParams {
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            sort,
            direction,
            limit: per_page,
            offset: u64::from(page - 1) * u64::from(per_page),
        };
        Ok((params, page))
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<i64>,
}

fn resource<'a>(state: &'a AppState, slug: &str) -> Result<&'a ResourceConfig, AppError> {
    state
        .registry
        .get(slug)
        .ok_or_else(|| AppError::NotFound(format!("resource '{}'", slug)))
}

/// Record keys are positive integers; anything else cannot name a record.
fn parse_record(record: &str) -> Result<i64, AppError> {
    record
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(format!("record '{}'", record)))
}

fn summary(r: &ResourceConfig) -> Value {
    json!({
        "model": r.model,
        "slug": r.slug,
        "label": headline(&r.table),
        "icon": r.icon,
        "url": r.url(PageKey::Index, None),
    })
}

fn record_id(record: &Value) -> String {
    record.get("id").map(|v| v.to_string()).unwrap_or_default()
}

fn record_title(r: &ResourceConfig, record: &Value) -> String {
    r.record_title_attribute
        .as_ref()
        .and_then(|attr| record.get(attr))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} #{}", headline(&r.model), record_id(record)))
}

fn record_urls(r: &ResourceConfig, record: &Value) -> Value {
    let id = record_id(record);
    json!({
        "view": r.url(PageKey::View, Some(&id)),
        "edit": r.url(PageKey::Edit, Some(&id)),
    })
}

async fn load(state: &AppState, r: &ResourceConfig, record: &str) -> Result<(i64, Value), AppError> {
    let id = parse_record(record)?;
    let row = CrudService::read(&state.pool, r, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", r.model, id)))?;
    Ok((id, row))
}

async fn relationship_options(state: &AppState, r: &ResourceConfig) -> Result<HashMap<String, Vec<RecordOption>>, AppError> {
    let mut out = HashMap::new();
    for field in &r.form {
        if let Some(rel) = &field.relationship {
            let options = CrudService::options(&state.pool, &rel.table, &rel.title_column).await?;
            out.insert(field.name.clone(), options);
        }
    }
    Ok(out)
}

pub async fn navigation(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(json!({
        "user": user,
        "navigation": state.registry.navigation(),
    })))
}

pub async fn list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let (params, page) = query.resolve(r)?;
    let (rows, total) = CrudService::list(&state.pool, r, &params).await?;
    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "title": record_title(r, row),
                "cells": render_row(&r.table_schema.columns, row),
                "urls": record_urls(r, row),
                "record": row,
            })
        })
        .collect();
    let pagination = Pagination::new(total, page, params.limit);
    Ok(success_one_with_meta(
        json!({
            "resource": summary(r),
            "page": PageKey::Index,
            "table": r.table_schema,
            "search": params.search,
            "sort": { "column": params.sort, "direction": params.direction },
            "records": records,
            "create_url": r.url(PageKey::Create, None),
        }),
        json!({ "pagination": pagination }),
    ))
}

pub async fn create_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let options = relationship_options(&state, r).await?;
    Ok(success_one_ok(json!({
        "resource": summary(r),
        "page": PageKey::Create,
        "form": render_form(r, None, options),
        "submit": { "method": "POST", "url": r.url(PageKey::Index, None) },
    })))
}

pub async fn store(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let values = FormValidator::validate(r, &body, Mode::Create)?;
    FormValidator::check_references(&state.pool, r, &values).await?;
    let row = CrudService::create(&state.pool, r, &values).await?;
    tracing::info!(resource = %r.slug, id = %record_id(&row), "record created");
    Ok(success_one(row))
}

pub async fn view(
    State(state): State<AppState>,
    Path((slug, record)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let (_, row) = load(&state, r, &record).await?;
    Ok(success_one_ok(json!({
        "resource": summary(r),
        "page": PageKey::View,
        "title": record_title(r, &row),
        "entries": render_infolist(r, &row),
        "urls": record_urls(r, &row),
        "record": row,
    })))
}

pub async fn edit_page(
    State(state): State<AppState>,
    Path((slug, record)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let (_, row) = load(&state, r, &record).await?;
    let options = relationship_options(&state, r).await?;
    Ok(success_one_ok(json!({
        "resource": summary(r),
        "page": PageKey::Edit,
        "title": record_title(r, &row),
        "form": render_form(r, Some(&row), options),
        "submit": { "method": "PUT", "url": r.url(PageKey::View, Some(&record_id(&row))) },
    })))
}

async fn save(state: &AppState, r: &ResourceConfig, record: &str, body: &Value, mode: Mode) -> Result<Value, AppError> {
    let (id, existing) = load(state, r, record).await?;
    let values = FormValidator::validate(r, body, mode)?;
    let mut merged: Map<String, Value> = existing.as_object().cloned().unwrap_or_default();
    merged.extend(values.clone());
    FormValidator::check_references(&state.pool, r, &merged).await?;
    let row = CrudService::update(&state.pool, r, id, &values)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", r.model, id)))?;
    tracing::info!(resource = %r.slug, id, fields = values.len(), "record updated");
    Ok(row)
}

pub async fn replace(
    State(state): State<AppState>,
    Path((slug, record)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let row = save(&state, r, &record, &body, Mode::Replace).await?;
    Ok(success_one_ok(row))
}

pub async fn patch(
    State(state): State<AppState>,
    Path((slug, record)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let row = save(&state, r, &record, &body, Mode::Patch).await?;
    Ok(success_one_ok(row))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((slug, record)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    let id = parse_record(&record)?;
    if !CrudService::delete(&state.pool, r, id).await? {
        return Err(AppError::NotFound(format!("{} {}", r.model, id)));
    }
    tracing::info!(resource = %r.slug, id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<BulkDeleteBody>,
) -> Result<impl IntoResponse, AppError> {
    let r = resource(&state, &slug)?;
    if body.ids.is_empty() {
        return Err(AppError::field("ids", "Select at least one record."));
    }
    if body.ids.len() > BULK_LIMIT {
        return Err(AppError::BadRequest(format!("bulk delete limited to {} records", BULK_LIMIT)));
    }
    let deleted = CrudService::delete_many(&state.pool, r, &body.ids).await?;
    tracing::info!(resource = %r.slug, requested = body.ids.len(), deleted, "bulk delete");
    Ok(success_one_ok(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;

    #[test]
    fn list_query_defaults() {
        let r = resources::trips::itinerary_item().with_timestamps();
        let (params, page) = ListQuery::default().resolve(&r).unwrap();
        assert_eq!(page, 1);
        assert_eq!(params.limit, DEFAULT_PER_PAGE);
        assert_eq!(params.offset, 0);
        assert_eq!(params.sort, "day_number");
        assert_eq!(params.direction, SortDirection::Asc);
    }

    #[test]
    fn list_query_clamps_and_pages() {
        let r = resources::map::place().with_timestamps();
        let q = ListQuery {
            page: Some(3),
            per_page: Some(500),
            sort: Some("name".into()),
            direction: Some("ASC".into()),
            search: Some("  ".into()),
        };
        let (params, page) = q.resolve(&r).unwrap();
        assert_eq!(page, 3);
        assert_eq!(params.limit, MAX_PER_PAGE);
        assert_eq!(params.offset, 200);
        assert_eq!(params.search, None);
    }

    #[test]
    fn list_query_rejects_unsortable_columns() {
        let r = resources::map::place().with_timestamps();
        let q = ListQuery {
            sort: Some("address".into()),
            ..ListQuery::default()
        };
        assert!(matches!(q.resolve(&r), Err(AppError::BadRequest(_))));
        let q = ListQuery {
            direction: Some("sideways".into()),
            ..ListQuery::default()
        };
        assert!(matches!(q.resolve(&r), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn record_keys_must_be_positive_integers() {
        assert_eq!(parse_record("42").unwrap(), 42);
        assert!(matches!(parse_record("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_record("0"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn titles_fall_back_to_model_and_id() {
        let place = resources::map::place().with_timestamps();
        assert_eq!(record_title(&place, &json!({"id": 3, "name": "Louvre"})), "Louvre");
        let fav = resources::community::favorite().with_timestamps();
        assert_eq!(record_title(&fav, &json!({"id": 3})), "Favorite #3");
    }
}
