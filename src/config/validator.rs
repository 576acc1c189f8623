//! Descriptor validation: every field names a declared column, references resolve, slugs are unique.

use crate::config::{PageKey, ResourceConfig, Widget, BASE_TABLES};
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(resources: &[ResourceConfig]) -> Result<(), ConfigError> {
    let mut slugs = HashSet::new();
    let mut tables: HashSet<&str> = BASE_TABLES.iter().copied().collect();
    for r in resources {
        if !slugs.insert(r.slug.as_str()) {
            return Err(ConfigError::DuplicateSlug(r.slug.clone()));
        }
        if !tables.insert(r.table.as_str()) {
            return Err(ConfigError::DuplicateTable(r.table.clone()));
        }
    }

    for r in resources {
        validate_resource(r, &tables)?;
    }
    Ok(())
}

fn missing(r: &ResourceConfig, kind: &'static str, id: &str) -> ConfigError {
    ConfigError::MissingReference {
        resource: r.model.clone(),
        kind,
        id: id.to_string(),
    }
}

fn validate_resource(r: &ResourceConfig, tables: &HashSet<&str>) -> Result<(), ConfigError> {
    let columns: HashSet<&str> = r.columns.iter().map(|c| c.name.as_str()).collect();

    for c in &r.columns {
        if let Some(fk) = &c.references {
            if !tables.contains(fk.table.as_str()) {
                return Err(missing(r, "table", &fk.table));
            }
        }
    }

    for f in &r.form {
        if !columns.contains(f.name.as_str()) {
            return Err(missing(r, "form column", &f.name));
        }
        if let Some(rel) = &f.relationship {
            if !tables.contains(rel.table.as_str()) {
                return Err(missing(r, "relationship table", &rel.table));
            }
        }
        if f.widget == Widget::Select && !f.options.is_empty() {
            if let Some(default) = f.default.as_ref().and_then(|d| d.as_str()) {
                if !f.options.iter().any(|o| o.value == default) {
                    return Err(ConfigError::Validation(format!(
                        "{}: default '{}' of {} is not one of its options",
                        r.model, default, f.name
                    )));
                }
            }
        }
    }

    for e in &r.infolist {
        if !columns.contains(e.name.as_str()) {
            return Err(missing(r, "infolist column", &e.name));
        }
    }

    for c in &r.table_schema.columns {
        if !columns.contains(c.name.as_str()) {
            return Err(missing(r, "table column", &c.name));
        }
    }
    let (sort_column, _) = &r.table_schema.default_sort;
    if !columns.contains(sort_column.as_str()) {
        return Err(missing(r, "sort column", sort_column));
    }

    if let Some(attr) = &r.record_title_attribute {
        if !columns.contains(attr.as_str()) {
            return Err(missing(r, "title attribute", attr));
        }
    }

    if let Some(m) = &r.morph {
        for field in [&m.type_field, &m.id_field] {
            if !columns.contains(field.as_str()) {
                return Err(missing(r, "morph column", field));
            }
        }
        if m.kinds.is_empty() {
            return Err(ConfigError::Validation(format!("{}: morph pair allows no kinds", r.model)));
        }
    }

    validate_pages(r)
}

/// Exactly one route per page key, each bound to this resource.
fn validate_pages(r: &ResourceConfig) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPageMap {
        resource: r.model.clone(),
        reason,
    };
    if r.pages.len() != PageKey::ALL.len() {
        return Err(invalid(format!("expected {} pages, found {}", PageKey::ALL.len(), r.pages.len())));
    }
    for key in PageKey::ALL {
        let route = r.pages.get(key).ok_or_else(|| invalid(format!("missing {:?} page", key)))?;
        if route.resource != r.slug {
            return Err(invalid(format!("{:?} page is bound to '{}'", key, route.resource)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDef, FormField, InfolistEntry, PageMap, PageRoute};

    fn place() -> ResourceConfig {
        ResourceConfig::new("Place")
            .columns(vec![ColumnDef::text("name")])
            .form(vec![FormField::text("name").required()])
            .infolist(vec![InfolistEntry::text("name")])
            .with_timestamps()
    }

    #[test]
    fn accepts_consistent_resource() {
        assert!(validate(&[place()]).is_ok());
    }

    #[test]
    fn rejects_duplicate_slug() {
        let err = validate(&[place(), place()]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSlug(s) if s == "places"));
    }

    #[test]
    fn rejects_form_field_without_column() {
        let r = place().form(vec![FormField::text("address")]);
        let err = validate(&[r]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingReference { kind: "form column", .. }));
    }

    #[test]
    fn rejects_unknown_foreign_table() {
        let r = place().columns(vec![ColumnDef::foreign("city_id", "cities")]);
        assert!(matches!(
            validate(&[r]).unwrap_err(),
            ConfigError::MissingReference { kind: "table", .. }
        ));
    }

    #[test]
    fn rejects_select_default_outside_options() {
        let r = place()
            .columns(vec![ColumnDef::text("category")])
            .form(vec![FormField::select("category", &["food", "museum"]).default_value("park")]);
        assert!(matches!(validate(&[r]).unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_incomplete_or_foreign_page_map() {
        let mut r = place();
        let mut routes: Vec<PageRoute> = PageMap::standard("places").iter().cloned().collect();
        routes.pop();
        r.pages = PageMap::from_routes(routes);
        assert!(matches!(validate(&[r]).unwrap_err(), ConfigError::InvalidPageMap { .. }));

        let mut r = place();
        r.pages = PageMap::standard("shares");
        assert!(matches!(validate(&[r]).unwrap_err(), ConfigError::InvalidPageMap { .. }));
    }
}
