//! Validated resource registry, indexed by slug for runtime lookup.

use crate::config::{validate, PageKey, ResourceConfig};
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResourceRegistry {
    resources: Vec<ResourceConfig>,
    by_slug: HashMap<String, usize>,
}

/// Sidebar entry for one resource.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NavigationItem {
    pub model: String,
    pub slug: String,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub url: String,
}

impl ResourceRegistry {
    /// Append timestamp columns, validate, and index.
    pub fn new(resources: Vec<ResourceConfig>) -> Result<Self, ConfigError> {
        let resources: Vec<ResourceConfig> = resources.into_iter().map(ResourceConfig::with_timestamps).collect();
        validate(&resources)?;
        let by_slug = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.slug.clone(), i))
            .collect();
        Ok(ResourceRegistry { resources, by_slug })
    }

    pub fn get(&self, slug: &str) -> Option<&ResourceConfig> {
        self.by_slug.get(slug).map(|i| &self.resources[*i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn navigation(&self) -> Vec<NavigationItem> {
        self.resources
            .iter()
            .map(|r| NavigationItem {
                model: r.model.clone(),
                slug: r.slug.clone(),
                label: crate::case::headline(&r.table),
                icon: r.icon.clone(),
                group: r.navigation_group.clone(),
                url: r.url(PageKey::Index, None).unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnDef;

    #[test]
    fn lookup_by_slug_and_navigation() {
        let registry = ResourceRegistry::new(vec![
            ResourceConfig::new("ChecklistItem").icon("heroicon-o-check-circle").navigation_group("Trips"),
            ResourceConfig::new("Place").columns(vec![ColumnDef::text("name")]),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("places").map(|r| r.model.as_str()), Some("Place"));
        assert!(registry.get("place").is_none());
        assert!(registry.get("places").and_then(|r| r.column("created_at")).is_some());

        let nav = registry.navigation();
        assert_eq!(nav[0].label, "Checklist Items");
        assert_eq!(nav[0].url, "/admin/checklist-items");
        assert_eq!(nav[0].group.as_deref(), Some("Trips"));
    }
}
