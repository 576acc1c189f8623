//! The administered resources. Each function returns one descriptor; `registry()` validates them together.

pub mod community;
pub mod map;
pub mod translations;
pub mod trips;

use crate::config::{ResourceConfig, ResourceRegistry};
use crate::error::ConfigError;

/// Every resource, in navigation order.
pub fn all() -> Vec<ResourceConfig> {
    vec![
        trips::checklist_item(),
        map::checkpoint_image(),
        community::comment(),
        community::favorite(),
        trips::itinerary_item(),
        map::map_checkpoint(),
        community::notification(),
        map::place(),
        trips::share(),
        translations::translation(),
        trips::trip_diary(),
        trips::trip_participant(),
    ]
}

pub fn registry() -> Result<ResourceRegistry, ConfigError> {
    ResourceRegistry::new(all())
}
