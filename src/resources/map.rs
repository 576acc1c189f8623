//! Map resources: checkpoints, their photos, and geocoded places.

use crate::config::{ColumnDef, ColumnType, FormField, InfolistEntry, ResourceConfig, TableColumn, TableSchema};

const GROUP: &str = "Maps";

pub const MODERATION_STATUSES: &[&str] = &["pending", "approved", "rejected"];

pub fn map_checkpoint() -> ResourceConfig {
    ResourceConfig::new("MapCheckpoint")
        .icon("heroicon-o-map-pin")
        .navigation_group(GROUP)
        .record_title("title")
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::foreign("user_id", "users").nullable(),
            ColumnDef::text("title"),
            ColumnDef::text("description").nullable(),
            ColumnDef::new("lat", ColumnType::Double),
            ColumnDef::new("lng", ColumnType::Double),
            ColumnDef::new("checked_in_at", ColumnType::Timestamptz).nullable(),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name"),
            FormField::text("title").required(),
            FormField::textarea("description"),
            FormField::numeric("lat").label("Latitude").required(),
            FormField::numeric("lng").label("Longitude").required(),
            FormField::date_time("checked_in_at"),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::numeric("user_id").label("User").placeholder("Unassigned"),
            InfolistEntry::text("title"),
            InfolistEntry::text("description").placeholder("No description"),
            InfolistEntry::numeric("lat").label("Latitude"),
            InfolistEntry::numeric("lng").label("Longitude"),
            InfolistEntry::date_time("checked_in_at").placeholder("Not checked in"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("trip_id").label("Trip").sortable(),
            TableColumn::text("title").searchable(),
            TableColumn::numeric("lat").label("Latitude"),
            TableColumn::numeric("lng").label("Longitude"),
            TableColumn::date_time("checked_in_at").sortable(),
        ]))
}

pub fn checkpoint_image() -> ResourceConfig {
    ResourceConfig::new("CheckpointImage")
        .icon("heroicon-o-photo")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("map_checkpoint_id", "map_checkpoints"),
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("image_path"),
            ColumnDef::text("caption").nullable(),
            ColumnDef::text("moderation_status").default_value("pending"),
            ColumnDef::text("moderation_note").nullable(),
            ColumnDef::foreign("moderated_by", "users").nullable(),
            ColumnDef::new("moderated_at", ColumnType::Timestamptz).nullable(),
            ColumnDef::new("is_flagged", ColumnType::Boolean).default_value(false),
        ])
        .form(vec![
            FormField::belongs_to("map_checkpoint_id", "map_checkpoint", "map_checkpoints", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::text("image_path").required(),
            FormField::text("caption"),
            FormField::select("moderation_status", MODERATION_STATUSES)
                .required()
                .default_value("pending"),
            FormField::textarea("moderation_note"),
            FormField::belongs_to("moderated_by", "moderator", "users", "name"),
            FormField::date_time("moderated_at"),
            FormField::toggle("is_flagged").default_value(false),
        ])
        .infolist(vec![
            InfolistEntry::numeric("map_checkpoint_id").label("Checkpoint"),
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::text("image_path"),
            InfolistEntry::text("caption").placeholder("No caption"),
            InfolistEntry::badge("moderation_status"),
            InfolistEntry::text("moderation_note").placeholder("-"),
            InfolistEntry::numeric("moderated_by").label("Moderator").placeholder("Not moderated"),
            InfolistEntry::date_time("moderated_at").placeholder("Not moderated"),
            InfolistEntry::boolean("is_flagged"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("map_checkpoint_id").label("Checkpoint").sortable(),
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::text("caption").searchable(),
            TableColumn::badge("moderation_status").searchable(),
            TableColumn::boolean("is_flagged").sortable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
}

pub fn place() -> ResourceConfig {
    ResourceConfig::new("Place")
        .icon("heroicon-o-globe-alt")
        .navigation_group(GROUP)
        .record_title("name")
        .columns(vec![
            ColumnDef::text("place_id").unique(),
            ColumnDef::text("name"),
            ColumnDef::text("address").nullable(),
            ColumnDef::new("lat", ColumnType::Double).nullable(),
            ColumnDef::new("lng", ColumnType::Double).nullable(),
            ColumnDef::text("category").nullable(),
        ])
        .form(vec![
            FormField::text("place_id").label("External Place ID").required(),
            FormField::text("name").required(),
            FormField::text("address"),
            FormField::numeric("lat").label("Latitude"),
            FormField::numeric("lng").label("Longitude"),
            FormField::text("category").max_length(100),
        ])
        .infolist(vec![
            InfolistEntry::text("place_id").label("External Place ID"),
            InfolistEntry::text("name"),
            InfolistEntry::text("address").placeholder("No address"),
            InfolistEntry::numeric("lat").label("Latitude"),
            InfolistEntry::numeric("lng").label("Longitude"),
            InfolistEntry::badge("category").placeholder("Uncategorized"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::text("name").searchable().sortable(),
            TableColumn::text("address").searchable(),
            TableColumn::badge("category").searchable(),
            TableColumn::numeric("lat").label("Latitude"),
            TableColumn::numeric("lng").label("Longitude"),
        ]))
}
