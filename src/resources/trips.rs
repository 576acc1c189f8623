//! Trip planning resources: checklist, itinerary, diary, participants, shares.

use crate::config::{
    ColumnDef, ColumnType, FormField, InfolistEntry, ResourceConfig, SortDirection, TableColumn, TableSchema,
};

const GROUP: &str = "Trip Planning";

pub const PARTICIPANT_ROLES: &[&str] = &["viewer", "editor", "owner"];
pub const SHARE_PERMISSIONS: &[&str] = &["viewer", "editor"];
pub const MOODS: &[&str] = &["happy", "excited", "relaxed", "neutral", "tired", "sad"];

pub fn checklist_item() -> ResourceConfig {
    ResourceConfig::new("ChecklistItem")
        .icon("heroicon-o-check-circle")
        .navigation_group(GROUP)
        .record_title("title")
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::foreign("user_id", "users").nullable(),
            ColumnDef::text("title"),
            ColumnDef::new("is_completed", ColumnType::Boolean).default_value(false),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name"),
            FormField::text("title").required(),
            FormField::toggle("is_completed").default_value(false),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::numeric("user_id").label("User").placeholder("Unassigned"),
            InfolistEntry::text("title"),
            InfolistEntry::boolean("is_completed"),
            InfolistEntry::date_time("created_at"),
            InfolistEntry::date_time("updated_at"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("trip_id").label("Trip").sortable(),
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::text("title").searchable(),
            TableColumn::boolean("is_completed"),
            TableColumn::date_time("created_at").sortable(),
        ]))
}

pub fn itinerary_item() -> ResourceConfig {
    ResourceConfig::new("ItineraryItem")
        .icon("heroicon-o-calendar-days")
        .navigation_group(GROUP)
        .record_title("title")
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::text("title"),
            ColumnDef::text("description").nullable(),
            ColumnDef::text("location").nullable(),
            ColumnDef::new("day_number", ColumnType::Integer),
            ColumnDef::new("starts_at", ColumnType::Timestamptz).nullable(),
            ColumnDef::new("ends_at", ColumnType::Timestamptz).nullable(),
            ColumnDef::new("sort_order", ColumnType::Integer).default_value(0),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::text("title").required(),
            FormField::textarea("description"),
            FormField::text("location"),
            FormField::numeric("day_number").required(),
            FormField::date_time("starts_at"),
            FormField::date_time("ends_at"),
            FormField::numeric("sort_order").default_value(0),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::text("title"),
            InfolistEntry::text("description").placeholder("No description"),
            InfolistEntry::text("location").placeholder("No location"),
            InfolistEntry::numeric("day_number").label("Day"),
            InfolistEntry::date_time("starts_at"),
            InfolistEntry::date_time("ends_at"),
            InfolistEntry::numeric("sort_order"),
        ])
        .table(
            TableSchema::new(vec![
                TableColumn::numeric("trip_id").label("Trip").sortable(),
                TableColumn::text("title").searchable(),
                TableColumn::text("location").searchable(),
                TableColumn::numeric("day_number").label("Day").sortable(),
                TableColumn::date_time("starts_at").sortable(),
                TableColumn::numeric("sort_order").sortable(),
            ])
            .default_sort("day_number", SortDirection::Asc),
        )
}

pub fn trip_diary() -> ResourceConfig {
    ResourceConfig::new("TripDiary")
        .icon("heroicon-o-book-open")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::new("entry_date", ColumnType::Date),
            ColumnDef::text("content").nullable(),
            ColumnDef::text("mood").nullable(),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::date("entry_date").required(),
            FormField::textarea("content"),
            FormField::select("mood", MOODS),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::date("entry_date"),
            InfolistEntry::text("content").placeholder("No entry written"),
            InfolistEntry::badge("mood"),
        ])
        .table(
            TableSchema::new(vec![
                TableColumn::numeric("trip_id").label("Trip").sortable(),
                TableColumn::numeric("user_id").label("User").sortable(),
                TableColumn::date("entry_date").sortable(),
                TableColumn::text("content").searchable(),
                TableColumn::badge("mood").searchable(),
            ])
            .default_sort("entry_date", SortDirection::Desc),
        )
}

pub fn trip_participant() -> ResourceConfig {
    ResourceConfig::new("TripParticipant")
        .icon("heroicon-o-user-group")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("role").default_value("viewer"),
            ColumnDef::new("joined_at", ColumnType::Timestamptz).nullable(),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::select("role", PARTICIPANT_ROLES).required().default_value("viewer"),
            FormField::date_time("joined_at"),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::badge("role"),
            InfolistEntry::date_time("joined_at").placeholder("Not joined yet"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("trip_id").label("Trip").sortable(),
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::badge("role").searchable(),
            TableColumn::date_time("joined_at").sortable(),
        ]))
}

pub fn share() -> ResourceConfig {
    ResourceConfig::new("Share")
        .icon("heroicon-o-share")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("trip_id", "trips"),
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("permission").default_value("viewer"),
            ColumnDef::text("token").unique(),
        ])
        .form(vec![
            FormField::belongs_to("trip_id", "trip", "trips", "title").required(),
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::select("permission", SHARE_PERMISSIONS).required().default_value("viewer"),
            FormField::token("token"),
        ])
        .infolist(vec![
            InfolistEntry::numeric("trip_id").label("Trip"),
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::badge("permission"),
            InfolistEntry::text("token"),
            InfolistEntry::date_time("created_at"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("trip_id").label("Trip").sortable(),
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::badge("permission").searchable(),
            TableColumn::text("token").searchable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
}
