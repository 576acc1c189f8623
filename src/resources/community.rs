//! User-generated content: comments, favorites, notifications.

use super::map::MODERATION_STATUSES;
use crate::config::{ColumnDef, ColumnType, FormField, InfolistEntry, ResourceConfig, TableColumn, TableSchema};
use crate::morph::{MorphKind, COMMENTABLE, FAVORITABLE};

const GROUP: &str = "Community";

fn kind_aliases(kinds: &[MorphKind]) -> Vec<&'static str> {
    kinds.iter().map(|k| k.alias()).collect()
}

pub fn comment() -> ResourceConfig {
    ResourceConfig::new("Comment")
        .icon("heroicon-o-chat-bubble-left-right")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("entity_type"),
            ColumnDef::new("entity_id", ColumnType::BigInt),
            ColumnDef::text("content"),
            ColumnDef::text("moderation_status").default_value("pending"),
            ColumnDef::text("moderation_note").nullable(),
            ColumnDef::foreign("moderated_by", "users").nullable(),
            ColumnDef::new("moderated_at", ColumnType::Timestamptz).nullable(),
            ColumnDef::new("is_flagged", ColumnType::Boolean).default_value(false),
        ])
        .form(vec![
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::select("entity_type", &kind_aliases(COMMENTABLE)).label("Commented On").required(),
            FormField::numeric("entity_id").label("Commented Record").required(),
            FormField::textarea("content").required(),
            FormField::select("moderation_status", MODERATION_STATUSES)
                .required()
                .default_value("pending"),
            FormField::textarea("moderation_note"),
            FormField::belongs_to("moderated_by", "moderator", "users", "name"),
            FormField::date_time("moderated_at"),
            FormField::toggle("is_flagged").default_value(false),
        ])
        .infolist(vec![
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::badge("entity_type").label("Commented On"),
            InfolistEntry::numeric("entity_id").label("Commented Record"),
            InfolistEntry::text("content"),
            InfolistEntry::badge("moderation_status"),
            InfolistEntry::text("moderation_note").placeholder("-"),
            InfolistEntry::numeric("moderated_by").label("Moderator").placeholder("Not moderated"),
            InfolistEntry::date_time("moderated_at").placeholder("Not moderated"),
            InfolistEntry::boolean("is_flagged"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::badge("entity_type").label("Commented On").searchable(),
            TableColumn::numeric("entity_id").label("Record").sortable(),
            TableColumn::text("content").searchable(),
            TableColumn::badge("moderation_status").searchable(),
            TableColumn::boolean("is_flagged").sortable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
        .morph("entity_type", "entity_id", COMMENTABLE)
}

pub fn favorite() -> ResourceConfig {
    ResourceConfig::new("Favorite")
        .icon("heroicon-o-heart")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("favoritable_type"),
            ColumnDef::new("favoritable_id", ColumnType::BigInt),
        ])
        .form(vec![
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::select("favoritable_type", &kind_aliases(FAVORITABLE)).label("Favorited").required(),
            FormField::numeric("favoritable_id").label("Favorited Record").required(),
        ])
        .infolist(vec![
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::badge("favoritable_type").label("Favorited"),
            InfolistEntry::numeric("favoritable_id").label("Favorited Record"),
            InfolistEntry::date_time("created_at"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::badge("favoritable_type").label("Favorited").searchable(),
            TableColumn::numeric("favoritable_id").label("Record").sortable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
        .morph("favoritable_type", "favoritable_id", FAVORITABLE)
}

pub fn notification() -> ResourceConfig {
    ResourceConfig::new("Notification")
        .icon("heroicon-o-bell")
        .navigation_group(GROUP)
        .columns(vec![
            ColumnDef::foreign("user_id", "users"),
            ColumnDef::text("type"),
            ColumnDef::text("content"),
            ColumnDef::new("data", ColumnType::Jsonb).nullable(),
            ColumnDef::new("read_at", ColumnType::Timestamptz).nullable(),
        ])
        .form(vec![
            FormField::belongs_to("user_id", "user", "users", "name").required(),
            FormField::text("type").required(),
            FormField::textarea("content").required(),
            FormField::key_value("data"),
            FormField::date_time("read_at"),
        ])
        .infolist(vec![
            InfolistEntry::numeric("user_id").label("User"),
            InfolistEntry::badge("type"),
            InfolistEntry::text("content"),
            InfolistEntry::json("data").placeholder("No data"),
            InfolistEntry::date_time("read_at").placeholder("Unread"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("user_id").label("User").sortable(),
            TableColumn::badge("type").searchable(),
            TableColumn::text("content").searchable(),
            TableColumn::date_time("read_at").sortable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
}
