use crate::config::{ColumnDef, ColumnType, FormField, InfolistEntry, ResourceConfig, TableColumn, TableSchema};

/// Translation requests. `user_id` is a plain number: the record keeps no user relation.
pub fn translation() -> ResourceConfig {
    ResourceConfig::new("Translation")
        .icon("heroicon-o-language")
        .navigation_group("Tools")
        .columns(vec![
            ColumnDef::new("user_id", ColumnType::BigInt),
            ColumnDef::text("source_language"),
            ColumnDef::text("target_language"),
            ColumnDef::text("source_text"),
            ColumnDef::text("translated_text").nullable(),
            ColumnDef::text("file_path").nullable(),
        ])
        .form(vec![
            FormField::numeric("user_id").label("User ID").required(),
            FormField::text("source_language").required().max_length(10),
            FormField::text("target_language").required().max_length(10),
            FormField::textarea("source_text").required(),
            FormField::textarea("translated_text"),
            FormField::text("file_path"),
        ])
        .infolist(vec![
            InfolistEntry::numeric("user_id").label("User ID"),
            InfolistEntry::badge("source_language"),
            InfolistEntry::badge("target_language"),
            InfolistEntry::text("source_text"),
            InfolistEntry::text("translated_text").placeholder("Not translated yet"),
            InfolistEntry::text("file_path").placeholder("No file"),
        ])
        .table(TableSchema::new(vec![
            TableColumn::numeric("user_id").label("User ID").sortable(),
            TableColumn::badge("source_language").searchable(),
            TableColumn::badge("target_language").searchable(),
            TableColumn::text("source_text").searchable(),
            TableColumn::date_time("created_at").sortable(),
        ]))
}
