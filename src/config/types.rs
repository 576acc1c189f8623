//! Resource descriptor types: columns, form fields, infolist entries, table columns and the page map.

use crate::case::{headline, slug_for_model, table_for_model};
use crate::morph::MorphKind;
use serde::Serialize;
use serde_json::Value;

/// Path prefix under which all resource pages are mounted.
pub const ADMIN_PATH: &str = "/admin";

/// Tables referenced by resources but not administered through them.
pub const BASE_TABLES: &[&str] = &["users", "trips"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    BigSerial,
    BigInt,
    Integer,
    Double,
    Text,
    Boolean,
    Date,
    Timestamptz,
    Jsonb,
}

impl ColumnType {
    /// DDL spelling.
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::BigSerial => "BIGSERIAL",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamptz => "TIMESTAMPTZ",
            ColumnType::Jsonb => "JSONB",
        }
    }

    /// Type used for `$n::type` casts on bound parameters.
    pub fn cast(self) -> &'static str {
        match self {
            ColumnType::BigSerial | ColumnType::BigInt => "bigint",
            ColumnType::Integer => "integer",
            ColumnType::Double => "double precision",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Timestamptz => "timestamptz",
            ColumnType::Jsonb => "jsonb",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, ColumnType::BigSerial | ColumnType::BigInt | ColumnType::Integer)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Column default: a literal value or a raw SQL expression such as `NOW()`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Literal(Value),
    Expression(String),
}

impl ColumnDefault {
    pub fn sql(&self) -> String {
        match self {
            ColumnDefault::Expression(expr) => expr.clone(),
            ColumnDefault::Literal(Value::Bool(b)) => if *b { "TRUE".into() } else { "FALSE".into() },
            ColumnDefault::Literal(Value::Number(n)) => n.to_string(),
            ColumnDefault::Literal(Value::String(s)) => format!("'{}'", s.replace('\'', "''")),
            ColumnDefault::Literal(Value::Null) => "NULL".into(),
            ColumnDefault::Literal(other) => format!("'{}'", other.to_string().replace('\'', "''")),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        ColumnDef {
            name: name.to_string(),
            column_type,
            nullable: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    pub fn id() -> Self {
        ColumnDef::new("id", ColumnType::BigSerial)
    }

    pub fn text(name: &str) -> Self {
        ColumnDef::new(name, ColumnType::Text)
    }

    /// BIGINT column referencing `table.id`.
    pub fn foreign(name: &str, table: &str) -> Self {
        let mut c = ColumnDef::new(name, ColumnType::BigInt);
        c.references = Some(ForeignKey {
            table: table.to_string(),
            column: "id".into(),
        });
        c
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Literal(value.into()));
        self
    }

    pub fn default_expression(mut self, expression: &str) -> Self {
        self.default = Some(ColumnDefault::Expression(expression.to_string()));
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.column_type == ColumnType::BigSerial
    }

    /// Whether an INSERT may omit this column.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.is_primary_key() || self.nullable
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    Textarea,
    NumericInput,
    Select,
    Toggle,
    DatePicker,
    DateTimePicker,
    KeyValue,
}

/// Select backed by another table: stored value is that table's id, shown as `title_column`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Relationship {
    pub name: String,
    pub table: String,
    pub title_column: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Filled with a fresh random token on create when left empty.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub generated: bool,
}

impl FormField {
    fn with_widget(name: &str, widget: Widget) -> Self {
        FormField {
            name: name.to_string(),
            label: headline(name),
            widget,
            required: false,
            relationship: None,
            options: Vec::new(),
            default: None,
            max_length: None,
            generated: false,
        }
    }

    pub fn text(name: &str) -> Self {
        FormField::with_widget(name, Widget::TextInput).max_length(255)
    }

    /// Text input that is generated server-side when omitted.
    pub fn token(name: &str) -> Self {
        let mut f = FormField::text(name).max_length(64);
        f.generated = true;
        f
    }

    pub fn textarea(name: &str) -> Self {
        FormField::with_widget(name, Widget::Textarea)
    }

    pub fn numeric(name: &str) -> Self {
        FormField::with_widget(name, Widget::NumericInput)
    }

    pub fn toggle(name: &str) -> Self {
        FormField::with_widget(name, Widget::Toggle)
    }

    pub fn date(name: &str) -> Self {
        FormField::with_widget(name, Widget::DatePicker)
    }

    pub fn date_time(name: &str) -> Self {
        FormField::with_widget(name, Widget::DateTimePicker)
    }

    pub fn key_value(name: &str) -> Self {
        FormField::with_widget(name, Widget::KeyValue)
    }

    /// Select with a fixed option list; labels are the headline of each value.
    pub fn select(name: &str, values: &[&str]) -> Self {
        let mut f = FormField::with_widget(name, Widget::Select);
        f.options = values
            .iter()
            .map(|v| SelectOption {
                value: v.to_string(),
                label: headline(v),
            })
            .collect();
        f
    }

    /// Select over `table`, labelled after the relation rather than the key column.
    pub fn belongs_to(name: &str, relation: &str, table: &str, title_column: &str) -> Self {
        let mut f = FormField::with_widget(name, Widget::Select);
        f.label = headline(relation);
        f.relationship = Some(Relationship {
            name: relation.to_string(),
            table: table.to_string(),
            title_column: title_column.to_string(),
        });
        f
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn max_length(mut self, n: u32) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFormat {
    Text,
    Date,
    DateTime,
    Boolean,
    Numeric,
    Json,
    Badge,
}

/// Read-only entry on the view page.
#[derive(Clone, Debug, Serialize)]
pub struct InfolistEntry {
    pub name: String,
    pub label: String,
    pub format: EntryFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl InfolistEntry {
    fn with_format(name: &str, format: EntryFormat) -> Self {
        InfolistEntry {
            name: name.to_string(),
            label: headline(name),
            format,
            placeholder: None,
        }
    }

    pub fn text(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Text)
    }

    pub fn date(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Date)
    }

    pub fn date_time(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::DateTime)
    }

    pub fn boolean(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Boolean)
    }

    pub fn numeric(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Numeric)
    }

    pub fn json(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Json)
    }

    pub fn badge(name: &str) -> Self {
        InfolistEntry::with_format(name, EntryFormat::Badge)
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub label: String,
    pub format: EntryFormat,
    pub searchable: bool,
    pub sortable: bool,
    pub numeric: bool,
}

impl TableColumn {
    fn with_format(name: &str, format: EntryFormat) -> Self {
        TableColumn {
            name: name.to_string(),
            label: headline(name),
            format,
            searchable: false,
            sortable: false,
            numeric: format == EntryFormat::Numeric,
        }
    }

    pub fn text(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::Text)
    }

    pub fn numeric(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::Numeric)
    }

    pub fn date(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::Date)
    }

    pub fn date_time(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::DateTime)
    }

    pub fn boolean(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::Boolean)
    }

    pub fn badge(name: &str) -> Self {
        TableColumn::with_format(name, EntryFormat::Badge)
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    View,
    Edit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TableSchema {
    pub columns: Vec<TableColumn>,
    pub row_actions: Vec<RowAction>,
    pub bulk_actions: Vec<BulkAction>,
    pub default_sort: (String, SortDirection),
}

impl TableSchema {
    /// View and edit row actions, delete bulk action, newest first.
    pub fn new(columns: Vec<TableColumn>) -> Self {
        TableSchema {
            columns,
            row_actions: vec![RowAction::View, RowAction::Edit],
            bulk_actions: vec![BulkAction::Delete],
            default_sort: ("id".into(), SortDirection::Desc),
        }
    }

    pub fn default_sort(mut self, column: &str, direction: SortDirection) -> Self {
        self.default_sort = (column.to_string(), direction);
        self
    }

    pub fn searchable_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter(|c| c.searchable).map(|c| c.name.as_str())
    }

    /// `id` and the default sort column are always sortable.
    pub fn is_sortable(&self, name: &str) -> bool {
        name == "id"
            || name == self.default_sort.0
            || self.columns.iter().any(|c| c.sortable && c.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    Index,
    Create,
    View,
    Edit,
}

impl PageKey {
    pub const ALL: [PageKey; 4] = [PageKey::Index, PageKey::Create, PageKey::View, PageKey::Edit];

    /// Route template relative to the resource root.
    pub fn path(self) -> &'static str {
        match self {
            PageKey::Index => "/",
            PageKey::Create => "/create",
            PageKey::View => "/{record}",
            PageKey::Edit => "/{record}/edit",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageRoute {
    pub key: PageKey,
    pub path: String,
    pub resource: String,
}

impl PageRoute {
    /// Absolute URL of the page, with `{record}` substituted when given.
    pub fn url(&self, record: Option<&str>) -> String {
        let base = format!("{}/{}", ADMIN_PATH, self.resource);
        if self.path == "/" {
            return base;
        }
        let path = match record {
            Some(r) => self.path.replace("{record}", r),
            None => self.path.clone(),
        };
        format!("{}{}", base, path)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct PageMap {
    routes: Vec<PageRoute>,
}

impl PageMap {
    /// List, create, view and edit pages bound to `slug`.
    pub fn standard(slug: &str) -> Self {
        PageMap {
            routes: PageKey::ALL
                .iter()
                .map(|key| PageRoute {
                    key: *key,
                    path: key.path().to_string(),
                    resource: slug.to_string(),
                })
                .collect(),
        }
    }

    pub fn from_routes(routes: Vec<PageRoute>) -> Self {
        PageMap { routes }
    }

    pub fn get(&self, key: PageKey) -> Option<&PageRoute> {
        self.routes.iter().find(|r| r.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn url(&self, key: PageKey, record: Option<&str>) -> Option<String> {
        self.get(key).map(|r| r.url(record))
    }
}

/// Polymorphic pair: `type_field` holds the morph alias, `id_field` the target id.
#[derive(Clone, Debug, Serialize)]
pub struct MorphSpec {
    pub type_field: String,
    pub id_field: String,
    pub kinds: Vec<MorphKind>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceConfig {
    pub model: String,
    pub slug: String,
    pub table: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_title_attribute: Option<String>,
    pub columns: Vec<ColumnDef>,
    pub form: Vec<FormField>,
    pub infolist: Vec<InfolistEntry>,
    pub table_schema: TableSchema,
    pub pages: PageMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph: Option<MorphSpec>,
}

impl ResourceConfig {
    pub fn new(model: &str) -> Self {
        let slug = slug_for_model(model);
        ResourceConfig {
            model: model.to_string(),
            table: table_for_model(model),
            pages: PageMap::standard(&slug),
            slug,
            icon: "heroicon-o-rectangle-stack".into(),
            navigation_group: None,
            record_title_attribute: None,
            columns: vec![ColumnDef::id()],
            form: Vec::new(),
            infolist: Vec::new(),
            table_schema: TableSchema::new(vec![TableColumn::numeric("id").sortable()]),
            morph: None,
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn navigation_group(mut self, group: &str) -> Self {
        self.navigation_group = Some(group.to_string());
        self
    }

    pub fn record_title(mut self, attribute: &str) -> Self {
        self.record_title_attribute = Some(attribute.to_string());
        self
    }

    pub fn columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn form(mut self, fields: Vec<FormField>) -> Self {
        self.form = fields;
        self
    }

    pub fn infolist(mut self, entries: Vec<InfolistEntry>) -> Self {
        self.infolist = entries;
        self
    }

    pub fn table(mut self, table: TableSchema) -> Self {
        self.table_schema = table;
        self
    }

    pub fn morph(mut self, type_field: &str, id_field: &str, kinds: &[MorphKind]) -> Self {
        self.morph = Some(MorphSpec {
            type_field: type_field.to_string(),
            id_field: id_field.to_string(),
            kinds: kinds.to_vec(),
        });
        self
    }

    /// Append `created_at` / `updated_at` unless declared.
    pub fn with_timestamps(mut self) -> Self {
        for name in ["created_at", "updated_at"] {
            if self.column(name).is_none() {
                self.columns.push(
                    ColumnDef::new(name, ColumnType::Timestamptz).default_expression("NOW()"),
                );
            }
        }
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn form_field(&self, name: &str) -> Option<&FormField> {
        self.form.iter().find(|f| f.name == name)
    }

    pub fn url(&self, key: PageKey, record: Option<&str>) -> Option<String> {
        self.pages.url(key, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_resource_derives_names_and_pages() {
        let r = ResourceConfig::new("TripDiary");
        assert_eq!(r.slug, "trip-diaries");
        assert_eq!(r.table, "trip_diaries");
        assert_eq!(r.pages.len(), 4);
        assert_eq!(r.url(PageKey::Index, None).as_deref(), Some("/admin/trip-diaries"));
        assert_eq!(r.url(PageKey::Create, None).as_deref(), Some("/admin/trip-diaries/create"));
        assert_eq!(r.url(PageKey::View, Some("7")).as_deref(), Some("/admin/trip-diaries/7"));
        assert_eq!(r.url(PageKey::Edit, Some("7")).as_deref(), Some("/admin/trip-diaries/7/edit"));
    }

    #[test]
    fn timestamps_are_added_once() {
        let r = ResourceConfig::new("Place").with_timestamps().with_timestamps();
        assert_eq!(r.columns.iter().filter(|c| c.name == "created_at").count(), 1);
        assert!(r.column("updated_at").is_some());
    }

    #[test]
    fn column_defaults_render_as_sql() {
        assert_eq!(ColumnDefault::Literal(Value::Bool(false)).sql(), "FALSE");
        assert_eq!(ColumnDefault::Literal(Value::from("viewer")).sql(), "'viewer'");
        assert_eq!(ColumnDefault::Literal(Value::from("o'clock")).sql(), "'o''clock'");
        assert_eq!(ColumnDefault::Literal(Value::from(0)).sql(), "0");
        assert_eq!(ColumnDefault::Expression("NOW()".into()).sql(), "NOW()");
    }

    #[test]
    fn belongs_to_is_labelled_after_relation() {
        let f = FormField::belongs_to("trip_id", "trip", "trips", "title").required();
        assert_eq!(f.label, "Trip");
        assert_eq!(f.widget, Widget::Select);
        assert!(f.required);
        assert_eq!(f.relationship.as_ref().map(|r| r.table.as_str()), Some("trips"));
    }

    #[test]
    fn select_options_are_headlined() {
        let f = FormField::select("role", &["viewer", "editor"]);
        assert_eq!(f.options[1], SelectOption { value: "editor".into(), label: "Editor".into() });
    }

    #[test]
    fn sortable_columns() {
        let t = TableSchema::new(vec![TableColumn::text("title").searchable(), TableColumn::date("entry_date").sortable()])
            .default_sort("entry_date", SortDirection::Desc);
        assert!(t.is_sortable("id"));
        assert!(t.is_sortable("entry_date"));
        assert!(!t.is_sortable("title"));
        assert_eq!(t.searchable_columns().collect::<Vec<_>>(), vec!["title"]);
    }
}
