//! OpenAPI document generated from the registry: one tag per resource, bearer auth on admin paths.

use crate::config::{FormField, ResourceConfig, ResourceRegistry, Widget};
use utoipa::openapi::{
    content::ContentBuilder,
    path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder},
    request_body::RequestBodyBuilder,
    schema::{KnownFormat, ObjectBuilder, SchemaFormat, Type},
    security::{Http, HttpAuthScheme, SecurityRequirement, SecurityScheme},
    tag::TagBuilder,
    ComponentsBuilder, HttpMethod, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Required,
    ResponseBuilder,
};

pub const SECURITY_SCHEME: &str = "bearer_auth";

/// Browser page rendering the document with Swagger UI.
pub const DOCUMENTATION_HTML: &str = r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>trip-admin API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });</script>
</body>
</html>
"##;

fn record_parameter() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("record")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(ObjectBuilder::new().schema_type(Type::Integer).format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))))
        .build()
}

fn field_schema(field: &FormField) -> ObjectBuilder {
    let mut schema = match field.widget {
        Widget::NumericInput => ObjectBuilder::new().schema_type(Type::Number),
        Widget::Toggle => ObjectBuilder::new().schema_type(Type::Boolean),
        Widget::KeyValue => ObjectBuilder::new().schema_type(Type::Object),
        Widget::DatePicker => ObjectBuilder::new()
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Date))),
        Widget::DateTimePicker => ObjectBuilder::new()
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))),
        Widget::Select if field.relationship.is_some() => ObjectBuilder::new().schema_type(Type::Integer),
        Widget::Select | Widget::TextInput | Widget::Textarea => ObjectBuilder::new().schema_type(Type::String),
    };
    if !field.options.is_empty() {
        schema = schema.enum_values(Some(field.options.iter().map(|o| o.value.clone())));
    }
    if let Some(n) = field.max_length {
        schema = schema.max_length(Some(n as usize));
    }
    schema.title(Some(field.label.clone()))
}

fn form_body(resource: &ResourceConfig, enforce_required: bool) -> utoipa::openapi::request_body::RequestBody {
    let mut object = ObjectBuilder::new().schema_type(Type::Object);
    for field in &resource.form {
        object = object.property(&field.name, field_schema(field));
        if enforce_required && field.required {
            object = object.required(&field.name);
        }
    }
    RequestBodyBuilder::new()
        .content("application/json", ContentBuilder::new().schema(Some(object)).build())
        .required(Some(Required::True))
        .build()
}

fn operation(resource: &ResourceConfig, summary: String, status: &str) -> OperationBuilder {
    OperationBuilder::new()
        .operation_id(Some(format!("{}_{}", resource.table, summary.to_lowercase().replace(' ', "_"))))
        .summary(Some(summary))
        .tags(Some(vec![resource.model.clone()]))
        .security(SecurityRequirement::new(SECURITY_SCHEME, Vec::<String>::new()))
        .response(status, ResponseBuilder::new().description("Success").build())
        .response("401", ResponseBuilder::new().description("Missing or invalid bearer token").build())
        .response("403", ResponseBuilder::new().description("Not an admin").build())
}

fn resource_paths(mut paths: PathsBuilder, r: &ResourceConfig) -> PathsBuilder {
    let base = format!("/admin/{}", r.slug);
    let label = crate::case::headline(&r.model);

    let index = PathItemBuilder::new()
        .operation(HttpMethod::Get, operation(r, format!("List {}", label), "200").build())
        .operation(
            HttpMethod::Post,
            operation(r, format!("Create {}", label), "201")
                .request_body(Some(form_body(r, true)))
                .response("422", ResponseBuilder::new().description("Invalid form").build())
                .build(),
        )
        .build();
    paths = paths.path(base.clone(), index);

    let create = PathItemBuilder::new()
        .operation(HttpMethod::Get, operation(r, format!("Create form {}", label), "200").build())
        .build();
    paths = paths.path(format!("{}/create", base), create);

    let bulk = PathItemBuilder::new()
        .operation(HttpMethod::Post, operation(r, format!("Bulk delete {}", label), "200").build())
        .build();
    paths = paths.path(format!("{}/bulk-delete", base), bulk);

    let record = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            operation(r, format!("View {}", label), "200").parameter(record_parameter()).build(),
        )
        .operation(
            HttpMethod::Put,
            operation(r, format!("Replace {}", label), "200")
                .parameter(record_parameter())
                .request_body(Some(form_body(r, true)))
                .build(),
        )
        .operation(
            HttpMethod::Patch,
            operation(r, format!("Update {}", label), "200")
                .parameter(record_parameter())
                .request_body(Some(form_body(r, false)))
                .build(),
        )
        .operation(
            HttpMethod::Delete,
            operation(r, format!("Delete {}", label), "204").parameter(record_parameter()).build(),
        )
        .build();
    paths = paths.path(format!("{}/{{record}}", base), record);

    let edit = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            operation(r, format!("Edit form {}", label), "200").parameter(record_parameter()).build(),
        )
        .build();
    paths.path(format!("{}/{{record}}/edit", base), edit)
}

pub fn document(registry: &ResourceRegistry) -> OpenApi {
    let mut paths = PathsBuilder::new();

    let login = OperationBuilder::new()
        .operation_id(Some("auth_login"))
        .summary(Some("Issue a bearer token for an admin user"))
        .tags(Some(vec!["Auth".to_string()]))
        .request_body(Some(
            RequestBodyBuilder::new()
                .content(
                    "application/json",
                    ContentBuilder::new()
                        .schema(Some(
                            ObjectBuilder::new()
                                .schema_type(Type::Object)
                                .property("email", ObjectBuilder::new().schema_type(Type::String))
                                .property("password", ObjectBuilder::new().schema_type(Type::String))
                                .required("email")
                                .required("password"),
                        ))
                        .build(),
                )
                .required(Some(Required::True))
                .build(),
        ))
        .response("201", ResponseBuilder::new().description("Token issued").build())
        .response("401", ResponseBuilder::new().description("Invalid credentials").build())
        .build();
    paths = paths.path("/auth/login", PathItemBuilder::new().operation(HttpMethod::Post, login).build());

    let navigation = OperationBuilder::new()
        .operation_id(Some("admin_navigation"))
        .summary(Some("Navigation for every resource"))
        .tags(Some(vec!["Admin".to_string()]))
        .security(SecurityRequirement::new(SECURITY_SCHEME, Vec::<String>::new()))
        .response("200", ResponseBuilder::new().description("Success").build())
        .build();
    paths = paths.path("/admin", PathItemBuilder::new().operation(HttpMethod::Get, navigation).build());

    let mut tags = vec![
        TagBuilder::new().name("Auth").description(Some("Token login")).build(),
        TagBuilder::new().name("Admin").description(Some("Admin panel navigation")).build(),
    ];
    for r in registry.iter() {
        paths = resource_paths(paths, r);
        let mut tag = TagBuilder::new().name(r.model.clone());
        if let Some(group) = &r.navigation_group {
            tag = tag.description(Some(format!("{} ({})", crate::case::headline(&r.table), group)));
        }
        tags.push(tag.build());
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("trip-admin")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Admin panel for trips, maps and community content"))
                .build(),
        )
        .paths(paths)
        .components(Some(
            ComponentsBuilder::new()
                .security_scheme(SECURITY_SCHEME, SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)))
                .build(),
        ))
        .tags(Some(tags))
        .build()
}
