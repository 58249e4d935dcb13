//! OpenAPI 3.0 description of the public routes, served at `/openapi.json`.
//!
//! The document is assembled once on first use and shared for the lifetime of
//! the process.

use std::sync::OnceLock;

use common::protocol::{DEFAULT_NAME, SERVICE_TITLE};
use openapiv3::{
    Info, MediaType, ObjectType, OpenAPI, Operation, Parameter, ParameterData,
    ParameterSchemaOrContent, PathItem, QueryStyle, ReferenceOr, Response, Responses, Schema,
    SchemaData, SchemaKind, StatusCode, StringType, Type,
};

const OPENAPI_VERSION: &str = "3.0.3";

static DOCUMENT: OnceLock<OpenAPI> = OnceLock::new();

/// The service's OpenAPI document.
pub fn document() -> &'static OpenAPI {
    DOCUMENT.get_or_init(build)
}

fn build() -> OpenAPI {
    let mut api = OpenAPI {
        openapi: OPENAPI_VERSION.into(),
        info: Info {
            title: SERVICE_TITLE.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            ..Default::default()
        },
        ..Default::default()
    };

    let root = Operation {
        summary: Some("Health-check & welcome route.".into()),
        operation_id: Some("root".into()),
        responses: json_ok(object_schema(&["status", "msg"])),
        ..Default::default()
    };

    let hello = Operation {
        summary: Some("Simple echo endpoint to prove backend connectivity.".into()),
        operation_id: Some("hello".into()),
        parameters: vec![ReferenceOr::Item(name_parameter())],
        responses: json_ok(object_schema(&["message"])),
        ..Default::default()
    };

    for (path, op) in [("/", root), ("/hello", hello)] {
        api.paths.paths.insert(
            path.into(),
            ReferenceOr::Item(PathItem {
                get: Some(op),
                ..Default::default()
            }),
        );
    }
    api
}

fn string_schema(default: Option<&str>) -> Schema {
    Schema {
        schema_data: SchemaData {
            default: default.map(|d| serde_json::Value::String(d.into())),
            ..Default::default()
        },
        schema_kind: SchemaKind::Type(Type::String(StringType::default())),
    }
}

/// An object whose listed properties are all required strings.
fn object_schema(fields: &[&str]) -> Schema {
    let mut object = ObjectType::default();
    for field in fields {
        object
            .properties
            .insert((*field).into(), ReferenceOr::Item(Box::new(string_schema(None))));
        object.required.push((*field).into());
    }
    Schema {
        schema_data: SchemaData::default(),
        schema_kind: SchemaKind::Type(Type::Object(object)),
    }
}

fn json_ok(schema: Schema) -> Responses {
    let mut response = Response {
        description: "Successful Response".into(),
        ..Default::default()
    };
    response.content.insert(
        "application/json".into(),
        MediaType {
            schema: Some(ReferenceOr::Item(schema)),
            ..Default::default()
        },
    );

    let mut responses = Responses::default();
    responses
        .responses
        .insert(StatusCode::Code(200), ReferenceOr::Item(response));
    responses
}

fn name_parameter() -> Parameter {
    Parameter::Query {
        parameter_data: ParameterData {
            name: "name".into(),
            description: Some("Your name".into()),
            required: false,
            deprecated: None,
            format: ParameterSchemaOrContent::Schema(ReferenceOr::Item(string_schema(Some(
                DEFAULT_NAME,
            )))),
            example: None,
            examples: Default::default(),
            explode: None,
            extensions: Default::default(),
        },
        allow_reserved: false,
        style: QueryStyle::Form,
        allow_empty_value: None,
    }
}
