//! Swagger 2.0 to OpenAPI 3.0 conversion.

// External imports (alphabetized)
use serde_json::{json, Map, Value as JsonValue};

use crate::endpoint::is_http_method;

/// Convert a Swagger 2.0 document to OpenAPI 3.0.
///
/// Per path and method: `in: body` parameters are removed from the parameter
/// list and become `requestBody.content["application/json"].schema`; all
/// other parameters pass through unchanged. Operations without a body
/// parameter keep their original parameter list verbatim. Top-level
/// `definitions`/`parameters`/`responses` sections map to the corresponding
/// `components` sections.
pub fn convert(swagger: &JsonValue) -> JsonValue {
    let mut openapi = json!({
        "openapi": "3.0.0",
        "info": swagger
            .get("info")
            .cloned()
            .unwrap_or_else(|| json!({"title": "API", "version": "1.0.0"})),
        "paths": {},
        "components": {
            "schemas": swagger.get("definitions").cloned().unwrap_or_else(|| json!({})),
            "parameters": swagger.get("parameters").cloned().unwrap_or_else(|| json!({})),
            "responses": swagger.get("responses").cloned().unwrap_or_else(|| json!({})),
        },
    });

    let Some(paths) = swagger.get("paths").and_then(JsonValue::as_object) else {
        return openapi;
    };

    for (path, path_item) in paths {
        let Some(path_item) = path_item.as_object() else {
            continue;
        };

        let mut converted_item = Map::new();
        for (method, operation) in path_item {
            if !is_http_method(method) {
                continue;
            }
            converted_item.insert(method.clone(), convert_operation(operation));
        }
        openapi["paths"][path] = JsonValue::Object(converted_item);
    }

    openapi
}

fn convert_operation(operation: &JsonValue) -> JsonValue {
    let mut converted = operation.clone();

    let Some(params) = operation.get("parameters").and_then(JsonValue::as_array) else {
        return converted;
    };

    let Some(body_param) = params
        .iter()
        .find(|p| p.get("in").and_then(JsonValue::as_str) == Some("body"))
    else {
        // No body parameter: the operation passes through verbatim
        return converted;
    };

    converted["requestBody"] = json!({
        "content": {
            "application/json": {
                "schema": body_param.get("schema").cloned().unwrap_or_else(|| json!({})),
            },
        },
        "required": body_param
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
    });

    let retained: Vec<JsonValue> = params
        .iter()
        .filter(|p| p.get("in").and_then(JsonValue::as_str) != Some("body"))
        .cloned()
        .collect();

    if retained.is_empty() {
        converted
            .as_object_mut()
            .map(|op| op.remove("parameters"));
    } else {
        converted["parameters"] = JsonValue::Array(retained);
    }

    converted
}
