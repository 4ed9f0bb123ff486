//! Endpoint-list intermediate to OpenAPI 3.0 conversion.

// External imports (alphabetized)
use log::warn;
use serde_json::{json, Map, Value as JsonValue};

use crate::endpoint::Endpoint;

/// Convert the `{title, version, description, endpoints}` intermediate format
/// to OpenAPI 3.0.
///
/// Each endpoint becomes one `paths[path][method]` operation. Parameters get
/// their defaults applied (`in` → `query`, schema → `{"type": "string"}`),
/// and endpoints with no declared responses receive a single synthetic `200`.
/// Endpoints lacking a path are dropped with a log line, not an error.
pub fn convert(data: &JsonValue) -> JsonValue {
    let mut openapi = json!({
        "openapi": "3.0.0",
        "info": {
            "title": data.get("title").and_then(JsonValue::as_str).unwrap_or("API"),
            "version": data.get("version").and_then(JsonValue::as_str).unwrap_or("1.0.0"),
            "description": data.get("description").and_then(JsonValue::as_str).unwrap_or(""),
        },
        "paths": {},
    });

    let Some(endpoints) = data.get("endpoints").and_then(JsonValue::as_array) else {
        return openapi;
    };

    for value in endpoints {
        let Ok(endpoint) = serde_json::from_value::<Endpoint>(value.clone()) else {
            warn!("dropping malformed endpoint entry");
            continue;
        };
        if endpoint.path.is_empty() {
            warn!("dropping endpoint without a path");
            continue;
        }

        let method = if endpoint.method.is_empty() {
            "get".to_string()
        } else {
            endpoint.method.to_lowercase()
        };

        openapi["paths"][&endpoint.path][method] = convert_endpoint(&endpoint);
    }

    openapi
}

fn convert_endpoint(endpoint: &Endpoint) -> JsonValue {
    let mut operation = json!({
        "summary": endpoint.summary.clone().unwrap_or_default(),
        "description": endpoint.description.clone().unwrap_or_default(),
        "parameters": [],
        "responses": {},
    });
    if let Some(operation_id) = &endpoint.operation_id {
        operation["operationId"] = json!(operation_id);
    }

    let parameters: Vec<JsonValue> = endpoint
        .parameters
        .iter()
        .map(|param| {
            json!({
                "name": param.name,
                "in": if param.in_.is_empty() { "query" } else { param.in_.as_str() },
                "description": param.description.clone().unwrap_or_default(),
                "required": param.required,
                "schema": param.schema_or_default(),
            })
        })
        .collect();
    operation["parameters"] = JsonValue::Array(parameters);

    if let Some(body) = &endpoint.request_body {
        let content_type = if body.content_type.is_empty() {
            "application/json"
        } else {
            body.content_type.as_str()
        };
        operation["requestBody"] = json!({
            "content": {content_type: {"schema": body.schema.clone()}},
            "required": body.required,
        });
    }

    let mut responses = Map::new();
    for response in &endpoint.responses {
        let status_code = if response.status_code.is_empty() {
            "200".to_string()
        } else {
            response.status_code.clone()
        };

        let mut content = json!({});
        if !response.content_type.is_empty() && !response.schema.is_null() {
            content[&response.content_type] = json!({"schema": response.schema.clone()});
        }
        responses.insert(
            status_code,
            json!({"description": response.description, "content": content}),
        );
    }
    if responses.is_empty() {
        responses.insert(
            "200".to_string(),
            json!({"description": "Successful operation", "content": {}}),
        );
    }
    operation["responses"] = JsonValue::Object(responses);

    operation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_endpoint_list() {
        let data = json!({
            "title": "Widgets",
            "version": "2.0",
            "description": "Widget management",
            "endpoints": [
                {
                    "path": "/widgets/{id}",
                    "method": "GET",
                    "operationId": "getWidget",
                    "summary": "Fetch one widget",
                    "parameters": [
                        {"name": "id", "in": "path", "required": true,
                         "schema": {"type": "integer"}}
                    ],
                    "responses": [
                        {"status_code": "200", "description": "ok",
                         "content_type": "application/json", "schema": {"type": "object"}}
                    ]
                }
            ]
        });

        let openapi = convert(&data);
        assert_eq!(
            openapi.pointer("/info/title").and_then(JsonValue::as_str),
            Some("Widgets")
        );

        let operation = openapi.pointer("/paths/~1widgets~1{id}/get").unwrap();
        assert_eq!(
            operation.get("operationId").and_then(JsonValue::as_str),
            Some("getWidget")
        );
        assert!(operation
            .pointer("/responses/200/content/application~1json/schema")
            .is_some());
    }

    #[test]
    fn test_parameter_defaults_applied() {
        let data = json!({
            "endpoints": [{
                "path": "/search",
                "method": "get",
                "parameters": [{"name": "q"}],
            }]
        });

        let operation = convert(&data);
        let param = operation
            .pointer("/paths/~1search/get/parameters/0")
            .unwrap();
        assert_eq!(param.get("in").and_then(JsonValue::as_str), Some("query"));
        assert_eq!(
            param.pointer("/schema/type").and_then(JsonValue::as_str),
            Some("string")
        );
    }

    #[test]
    fn test_synthetic_200_when_no_responses_declared() {
        let data = json!({"endpoints": [{"path": "/ping", "method": "get"}]});
        let operation = convert(&data);
        assert_eq!(
            operation
                .pointer("/paths/~1ping/get/responses/200/description")
                .and_then(JsonValue::as_str),
            Some("Successful operation")
        );
    }

    #[test]
    fn test_pathless_endpoint_is_dropped() {
        let data = json!({
            "endpoints": [
                {"method": "get"},
                {"path": "/kept", "method": "get"},
            ]
        });
        let openapi = convert(&data);
        let paths = openapi.get("paths").and_then(JsonValue::as_object).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths.contains_key("/kept"));
    }

    #[test]
    fn test_request_body_content_type_defaults() {
        let data = json!({
            "endpoints": [{
                "path": "/orders",
                "method": "post",
                "requestBody": {"required": true, "schema": {"type": "object"}},
            }]
        });
        let operation = convert(&data);
        assert!(operation
            .pointer("/paths/~1orders/post/requestBody/content/application~1json/schema")
            .is_some());
    }
}
