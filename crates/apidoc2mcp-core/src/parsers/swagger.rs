//! Swagger 2.0 source parser.
//!
//! Swagger declares request bodies as `in: body` parameters; this parser keeps
//! them in the parameter list (the normalizer relocates them) and additionally
//! surfaces the first body parameter as the endpoint's request body, which is
//! all downstream stages need.

// External imports (alphabetized)
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::detect::load_text;
use crate::document::RawDocument;
use crate::endpoint::{Endpoint, Parameter, RequestBody, ResponseSpec, HTTP_METHODS};
use crate::parsers::{parse_structured, SourceParser};

pub struct SwaggerParser;

#[async_trait]
impl SourceParser for SwaggerParser {
    async fn parse(&self, locator: &str) -> crate::Result<RawDocument> {
        let content = load_text(locator).await?;
        let spec = parse_structured(&content)?;

        if spec.get("swagger").and_then(JsonValue::as_str) != Some("2.0") {
            return Err(crate::Error::parse(
                "document does not declare `swagger: \"2.0\"`",
            ));
        }

        Ok(RawDocument::new(outline(&spec)?))
    }
}

/// Reduce a Swagger document to the endpoint-list intermediate format.
fn outline(spec: &JsonValue) -> crate::Result<JsonValue> {
    let info = spec.get("info");
    let title = info
        .and_then(|i| i.get("title"))
        .and_then(JsonValue::as_str)
        .unwrap_or("Unnamed API");
    let description = info
        .and_then(|i| i.get("description"))
        .and_then(JsonValue::as_str)
        .unwrap_or("");
    let version = info
        .and_then(|i| i.get("version"))
        .and_then(JsonValue::as_str)
        .unwrap_or("1.0.0");

    let mut endpoints = Vec::new();
    if let Some(paths) = spec.get("paths").and_then(JsonValue::as_object) {
        for (path, path_item) in paths {
            for method in HTTP_METHODS {
                let Some(operation) = path_item.get(method).and_then(JsonValue::as_object) else {
                    continue;
                };
                endpoints.push(build_endpoint(path, method, operation));
            }
        }
    }

    Ok(json!({
        "title": title,
        "description": description,
        "version": version,
        "endpoints": serde_json::to_value(endpoints)?,
    }))
}

fn build_endpoint(
    path: &str,
    method: &str,
    operation: &serde_json::Map<String, JsonValue>,
) -> Endpoint {
    let raw_params = operation
        .get("parameters")
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default();

    let parameters = raw_params.iter().map(convert_parameter).collect();

    // Swagger carries the request body as the first `in: body` parameter
    let request_body = raw_params
        .iter()
        .find(|p| p.get("in").and_then(JsonValue::as_str) == Some("body"))
        .map(|body_param| RequestBody {
            content_type: "application/json".to_string(),
            required: body_param
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            schema: body_param.get("schema").cloned().unwrap_or_else(|| json!({})),
        });

    Endpoint {
        path: path.to_string(),
        method: method.to_uppercase(),
        operation_id: operation
            .get("operationId")
            .and_then(JsonValue::as_str)
            .map(String::from),
        summary: operation
            .get("summary")
            .and_then(JsonValue::as_str)
            .map(String::from),
        description: operation
            .get("description")
            .and_then(JsonValue::as_str)
            .map(String::from),
        parameters,
        request_body,
        responses: extract_responses(operation),
    }
}

/// Convert one Swagger parameter.
///
/// Body parameters carry a `schema` directly; all others declare their type
/// inline, which is folded into a simplified schema object.
fn convert_parameter(param: &JsonValue) -> Parameter {
    let schema = if param.get("in").and_then(JsonValue::as_str) == Some("body") {
        param.get("schema").cloned().unwrap_or_else(|| json!({}))
    } else {
        let mut schema = json!({
            "type": param.get("type").and_then(JsonValue::as_str).unwrap_or("string"),
        });
        for field in ["format", "enum"] {
            if let Some(value) = param.get(field) {
                schema[field] = value.clone();
            }
        }
        schema
    };

    Parameter {
        name: param
            .get("name")
            .and_then(JsonValue::as_str)
            .unwrap_or("")
            .to_string(),
        in_: param
            .get("in")
            .and_then(JsonValue::as_str)
            .unwrap_or("")
            .to_string(),
        description: param
            .get("description")
            .and_then(JsonValue::as_str)
            .map(String::from),
        required: param
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        schema: Some(schema),
    }
}

fn extract_responses(operation: &serde_json::Map<String, JsonValue>) -> Vec<ResponseSpec> {
    let Some(responses) = operation.get("responses").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    responses
        .iter()
        .map(|(status_code, response)| ResponseSpec {
            status_code: status_code.clone(),
            description: response
                .get("description")
                .and_then(JsonValue::as_str)
                .unwrap_or("")
                .to_string(),
            // Swagger 2.0 default
            content_type: "application/json".to_string(),
            schema: response.get("schema").cloned().unwrap_or_else(|| json!({})),
        })
        .collect()
}
