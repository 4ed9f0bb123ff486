//! OpenAPI 3.x source parser.
//!
//! Loads a JSON or YAML document, verifies it declares an `openapi` version,
//! and reduces it to the endpoint-list intermediate outline that the
//! normalizer understands. Reference resolution is intentionally not done
//! here; `$ref` schemas pass through untouched.

// External imports (alphabetized)
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::detect::load_text;
use crate::document::RawDocument;
use crate::endpoint::{Endpoint, Parameter, RequestBody, ResponseSpec, HTTP_METHODS};
use crate::parsers::{parse_structured, SourceParser};

pub struct OpenApiParser;

#[async_trait]
impl SourceParser for OpenApiParser {
    async fn parse(&self, locator: &str) -> crate::Result<RawDocument> {
        let content = load_text(locator).await?;
        let spec = parse_structured(&content)?;

        if spec.get("openapi").is_none() {
            return Err(crate::Error::parse(
                "document does not declare an `openapi` version",
            ));
        }

        Ok(RawDocument::new(outline(&spec)?))
    }
}

/// Reduce an OpenAPI document to the endpoint-list intermediate format.
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
    let parameters = operation
        .get("parameters")
        .and_then(JsonValue::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| serde_json::from_value::<Parameter>(p.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

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
        request_body: extract_request_body(operation),
        responses: extract_responses(operation),
    }
}

/// Flatten an OpenAPI `requestBody` to its first declared content type.
fn extract_request_body(operation: &serde_json::Map<String, JsonValue>) -> Option<RequestBody> {
    let request_body = operation.get("requestBody")?;
    let content = request_body.get("content").and_then(JsonValue::as_object)?;
    let (content_type, media) = content.iter().next()?;

    Some(RequestBody {
        content_type: content_type.clone(),
        required: request_body
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        schema: media.get("schema").cloned().unwrap_or_else(|| json!({})),
    })
}

fn extract_responses(operation: &serde_json::Map<String, JsonValue>) -> Vec<ResponseSpec> {
    let Some(responses) = operation.get("responses").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    responses
        .iter()
        .map(|(status_code, response)| {
            let content = response.get("content").and_then(JsonValue::as_object);
            let (content_type, schema) = content
                .and_then(|c| c.iter().next())
                .map(|(ct, media)| {
                    (
                        ct.clone(),
                        media.get("schema").cloned().unwrap_or_else(|| json!({})),
                    )
                })
                .unwrap_or_else(|| (String::new(), json!({})));

            ResponseSpec {
                status_code: status_code.clone(),
                description: response
                    .get("description")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("")
                    .to_string(),
                content_type,
                schema,
            }
        })
        .collect()
}
