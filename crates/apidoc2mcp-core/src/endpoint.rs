//! Intermediate endpoint model.
//!
//! One [`Endpoint`] describes a single HTTP operation (method + path) with its
//! parameter, body, and response shapes: the unit sitting between "any
//! document format" and "one MCP tool". The endpoint-list intermediate format
//! produced by the markdown/openapi/swagger parsers serializes these types
//! directly, and the compiler deserializes them back out of normalized specs.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// HTTP methods recognized across normalization and generation.
///
/// Both the normalizer's path walk and the compiler's validity check consult
/// this one list so the two can never diverge.
pub const HTTP_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "options", "head"];

/// Whether a string names a recognized HTTP method (case-insensitive).
pub fn is_http_method(method: &str) -> bool {
    HTTP_METHODS
        .iter()
        .any(|m| method.eq_ignore_ascii_case(m))
}

/// A single HTTP operation extracted from an API document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    /// URL template, parameters written as `{name}`
    #[serde(default)]
    pub path: String,

    /// HTTP method, matched case-insensitively
    #[serde(default)]
    pub method: String,

    /// Stable identifier; derived from method + path when absent
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Short human summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Longer human description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared parameters, ordered as found in the source document
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Request body, when the operation takes one
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Declared responses, flattened per status code
    #[serde(default)]
    pub responses: Vec<ResponseSpec>,
}

/// One declared parameter of an endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name; empty names fail endpoint validation
    #[serde(default)]
    pub name: String,

    /// Location: `path`, `query`, `body`, or `header`; empty fails validation
    #[serde(rename = "in", default)]
    pub in_: String,

    /// Human description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the parameter must be supplied
    #[serde(default)]
    pub required: bool,

    /// JSON schema of the parameter value; defaults to `{"type": "string"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonValue>,
}

impl Parameter {
    /// Schema with the string-typed default applied
    pub fn schema_or_default(&self) -> JsonValue {
        self.schema
            .clone()
            .unwrap_or_else(|| serde_json::json!({"type": "string"}))
    }
}

/// Request body of an endpoint, flattened to one content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    /// Media type carrying the body schema
    #[serde(default)]
    pub content_type: String,

    /// Whether the body must be supplied
    #[serde(default)]
    pub required: bool,

    /// JSON schema of the body
    #[serde(default)]
    pub schema: JsonValue,
}

/// One declared response of an endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code, kept as a string (`"200"`, `"default"`)
    #[serde(default)]
    pub status_code: String,

    /// Human description
    #[serde(default)]
    pub description: String,

    /// Media type of the response payload, empty when undeclared
    #[serde(default)]
    pub content_type: String,

    /// JSON schema of the response payload
    #[serde(default)]
    pub schema: JsonValue,
}
