//! Raw document model shared by the parser and conversion stages.
//!
//! Every parser returns a [`RawDocument`]: an untyped JSON value whose shape is
//! only pinned down when the normalizer asks for it. Classification is a pure
//! function over the value, expressed as the [`DocumentShape`] sum type so each
//! downstream stage can match on an explicit variant instead of re-probing
//! loose fields.

use serde_json::Value as JsonValue;

/// An untyped document as returned by a source parser.
///
/// May hold an OpenAPI object, a Swagger object, an intermediate
/// `{endpoints: [...]}` outline, or an arbitrary scrape result. No invariant
/// is assumed about the value until [`RawDocument::shape`] classifies it.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct RawDocument {
    /// The raw JSON value of the document
    pub json: JsonValue,
}

/// Classified shape of a raw document, driving normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// Already OpenAPI 3.x; passes through the normalizer unchanged
    OpenApi,
    /// Swagger 2.0; converted per the Swagger mapping
    Swagger,
    /// Intermediate `{endpoints: [...]}` outline produced by format parsers
    Endpoints,
    /// A JSON object matching none of the known tags; best-effort extraction
    Generic,
    /// Not an object at all; wrapped in a review envelope, never discarded
    Unstructured,
}

impl RawDocument {
    /// Wrap a JSON value as a raw document
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    /// Classify the document's shape.
    ///
    /// Order matters: an object carrying both `openapi` and `endpoints` is
    /// treated as OpenAPI, matching the normalizer's conversion precedence.
    pub fn shape(&self) -> DocumentShape {
        let Some(obj) = self.json.as_object() else {
            return DocumentShape::Unstructured;
        };

        if let Some(version) = obj.get("openapi").and_then(JsonValue::as_str) {
            if version.starts_with("3.") {
                return DocumentShape::OpenApi;
            }
        }

        if obj.get("swagger").and_then(JsonValue::as_str) == Some("2.0") {
            return DocumentShape::Swagger;
        }

        if obj.get("endpoints").map(JsonValue::is_array) == Some(true) {
            return DocumentShape::Endpoints;
        }

        DocumentShape::Generic
    }

    /// Whether a parse result is worth keeping.
    ///
    /// A result is usable iff it is a non-empty array, or an object carrying a
    /// `paths` or `endpoints` key. The dispatcher retries with the crawler
    /// parser when this is false.
    pub fn is_usable(&self) -> bool {
        match &self.json {
            JsonValue::Array(items) => !items.is_empty(),
            JsonValue::Object(map) => map.contains_key("paths") || map.contains_key("endpoints"),
            _ => false,
        }
    }

    /// Whether the document carries a non-empty `paths` object.
    ///
    /// This is the stricter acceptance test applied to crawler fallback
    /// results only.
    pub fn has_paths(&self) -> bool {
        self.json
            .get("paths")
            .and_then(JsonValue::as_object)
            .map(|paths| !paths.is_empty())
            .unwrap_or(false)
    }
}
