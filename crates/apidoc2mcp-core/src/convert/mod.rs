//! Normalization of raw documents into OpenAPI 3.0.
//!
//! Every parser output converges here: already-OpenAPI documents pass through,
//! Swagger 2.0 and the endpoint-list intermediate get converted, unknown
//! objects get best-effort extraction, and non-objects are wrapped in a review
//! envelope rather than discarded. Results that pass the structural validation
//! gate are persisted in the content-addressed cache; invalid results are
//! still returned to the caller, just never cached.

pub mod custom;
pub mod swagger;

// External imports (alphabetized)
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value as JsonValue};

use crate::cache::ConversionCache;
use crate::document::{DocumentShape, RawDocument};

static OPENAPI_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^3\.\d+\.\d+$").unwrap());

/// Convert a raw document to the OpenAPI 3.0 standard format.
///
/// Consults the conversion cache first; on a hit all conversion work is
/// skipped. The returned spec is not guaranteed to be valid; callers must
/// not assume it is cache-eligible.
pub async fn convert_to_standard_format(
    document: &RawDocument,
    cache: &ConversionCache,
) -> JsonValue {
    let key = ConversionCache::key(document.as_json());
    if let Some(cached) = cache.load(&key).await {
        info!("loaded conversion result from cache");
        return cached;
    }

    let shape = document.shape();
    let result = match shape {
        DocumentShape::OpenApi => {
            info!("document is already OpenAPI, no conversion needed");
            document.as_json().clone()
        }
        DocumentShape::Swagger => {
            info!("converting Swagger 2.0 document to OpenAPI");
            swagger::convert(document.as_json())
        }
        DocumentShape::Endpoints => {
            info!("converting endpoint-list intermediate to OpenAPI");
            custom::convert(document.as_json())
        }
        DocumentShape::Unstructured => {
            warn!("document is unstructured, wrapping for manual review");
            wrap_unstructured(document.as_json())
        }
        DocumentShape::Generic => {
            warn!("unknown document shape, attempting generic conversion");
            convert_generic(document.as_json())
        }
    };

    if validate_openapi(&result) {
        if let Err(e) = cache.store(&key, &result).await {
            warn!("failed to cache conversion result: {e}");
        }
    } else {
        warn!("conversion result failed OpenAPI validation, skipping cache");
    }

    result
}

/// Structural validation gate for normalized specs.
///
/// Checks the NormalizedSpec invariant: `openapi` matches `3.x.y`,
/// `info.title` and `info.version` are non-empty, and `paths` is an object
/// (possibly empty).
pub fn validate_openapi(spec: &JsonValue) -> bool {
    let Some(obj) = spec.as_object() else {
        return false;
    };

    let version_ok = obj
        .get("openapi")
        .and_then(JsonValue::as_str)
        .map(|v| OPENAPI_VERSION_RE.is_match(v))
        .unwrap_or(false);
    if !version_ok {
        return false;
    }

    let Some(info) = obj.get("info").and_then(JsonValue::as_object) else {
        return false;
    };
    for field in ["title", "version"] {
        let present = info
            .get(field)
            .and_then(JsonValue::as_str)
            .map(|s| !s.is_empty())
            .unwrap_or(false);
        if !present {
            return false;
        }
    }

    obj.get("paths").map(JsonValue::is_object).unwrap_or(false)
}

/// Wrap a non-object payload in a minimal OpenAPI envelope.
///
/// The original payload is preserved under an extension field and flagged for
/// manual follow-up; it is never silently discarded.
fn wrap_unstructured(payload: &JsonValue) -> JsonValue {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Unstructured API Data",
            "version": "1.0.0",
            "description": "This input could not be classified and needs manual review",
        },
        "paths": {},
        "x-unstructured-source": payload.clone(),
        "x-needs-review": true,
    })
}

/// Best-effort conversion of an object that matched no known tag.
///
/// Extracts `info` (or top-level `title`/`name`, `version`, `description`),
/// passes `paths` through when present, converts an `endpoints` array
/// otherwise, and falls back to the unstructured wrap when neither yields any
/// paths.
fn convert_generic(data: &JsonValue) -> JsonValue {
    let mut info = json!({
        "title": "Unknown API",
        "version": "1.0.0",
        "description": "Converted from unknown format",
    });

    if let Some(declared) = data.get("info").filter(|i| i.is_object()) {
        info = declared.clone();
    } else {
        if let Some(title) = data
            .get("title")
            .or_else(|| data.get("name"))
            .and_then(JsonValue::as_str)
        {
            info["title"] = json!(title);
        }
        for field in ["version", "description"] {
            if let Some(value) = data.get(field).and_then(JsonValue::as_str) {
                info[field] = json!(value);
            }
        }
    }

    let paths = match data.get("paths") {
        Some(paths) if paths.is_object() => paths.clone(),
        _ => match data.get("endpoints") {
            Some(endpoints) if endpoints.is_array() => {
                custom::convert(data).get("paths").cloned().unwrap_or(json!({}))
            }
            _ => json!({}),
        },
    };

    if paths.as_object().map(|p| p.is_empty()).unwrap_or(true) {
        warn!("generic conversion found no paths, wrapping for manual review");
        return wrap_unstructured(data);
    }

    json!({
        "openapi": "3.0.0",
        "info": info,
        "paths": paths,
    })
}
