//! Crawler parser: the last-resort fallback.
//!
//! Scrapes arbitrary HTML or text pages for `METHOD /path` patterns and
//! assembles whatever it finds into a minimal OpenAPI 3.0 value. Path
//! parameters are synthesized from `{token}` segments so scraped endpoints
//! can still pass completeness validation. A page with no recognizable
//! operations yields an empty `paths` object, which the dispatcher treats as
//! unusable.

// External imports (alphabetized)
use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value as JsonValue};

use crate::detect::load_text;
use crate::document::RawDocument;
use crate::parsers::SourceParser;

static TITLE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static METHOD_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\b\s+((?:/[A-Za-z0-9{}.\-_:~%]+)+/?)").unwrap()
});
static PATH_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

pub struct CrawlerParser;

#[async_trait]
impl SourceParser for CrawlerParser {
    async fn parse(&self, locator: &str) -> crate::Result<RawDocument> {
        info!("scraping {locator} for operation patterns");
        let content = load_text(locator).await?;

        let title = TITLE_TAG_RE
            .captures(&content)
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Scraped API".to_string());

        // Strip markup so patterns split across inline tags still match
        let text = TAG_RE.replace_all(&content, " ");

        let mut paths = Map::new();
        for caps in METHOD_PATH_RE.captures_iter(&text) {
            let method = caps[1].to_lowercase();
            let path = caps[2].trim_end_matches('/');
            let path = if path.is_empty() { "/" } else { path };

            let path_item = paths
                .entry(path.to_string())
                .or_insert_with(|| json!({}));
            if path_item.get(&method).is_some() {
                continue; // first sighting wins
            }

            debug!("scraped operation {} {}", method.to_uppercase(), path);
            path_item[&method] = json!({
                "summary": format!("{} {}", caps[1].to_uppercase(), path),
                "parameters": synthesize_path_parameters(path),
                "responses": {"200": {"description": "Successful operation"}},
            });
        }

        let count = paths.len();
        if count == 0 {
            debug!("no operation patterns found in {locator}");
        } else {
            info!("scraped {count} path(s) from {locator}");
        }

        Ok(RawDocument::new(json!({
            "openapi": "3.0.0",
            "info": {"title": title, "version": "1.0.0"},
            "paths": JsonValue::Object(paths),
        })))
    }
}

/// Build declared path parameters for every `{token}` in a scraped path.
fn synthesize_path_parameters(path: &str) -> JsonValue {
    let params: Vec<JsonValue> = PATH_PARAM_RE
        .captures_iter(path)
        .map(|caps| {
            json!({
                "name": &caps[1],
                "in": "path",
                "required": true,
                "schema": {"type": "string"},
            })
        })
        .collect();
    JsonValue::Array(params)
}
