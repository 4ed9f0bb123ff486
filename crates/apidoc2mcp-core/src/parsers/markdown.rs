//! Markdown source parser.
//!
//! Heuristic extraction from hand-written API docs: a top-level heading gives
//! the title, level 2/3 sections that mention `METHOD /path` become endpoints,
//! pipe tables become parameters, and fenced JSON blocks after "Request Body"
//! or "Response" headings become body/response examples. Deliberately shallow;
//! endpoints the heuristics miss are the crawler's or a human's problem.

// External imports (alphabetized)
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value as JsonValue};

use crate::detect::load_text;
use crate::document::RawDocument;
use crate::endpoint::{Endpoint, Parameter, RequestBody, ResponseSpec};
use crate::parsers::SourceParser;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+(.+?)\s*$").unwrap());
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{2,3}\s+(.+?)\s*$").unwrap());
static ANY_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Vv]ersion[:：]\s*([0-9][0-9.]*)").unwrap());
static METHOD_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(GET|POST|PUT|DELETE|PATCH)\s+(/[^\s`]+)").unwrap());
static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\|(.+)\|\s*$\n^\|[-:|\s]+\|\s*$\n((?:\|.+\|\s*\n?)+)").unwrap()
});
static REQUEST_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)[Rr]equest\s+[Bb]ody.*?```(?:json)?\n(.*?)```").unwrap()
});
static RESPONSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)[Rr]esponse.*?```(?:json)?\n(.*?)```").unwrap());

pub struct MarkdownParser;

#[async_trait]
impl SourceParser for MarkdownParser {
    async fn parse(&self, locator: &str) -> crate::Result<RawDocument> {
        let content = load_text(locator).await?;

        let title = TITLE_RE
            .captures(&content)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "Unnamed API".to_string());
        let version = VERSION_RE
            .captures(&content)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "1.0.0".to_string());

        Ok(RawDocument::new(json!({
            "title": title,
            "description": extract_description(&content),
            "version": version,
            "endpoints": serde_json::to_value(extract_endpoints(&content))?,
        })))
    }
}

/// First paragraph after the top-level heading, up to the next heading.
fn extract_description(content: &str) -> String {
    let Some(title) = TITLE_RE.find(content) else {
        return String::new();
    };
    let rest = &content[title.end()..];
    match ANY_HEADING_RE.find(rest) {
        Some(next) => rest[..next.start()].trim().to_string(),
        None => rest.trim().to_string(),
    }
}

/// Walk level 2/3 sections and keep those describing one HTTP operation.
fn extract_endpoints(content: &str) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    let headings: Vec<_> = HEADING_RE.find_iter(content).collect();
    for (i, heading) in headings.iter().enumerate() {
        let section_end = headings
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(content.len());
        let section = &content[heading.start()..section_end];
        let heading_text = HEADING_RE
            .captures(section)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        // Title wins over body when both mention a method + path
        let Some(caps) = METHOD_PATH_RE
            .captures(&heading_text)
            .or_else(|| METHOD_PATH_RE.captures(section))
        else {
            continue;
        };

        endpoints.push(Endpoint {
            path: caps[2].to_string(),
            method: caps[1].to_uppercase(),
            operation_id: None,
            summary: Some(heading_text),
            description: None,
            parameters: extract_parameters(section),
            request_body: extract_request_body(section),
            responses: extract_responses(section),
        });
    }

    endpoints
}

/// Parse the first pipe table of a section into parameters.
fn extract_parameters(section: &str) -> Vec<Parameter> {
    let Some(table) = TABLE_RE.captures(section) else {
        return Vec::new();
    };

    let headers: Vec<String> = table[1]
        .split('|')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut parameters = Vec::new();
    for row in table[2].lines() {
        let cells: Vec<&str> = row.trim().trim_matches('|').split('|').collect();

        let mut name = String::new();
        let mut in_: Option<String> = None;
        let mut required: Option<bool> = None;
        let mut description = None;
        let mut schema_type = None;

        for (i, header) in headers.iter().enumerate() {
            let Some(cell) = cells.get(i).map(|c| c.trim()) else {
                continue;
            };
            if header.contains("name") {
                name = cell.to_string();
            } else if header.contains("type") {
                schema_type = Some(cell.to_lowercase());
            } else if header.contains("required") {
                let lower = cell.to_lowercase();
                required = Some(lower.contains("yes") || lower.contains("true"));
            } else if header.contains("description") {
                description = Some(cell.to_string());
            } else if header.contains("in") || header.contains("location") {
                let lower = cell.to_lowercase();
                let location = ["path", "query", "header", "body"]
                    .into_iter()
                    .find(|loc| lower.contains(loc))
                    .unwrap_or("query");
                in_ = Some(location.to_string());
            }
        }

        if name.is_empty() {
            continue;
        }

        // Guess the location from the name when the table has no column for it
        let in_ = in_.unwrap_or_else(|| {
            if name.contains('{') && name.contains('}') {
                "path".to_string()
            } else {
                "query".to_string()
            }
        });
        let required = required.unwrap_or(in_ == "path");

        parameters.push(Parameter {
            name: name.trim_matches(|c| c == '{' || c == '}').to_string(),
            in_,
            description,
            required,
            schema: Some(json!({"type": schema_type.unwrap_or_else(|| "string".to_string())})),
        });
    }

    parameters
}

fn extract_request_body(section: &str) -> Option<RequestBody> {
    let example = REQUEST_BODY_RE.captures(section)?[1].trim().to_string();
    Some(RequestBody {
        content_type: "application/json".to_string(),
        required: true,
        schema: json!({"type": "object", "example": example}),
    })
}

fn extract_responses(section: &str) -> Vec<ResponseSpec> {
    let schema = RESPONSE_RE
        .captures(section)
        .map(|caps| json!({"type": "object", "example": caps[1].trim()}))
        .unwrap_or_else(|| json!({}));

    vec![ResponseSpec {
        status_code: "200".to_string(),
        description: "Success".to_string(),
        content_type: "application/json".to_string(),
        schema,
    }]
}
