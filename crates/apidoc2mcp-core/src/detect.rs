//! Input format detection.
//!
//! Classifies a locator (file path or URL) into one of the supported source
//! formats before any parser runs. Detection is deliberately optimistic: an
//! unreadable or ambiguous structured file still resolves to `openapi` rather
//! than failing, and anything unrecognized falls back to the crawler. The
//! function never returns an error.

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

// External imports (alphabetized)
use log::debug;
use serde_json::Value as JsonValue;

/// Source format of an API documentation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// OpenAPI 3.x document
    OpenApi,
    /// Swagger 2.0 document
    Swagger,
    /// Markdown API documentation
    Markdown,
    /// HTML documentation page
    Html,
    /// Last-resort scraping of arbitrary pages
    Crawler,
}

impl FormatTag {
    /// String form used in logs and CLI values
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::OpenApi => "openapi",
            FormatTag::Swagger => "swagger",
            FormatTag::Markdown => "markdown",
            FormatTag::Html => "html",
            FormatTag::Crawler => "crawler",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openapi" => Ok(FormatTag::OpenApi),
            "swagger" => Ok(FormatTag::Swagger),
            "markdown" => Ok(FormatTag::Markdown),
            "html" => Ok(FormatTag::Html),
            "crawler" => Ok(FormatTag::Crawler),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

/// Whether a locator is an HTTP(S) URL rather than a filesystem path.
pub fn is_url(locator: &str) -> bool {
    url::Url::parse(locator)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Detect the format of an input locator.
///
/// Decision order: file extension first (with content inspection for
/// JSON/YAML to split Swagger 2.0 from OpenAPI 3.x), then a metadata probe
/// for bare URLs, then the crawler as last resort. May perform one or two
/// network calls for URL inputs; mutates nothing.
pub async fn detect_format(locator: &str) -> FormatTag {
    let lower = locator.to_ascii_lowercase();

    if lower.ends_with(".json") || lower.ends_with(".yaml") || lower.ends_with(".yml") {
        return detect_structured(locator, lower.ends_with(".json")).await;
    }

    if lower.ends_with(".md") {
        return FormatTag::Markdown;
    }

    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return FormatTag::Html;
    }

    if is_url(locator) {
        return detect_from_probe(locator).await;
    }

    FormatTag::Crawler
}

/// Inspect a `.json`/`.yaml` locator's content to split Swagger from OpenAPI.
///
/// Any read or parse failure resolves to the optimistic `openapi` default.
async fn detect_structured(locator: &str, is_json: bool) -> FormatTag {
    let content = match load_text(locator).await {
        Ok(content) => content,
        Err(e) => {
            debug!("format detection could not read {locator}: {e}");
            return FormatTag::OpenApi;
        }
    };

    let parsed: Option<JsonValue> = if is_json {
        serde_json::from_str(&content).ok()
    } else {
        serde_yaml::from_str(&content).ok()
    };

    match parsed {
        Some(value) => classify_structured(&value),
        None => FormatTag::OpenApi,
    }
}

/// Probe a bare URL's declared content type.
async fn detect_from_probe(locator: &str) -> FormatTag {
    let client = reqwest::Client::new();
    let response = match client.head(locator).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("format detection probe failed for {locator}: {e}");
            return FormatTag::Crawler;
        }
    };

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.contains("json") {
        // Fetch the body and apply the same structural split as for files
        match client.get(locator).send().await {
            Ok(response) => match response.json::<JsonValue>().await {
                Ok(value) => classify_structured(&value),
                Err(_) => FormatTag::OpenApi,
            },
            Err(_) => FormatTag::OpenApi,
        }
    } else if content_type.contains("text/html") {
        FormatTag::Html
    } else if content_type.contains("text/markdown") {
        FormatTag::Markdown
    } else {
        FormatTag::Crawler
    }
}

/// Split a parsed structured document into Swagger vs OpenAPI.
fn classify_structured(value: &JsonValue) -> FormatTag {
    if value.get("swagger").and_then(JsonValue::as_str) == Some("2.0") {
        return FormatTag::Swagger;
    }
    if let Some(version) = value.get("openapi").and_then(JsonValue::as_str) {
        if version.starts_with("3.") {
            return FormatTag::OpenApi;
        }
    }
    // Ambiguous structure: optimistic default
    FormatTag::OpenApi
}

/// Load text content from a file path or URL.
pub(crate) async fn load_text(locator: &str) -> crate::Result<String> {
    if is_url(locator) {
        let response = reqwest::get(locator).await?;
        if !response.status().is_success() {
            return Err(crate::Error::parse(format!(
                "failed to fetch {}: HTTP {}",
                locator,
                response.status()
            )));
        }
        Ok(response.text().await?)
    } else {
        Ok(tokio::fs::read_to_string(locator).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_tag_roundtrip() {
        for tag in [
            FormatTag::OpenApi,
            FormatTag::Swagger,
            FormatTag::Markdown,
            FormatTag::Html,
            FormatTag::Crawler,
        ] {
            assert_eq!(tag.as_str().parse::<FormatTag>().unwrap(), tag);
        }
        assert!("auto".parse::<FormatTag>().is_err());
    }

    #[tokio::test]
    async fn test_detect_json_swagger() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("api.json");
        tokio::fs::write(&path, r#"{"swagger": "2.0", "paths": {}}"#).await?;
        assert_eq!(
            detect_format(path.to_str().unwrap()).await,
            FormatTag::Swagger
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_detect_yaml_openapi() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("api.yaml");
        tokio::fs::write(&path, "openapi: 3.0.0\npaths: {}\n").await?;
        assert_eq!(
            detect_format(path.to_str().unwrap()).await,
            FormatTag::OpenApi
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_detect_unreadable_json_defaults_openapi() {
        assert_eq!(
            detect_format("/nonexistent/api.json").await,
            FormatTag::OpenApi
        );
    }

    #[tokio::test]
    async fn test_detect_ambiguous_json_defaults_openapi() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("api.json");
        tokio::fs::write(&path, r#"{"something": "else"}"#).await?;
        assert_eq!(
            detect_format(path.to_str().unwrap()).await,
            FormatTag::OpenApi
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_detect_by_extension() {
        assert_eq!(detect_format("docs/API.md").await, FormatTag::Markdown);
        assert_eq!(detect_format("docs/index.html").await, FormatTag::Html);
        assert_eq!(detect_format("docs/index.HTM").await, FormatTag::Html);
    }

    #[tokio::test]
    async fn test_detect_unknown_falls_back_to_crawler() {
        assert_eq!(detect_format("somefile.txt").await, FormatTag::Crawler);
    }

    #[tokio::test]
    async fn test_detect_unreachable_url_falls_back_to_crawler() {
        assert_eq!(
            detect_format("http://127.0.0.1:1/docs").await,
            FormatTag::Crawler
        );
    }
}
