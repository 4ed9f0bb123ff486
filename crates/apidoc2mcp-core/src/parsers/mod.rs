//! Source parsers and the dispatch/fallback chain.
//!
//! Each supported format implements [`SourceParser`], a strategy with one
//! `parse(locator)` capability. [`parse_document`] resolves the format tag to
//! a parser, invokes it, and on failure or an unusable result retries exactly
//! once with the crawler parser. When both the primary parser and the crawler
//! raise, the *original* error propagates so root-cause diagnostics survive.

pub mod crawler;
pub mod markdown;
pub mod openapi;
pub mod swagger;

// External imports (alphabetized)
use async_trait::async_trait;
use log::{error, info, warn};

use crate::detect::FormatTag;
use crate::document::RawDocument;

/// A format-specific document parser.
///
/// Implementations may fail on unreachable or unparsable input and must not
/// retry internally; retries belong to the dispatcher.
#[async_trait]
pub trait SourceParser: Send + Sync {
    /// Parse the document behind `locator` into a raw document
    async fn parse(&self, locator: &str) -> crate::Result<RawDocument>;
}

/// Resolve a format tag to its parser.
///
/// HTML input goes straight to the crawler; it is the only parser that
/// understands arbitrary pages.
pub fn parser_for(tag: FormatTag) -> &'static dyn SourceParser {
    match tag {
        FormatTag::OpenApi => &openapi::OpenApiParser,
        FormatTag::Swagger => &swagger::SwaggerParser,
        FormatTag::Markdown => &markdown::MarkdownParser,
        FormatTag::Html | FormatTag::Crawler => &crawler::CrawlerParser,
    }
}

/// Parse a document, recovering once through the crawler parser.
pub async fn parse_document(locator: &str, tag: FormatTag) -> crate::Result<RawDocument> {
    parse_with_fallback(parser_for(tag), &crawler::CrawlerParser, locator, tag).await
}

/// Fallback chain, factored over the parser seam so tests can inject stubs.
async fn parse_with_fallback(
    primary: &dyn SourceParser,
    crawler: &dyn SourceParser,
    locator: &str,
    tag: FormatTag,
) -> crate::Result<RawDocument> {
    info!("parsing {locator} with {tag} parser");

    match primary.parse(locator).await {
        Ok(result) => {
            if result.is_usable() {
                info!("parsed {locator} as {tag}");
                return Ok(result);
            }

            // Empty result: one crawler retry, accepted only with real paths
            if tag != FormatTag::Crawler {
                warn!("{tag} parser returned nothing usable for {locator}, retrying with crawler");
                if let Ok(fallback) = crawler.parse(locator).await {
                    if fallback.has_paths() {
                        info!("crawler fallback recovered {locator}");
                        return Ok(fallback);
                    }
                }
            }

            warn!("parse result for {locator} is empty");
            Ok(result)
        }
        Err(original) => {
            if tag != FormatTag::Crawler {
                info!("retrying {locator} with crawler after parse failure");
                match crawler.parse(locator).await {
                    Ok(fallback) if fallback.has_paths() => {
                        info!("crawler fallback recovered {locator}");
                        return Ok(fallback);
                    }
                    Ok(_) => {}
                    // Swallowed: the original error is the diagnostic one
                    Err(crawler_err) => error!("crawler fallback also failed: {crawler_err}"),
                }
            }
            Err(original)
        }
    }
}

/// Parse text content as either JSON or YAML.
pub(crate) fn parse_structured(content: &str) -> crate::Result<serde_json::Value> {
    // Try JSON first
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    // If JSON parsing fails, try YAML
    if let Ok(value) = serde_yaml::from_str(content) {
        return Ok(value);
    }

    Err(crate::Error::parse(
        "content is neither valid JSON nor YAML",
    ))
}
