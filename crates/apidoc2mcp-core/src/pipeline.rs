//! Pipeline orchestration.
//!
//! Sequences Detect → Parse → Normalize → Compile → Emit, timing each stage.
//! Stages run strictly in order; each stage's output is the next stage's only
//! input. Metrics are collected as the run proceeds and are logged even when
//! generation fails, so a zero-tool run still reports how far it got.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

// External imports (alphabetized)
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::cache::ConversionCache;
use crate::convert::convert_to_standard_format;
use crate::detect::{detect_format, FormatTag};
use crate::emit::{emit_artifacts, EmittedArtifacts};
use crate::generator::McpGenerator;
use crate::parsers::parse_document;

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Declared source format, or `"auto"` to detect from the locator
    pub format: String,

    /// Root output directory; the service writes into a subdirectory named
    /// after the service
    pub output_dir: PathBuf,

    /// Explicit service name; overrides the spec title when set
    pub service_name: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            format: "auto".to_string(),
            output_dir: PathBuf::from("output"),
            service_name: None,
        }
    }
}

/// Per-stage wall-clock timings and endpoint counts for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineMetrics {
    pub parse_time: f64,
    pub convert_time: f64,
    pub generate_time: f64,
    pub total_time: f64,
    pub endpoints_count: usize,
    pub incomplete_endpoints: usize,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub service_name: String,
    pub service_dir: PathBuf,
    pub artifacts: EmittedArtifacts,
    pub metrics: PipelineMetrics,
}

/// Drives a document from locator to emitted MCP service.
pub struct Pipeline {
    options: PipelineOptions,
    cache: ConversionCache,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        let cache = ConversionCache::new(options.output_dir.join(".cache"));
        Self { options, cache }
    }

    /// Run the full pipeline for one locator.
    pub async fn run(&self, locator: &str) -> crate::Result<PipelineReport> {
        let total_start = Instant::now();
        let mut metrics = PipelineMetrics::default();

        let tag = self.resolve_format(locator).await;
        info!("processing {locator} as {tag}");

        let parse_start = Instant::now();
        let document = match parse_document(locator, tag).await {
            Ok(document) => document,
            Err(e) => {
                error!("parse stage failed for {locator}: {e}");
                return Err(e);
            }
        };
        metrics.parse_time = parse_start.elapsed().as_secs_f64();

        let convert_start = Instant::now();
        let mut api_data = convert_to_standard_format(&document, &self.cache).await;
        metrics.convert_time = convert_start.elapsed().as_secs_f64();

        let service_name = self.resolve_service_name(&mut api_data);
        let service_dir = match &service_name {
            Some(name) => self.options.output_dir.join(name),
            None => self.options.output_dir.clone(),
        };
        let service_name = service_name.unwrap_or_else(|| "mcp_service".to_string());

        let generate_start = Instant::now();
        let generator = McpGenerator::new(api_data);
        let artifacts = generator.generate();
        metrics.generate_time = generate_start.elapsed().as_secs_f64();
        metrics.endpoints_count = generator.endpoints().len();
        metrics.incomplete_endpoints = artifacts.incomplete.len();

        if artifacts.service.functions.is_empty() {
            metrics.total_time = total_start.elapsed().as_secs_f64();
            log_metrics(&metrics);
            return Err(crate::Error::generate(format!(
                "no valid endpoints were produced from {locator} ({} incomplete)",
                artifacts.incomplete.len()
            )));
        }

        let emitted =
            emit_artifacts(&service_dir, &service_name, generator.api_data(), &artifacts).await?;

        metrics.total_time = total_start.elapsed().as_secs_f64();
        log_metrics(&metrics);
        log_startup_guide(&service_name, &service_dir);

        Ok(PipelineReport {
            service_name,
            service_dir,
            artifacts: emitted,
            metrics,
        })
    }

    /// Resolve the declared format string to a tag.
    ///
    /// `"auto"` triggers detection; a string naming no known format falls back
    /// to the crawler with a warning rather than failing the run.
    async fn resolve_format(&self, locator: &str) -> FormatTag {
        if self.options.format.eq_ignore_ascii_case("auto") {
            return detect_format(locator).await;
        }
        match FormatTag::from_str(&self.options.format) {
            Ok(tag) => tag,
            Err(e) => {
                warn!("{e}, substituting crawler");
                FormatTag::Crawler
            }
        }
    }

    /// Decide the service name and apply an explicit override to the spec.
    ///
    /// An explicit name replaces `info.title`, preserving the original title
    /// under `x-original-title`. Without one the title is lower-snake-cased;
    /// a spec with no title leaves the output directory as-is.
    fn resolve_service_name(&self, api_data: &mut JsonValue) -> Option<String> {
        if let Some(name) = &self.options.service_name {
            if let Some(info) = api_data.get_mut("info").and_then(JsonValue::as_object_mut) {
                if let Some(original) = info.get("title").cloned() {
                    info.insert("x-original-title".to_string(), original);
                }
                info.insert("title".to_string(), json!(name));
            }
            return Some(name.clone());
        }

        api_data
            .pointer("/info/title")
            .and_then(JsonValue::as_str)
            .filter(|t| !t.is_empty())
            .map(snake_case_name)
    }
}

/// Lower-snake-case a title for use as a directory and service name.
fn snake_case_name(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_sep = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "mcp_service".to_string()
    } else {
        out
    }
}

fn log_metrics(metrics: &PipelineMetrics) {
    info!(
        "pipeline metrics: parse {:.3}s, convert {:.3}s, generate {:.3}s, total {:.3}s, \
         {} endpoint(s), {} incomplete",
        metrics.parse_time,
        metrics.convert_time,
        metrics.generate_time,
        metrics.total_time,
        metrics.endpoints_count,
        metrics.incomplete_endpoints
    );
}

fn log_startup_guide(service_name: &str, service_dir: &Path) {
    info!("generated MCP service '{service_name}' in {}", service_dir.display());
    info!("to start the service:");
    info!("  cd {}", service_dir.display());
    info!("  pip install \"mcp[cli]\" httpx");
    info!("  API_BASE_URL=<your API root> python mcp_server.py");
}
