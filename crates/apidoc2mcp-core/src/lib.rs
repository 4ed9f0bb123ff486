//! apidoc2mcp Core Library
//!
//! This library turns heterogeneous API documentation (OpenAPI 3.x,
//! Swagger 2.0, Markdown, arbitrary HTML) into a runnable MCP service stub,
//! exposing each discovered HTTP endpoint as a callable tool.

pub mod cache;
pub mod convert;
pub mod detect;
pub mod document;
pub mod emit;
pub mod endpoint;
pub mod error;
pub mod generator;
pub mod parsers;
pub mod pipeline;

pub use crate::{
    cache::ConversionCache,
    convert::convert_to_standard_format,
    detect::{detect_format, FormatTag},
    document::{DocumentShape, RawDocument},
    emit::{emit_artifacts, EmittedArtifacts},
    endpoint::Endpoint,
    error::{Error, Result},
    generator::{GeneratedService, McpGenerator, ServiceArtifacts},
    parsers::{parse_document, SourceParser},
    pipeline::{Pipeline, PipelineMetrics, PipelineOptions, PipelineReport},
};
