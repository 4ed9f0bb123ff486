//! apidoc2mcp CLI entrypoint
//! Parses command-line arguments and dispatches to the core pipeline.

// Internal imports (std, crate)
use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use apidoc2mcp_core::{Pipeline, PipelineOptions};
use clap::Parser;
use log::error;

#[derive(Parser)]
#[command(name = "apidoc2mcp")]
#[command(author, version, about = "Convert API documentation into an MCP service", long_about = None)]
struct Cli {
    /// Path or URL to the API documentation
    ///
    /// Can be an OpenAPI/Swagger file (JSON or YAML), a Markdown document,
    /// an HTML page, or any URL worth scraping
    /// Example: apidoc2mcp path/to/openapi.yaml
    /// Example: apidoc2mcp https://example.com/api-docs
    input: String,

    /// Source format; `auto` detects from the locator
    #[arg(long, default_value = "auto",
          value_parser = ["auto", "openapi", "swagger", "markdown", "html"])]
    format: String,

    /// Output directory for the generated service
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Service name; overrides the title found in the documentation
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let pipeline = Pipeline::new(PipelineOptions {
        format: cli.format,
        output_dir: cli.output,
        service_name: cli.name,
    });

    match pipeline.run(&cli.input).await {
        Ok(report) => {
            println!(
                "Generated MCP service '{}' in {}",
                report.service_name,
                report.service_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("pipeline failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
