//! Artifact emission.
//!
//! Serializes the compiled service to `mcp-service.json` and renders two
//! templates: `mcp_server.py`, a runnable FastMCP stub with one tool function
//! per compiled endpoint, and `SERVICE.md`, which documents every implemented
//! tool and lists excluded endpoints with their reasons.
//!
//! The emitted stub reads `API_BASE_URL` from its own environment at startup;
//! the generator never bakes a base URL in.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use log::info;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tera::{Context, Tera};
use tokio::fs;

use crate::generator::{
    FunctionDescriptor, ParameterPlacement, RequestPlan, ServiceArtifacts,
};

const SERVER_TEMPLATE: &str = include_str!("../templates/mcp_server.py.tera");
const DOC_TEMPLATE: &str = include_str!("../templates/service_doc.md.tera");

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Paths of the files one emission pass wrote.
#[derive(Debug, Clone)]
pub struct EmittedArtifacts {
    pub service_file: PathBuf,
    pub server_file: PathBuf,
    pub doc_file: PathBuf,
}

#[derive(Serialize)]
struct ArgContext {
    py_name: String,
    required: bool,
}

#[derive(Serialize)]
struct SlotContext {
    name: String,
    py_name: String,
    required: bool,
}

#[derive(Serialize)]
struct DocParamContext {
    name: String,
    #[serde(rename = "type")]
    type_: String,
    required: bool,
    description: String,
}

#[derive(Serialize)]
struct ToolContext {
    name: String,
    py_name: String,
    description: String,
    method: String,
    url_template: String,
    /// f-string body with path tokens rewritten to Python identifiers
    url_expr: String,
    args: Vec<ArgContext>,
    query_params: Vec<SlotContext>,
    header_params: Vec<SlotContext>,
    body_params: Vec<SlotContext>,
    parameters: Vec<DocParamContext>,
    sends_body: bool,
    json_body: bool,
}

#[derive(Serialize)]
struct IncompleteContext {
    method: String,
    path: String,
    reason: String,
}

/// Write `mcp-service.json`, `mcp_server.py` and `SERVICE.md` under
/// `output_dir`, creating it as needed.
pub async fn emit_artifacts(
    output_dir: &Path,
    service_name: &str,
    api_data: &JsonValue,
    artifacts: &ServiceArtifacts,
) -> crate::Result<EmittedArtifacts> {
    fs::create_dir_all(output_dir).await?;

    let service_file = output_dir.join("mcp-service.json");
    let service_json = serde_json::to_string_pretty(&artifacts.service)?;
    fs::write(&service_file, service_json).await?;

    let mut tera = Tera::default();
    tera.add_raw_template("mcp_server.py", SERVER_TEMPLATE)?;
    tera.add_raw_template("SERVICE.md", DOC_TEMPLATE)?;

    let mut context = Context::new();
    context.insert("service_name", service_name);
    context.insert(
        "title",
        api_data
            .pointer("/info/title")
            .and_then(JsonValue::as_str)
            .unwrap_or(service_name),
    );
    context.insert(
        "description",
        api_data
            .pointer("/info/description")
            .and_then(JsonValue::as_str)
            .unwrap_or(""),
    );
    context.insert(
        "version",
        api_data
            .pointer("/info/version")
            .and_then(JsonValue::as_str)
            .unwrap_or("1.0.0"),
    );

    let tools: Vec<ToolContext> = artifacts
        .service
        .functions
        .iter()
        .filter_map(|function| {
            artifacts
                .plans
                .iter()
                .find(|(name, _)| name == &function.name)
                .map(|(_, plan)| tool_context(function, plan))
        })
        .collect();
    context.insert("tools", &tools);

    let incomplete: Vec<IncompleteContext> = artifacts
        .incomplete
        .iter()
        .map(|item| IncompleteContext {
            method: item.endpoint.method.to_uppercase(),
            path: item.endpoint.path.clone(),
            reason: item.reason.clone(),
        })
        .collect();
    context.insert("incomplete", &incomplete);

    let server_file = output_dir.join("mcp_server.py");
    fs::write(&server_file, tera.render("mcp_server.py", &context)?).await?;

    let doc_file = output_dir.join("SERVICE.md");
    fs::write(&doc_file, tera.render("SERVICE.md", &context)?).await?;

    info!(
        "wrote {} tool(s) and {} exclusion(s) to {}",
        tools.len(),
        incomplete.len(),
        output_dir.display()
    );

    Ok(EmittedArtifacts {
        service_file,
        server_file,
        doc_file,
    })
}

/// Flatten one descriptor + plan pair into template-ready shape.
fn tool_context(function: &FunctionDescriptor, plan: &RequestPlan) -> ToolContext {
    let mut url_expr = plan.url_template.clone();
    let mut query_params = Vec::new();
    let mut header_params = Vec::new();
    let mut body_params = Vec::new();

    for param in &plan.parameters {
        let slot = SlotContext {
            name: param.name.clone(),
            py_name: python_identifier(&param.name),
            required: param.required,
        };
        match param.placement {
            ParameterPlacement::Path => {
                url_expr = url_expr.replace(
                    &format!("{{{}}}", param.name),
                    &format!("{{{}}}", slot.py_name),
                );
            }
            ParameterPlacement::Query => query_params.push(slot),
            ParameterPlacement::Header => header_params.push(slot),
            ParameterPlacement::Body => body_params.push(slot),
        }
    }

    // Python requires defaulted arguments after positional ones
    let mut args: Vec<ArgContext> = function
        .parameters
        .iter()
        .filter(|(_, schema)| schema.required)
        .map(|(name, _)| ArgContext {
            py_name: python_identifier(name),
            required: true,
        })
        .collect();
    args.extend(
        function
            .parameters
            .iter()
            .filter(|(_, schema)| !schema.required)
            .map(|(name, _)| ArgContext {
                py_name: python_identifier(name),
                required: false,
            }),
    );

    let parameters = function
        .parameters
        .iter()
        .map(|(name, schema)| DocParamContext {
            name: name.clone(),
            type_: schema.type_.clone(),
            required: schema.required,
            description: schema.description.clone().unwrap_or_default(),
        })
        .collect();

    ToolContext {
        name: function.name.clone(),
        py_name: python_identifier(&function.name),
        description: function.description.clone(),
        method: plan.method.clone(),
        url_template: plan.url_template.clone(),
        url_expr,
        args,
        query_params,
        header_params,
        body_params,
        parameters,
        sends_body: plan.sends_body,
        json_body: plan.json_body,
    }
}

/// Coerce an arbitrary parameter or tool name into a valid Python identifier.
fn python_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if i == 0 && c.is_ascii_digit() {
                out.push('_');
            }
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        return "_param".to_string();
    }
    if PYTHON_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::McpGenerator;
    use serde_json::json;
    use tempfile::tempdir;

    fn spec() -> JsonValue {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "Pet Store", "version": "1.0.0",
                     "description": "Pets as a service"},
            "paths": {
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            {"name": "petId", "in": "path", "required": true,
                             "schema": {"type": "integer"}},
                            {"name": "verbose", "in": "query",
                             "schema": {"type": "boolean"}}
                        ],
                        "responses": {"200": {"description": "ok"}},
                    }
                },
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {
                                "type": "object",
                                "properties": {"name": {"type": "string"},
                                               "age": {"type": "integer"}},
                                "required": ["name"],
                            }}},
                        },
                        "responses": {"201": {"description": "created"}},
                    }
                },
                "/broken": {
                    "get": {"parameters": [{"name": "q"}], "responses": {}}
                }
            }
        })
    }

    #[tokio::test]
    async fn test_emit_writes_all_three_artifacts() -> crate::Result<()> {
        let dir = tempdir()?;
        let api_data = spec();
        let artifacts = McpGenerator::new(api_data.clone()).generate();

        let emitted = emit_artifacts(dir.path(), "pet_store", &api_data, &artifacts).await?;
        assert!(emitted.service_file.exists());
        assert!(emitted.server_file.exists());
        assert!(emitted.doc_file.exists());

        // mcp-service.json round-trips as a GeneratedService
        let raw = fs::read_to_string(&emitted.service_file).await?;
        let service: crate::generator::GeneratedService = serde_json::from_str(&raw)?;
        assert_eq!(service.functions.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_stub_guard_asymmetry() -> crate::Result<()> {
        let dir = tempdir()?;
        let api_data = spec();
        let artifacts = McpGenerator::new(api_data.clone()).generate();
        let emitted = emit_artifacts(dir.path(), "pet_store", &api_data, &artifacts).await?;

        let stub = fs::read_to_string(&emitted.server_file).await?;
        // Required body field guarded against absence only
        assert!(stub.contains("if name is not None:"));
        // Optional body field guarded by truth
        assert!(stub.contains("if age:"));
        assert!(stub.contains("if verbose:"));
        // Path parameter interpolated into the URL template
        assert!(stub.contains("f\"/pets/{petId}\""));
        // Base URL comes from the stub's own environment
        assert!(stub.contains("os.environ.get(\"API_BASE_URL\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_stub_body_only_on_mutating_methods() -> crate::Result<()> {
        let dir = tempdir()?;
        let api_data = spec();
        let artifacts = McpGenerator::new(api_data.clone()).generate();
        let emitted = emit_artifacts(dir.path(), "pet_store", &api_data, &artifacts).await?;

        let stub = fs::read_to_string(&emitted.server_file).await?;
        let get_fn = stub
            .split("async def ")
            .find(|f| f.starts_with("getPet"))
            .unwrap();
        let post_fn = stub
            .split("async def ")
            .find(|f| f.starts_with("createPet"))
            .unwrap();
        assert!(!get_fn.contains("payload"));
        assert!(post_fn.contains("json=payload"));
        Ok(())
    }

    #[tokio::test]
    async fn test_doc_lists_exclusions_with_reasons() -> crate::Result<()> {
        let dir = tempdir()?;
        let api_data = spec();
        let artifacts = McpGenerator::new(api_data.clone()).generate();
        let emitted = emit_artifacts(dir.path(), "pet_store", &api_data, &artifacts).await?;

        let doc = fs::read_to_string(&emitted.doc_file).await?;
        assert!(doc.contains("## Implemented tools (2)"));
        assert!(doc.contains("`getPet`"));
        assert!(doc.contains("## Unimplemented endpoints (1)"));
        assert!(doc.contains("Invalid parameter definition (missing name or location)"));
        assert!(doc.contains("API_BASE_URL"));
        Ok(())
    }

    #[test]
    fn test_python_identifier() {
        assert_eq!(python_identifier("petId"), "petId");
        assert_eq!(python_identifier("x-api-key"), "x_api_key");
        assert_eq!(python_identifier("2fast"), "_2fast");
        assert_eq!(python_identifier("from"), "from_");
        assert_eq!(python_identifier(""), "_param");
    }
}
