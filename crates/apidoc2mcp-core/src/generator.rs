//! MCP service generation from normalized specs.
//!
//! The generator extracts a flat endpoint list from an OpenAPI document (or an
//! already-intermediate `{endpoints}` value), validates each endpoint for
//! completeness, and compiles the valid ones into callable tool descriptors
//! plus request-construction plans. Incomplete endpoints are never dropped
//! silently: each one is excluded together with a machine-derivable reason.
//!
//! `validate_endpoint` and `incompleteness_reason` run the same checks in the
//! same order; if one is changed the other must change with it.

// Internal imports (std, crate)
use std::collections::BTreeMap;

// External imports (alphabetized)
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::endpoint::{is_http_method, Endpoint, Parameter, RequestBody, ResponseSpec, HTTP_METHODS};

static PATH_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

/// Declarative schema of one tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// JSON-schema type of the value
    #[serde(rename = "type")]
    pub type_: String,

    /// Whether the caller must supply the parameter
    pub required: bool,

    /// Human description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One callable tool compiled from a valid endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Tool name; doubles as an identifier in emitted code
    pub name: String,

    /// Human description of what the tool does
    pub description: String,

    /// Parameter schemas keyed by name
    pub parameters: BTreeMap<String, ParameterSchema>,

    /// Schema of the success response, when one is declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<JsonValue>,
}

/// The compiled service definition serialized to `mcp-service.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedService {
    pub functions: Vec<FunctionDescriptor>,
}

/// Where a parameter goes when the request is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterPlacement {
    Path,
    Query,
    Body,
    Header,
}

/// One parameter slot in a request plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedParameter {
    pub name: String,
    pub placement: ParameterPlacement,
    /// Required parameters are guarded against absence only, so falsy values
    /// like `0` or `false` are still sent; optional ones are guarded by truth
    pub required: bool,
}

/// Request-construction plan for one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestPlan {
    /// Uppercase HTTP method
    pub method: String,

    /// URL template with `{name}` placeholders
    #[serde(rename = "urlTemplate")]
    pub url_template: String,

    /// Parameter placements
    #[serde(rename = "parameterPlacement")]
    pub parameters: Vec<PlannedParameter>,

    /// Whether the method may carry a request body at all
    pub sends_body: bool,

    /// Whether a carried body is JSON (form-encoded otherwise)
    pub json_body: bool,
}

/// An endpoint excluded from generation, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct IncompleteEndpoint {
    pub endpoint: Endpoint,
    pub reason: String,
}

/// Everything one generation pass produces.
#[derive(Debug, Clone)]
pub struct ServiceArtifacts {
    pub service: GeneratedService,
    /// Request plans keyed by tool name, in function order
    pub plans: Vec<(String, RequestPlan)>,
    pub incomplete: Vec<IncompleteEndpoint>,
}

/// Compiles a normalized spec into MCP tool definitions.
pub struct McpGenerator {
    api_data: JsonValue,
    endpoints: Vec<Endpoint>,
}

impl McpGenerator {
    /// Build a generator over a normalized spec (or an intermediate
    /// `{endpoints}` value, which is used verbatim).
    pub fn new(api_data: JsonValue) -> Self {
        let endpoints = extract_endpoints(&api_data);
        info!("extracted {} endpoint(s) from spec", endpoints.len());
        Self { api_data, endpoints }
    }

    /// The normalized spec this generator was built from
    pub fn api_data(&self) -> &JsonValue {
        &self.api_data
    }

    /// Extracted endpoints, valid or not
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Service title from the spec's info block
    pub fn title(&self) -> Option<&str> {
        self.api_data.pointer("/info/title").and_then(JsonValue::as_str)
    }

    /// Partition endpoints and compile the valid ones.
    pub fn generate(&self) -> ServiceArtifacts {
        let mut functions = Vec::new();
        let mut plans = Vec::new();
        let mut incomplete = Vec::new();

        for endpoint in &self.endpoints {
            if validate_endpoint(endpoint) {
                let function = create_function(endpoint);
                plans.push((function.name.clone(), create_plan(endpoint)));
                functions.push(function);
            } else {
                let reason = incompleteness_reason(endpoint);
                warn!(
                    "skipping incomplete endpoint {} {}: {}",
                    endpoint.method, endpoint.path, reason
                );
                incomplete.push(IncompleteEndpoint {
                    endpoint: endpoint.clone(),
                    reason,
                });
            }
        }

        ServiceArtifacts {
            service: GeneratedService { functions },
            plans,
            incomplete,
        }
    }
}

/// Extract the flat endpoint list from a normalized spec.
///
/// An `endpoints` array is returned verbatim; otherwise every HTTP-method key
/// on every path item becomes one endpoint. Request-body object properties
/// are additionally exploded into synthetic `body`-located parameters so body
/// fields are individually addressable as tool parameters.
pub fn extract_endpoints(api_data: &JsonValue) -> Vec<Endpoint> {
    if let Some(endpoints) = api_data.get("endpoints").and_then(JsonValue::as_array) {
        return endpoints
            .iter()
            .filter_map(|e| serde_json::from_value(e.clone()).ok())
            .collect();
    }

    let Some(paths) = api_data.get("paths").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for (path, path_item) in paths {
        for method in HTTP_METHODS {
            let Some(operation) = path_item.get(method).and_then(JsonValue::as_object) else {
                continue;
            };

            let mut parameters: Vec<Parameter> = operation
                .get("parameters")
                .and_then(JsonValue::as_array)
                .map(|params| {
                    params
                        .iter()
                        .map(|p| Parameter {
                            name: text(p, "name"),
                            in_: text(p, "in"),
                            description: p
                                .get("description")
                                .and_then(JsonValue::as_str)
                                .map(String::from),
                            required: p
                                .get("required")
                                .and_then(JsonValue::as_bool)
                                .unwrap_or(false),
                            schema: Some(
                                p.get("schema").cloned().unwrap_or_else(|| json!({"type": "string"})),
                            ),
                        })
                        .collect()
                })
                .unwrap_or_default();

            let request_body = flatten_request_body(operation);
            if let Some(body) = &request_body {
                explode_body_properties(body, &mut parameters);
            }

            endpoints.push(Endpoint {
                path: path.clone(),
                method: method.to_string(),
                operation_id: operation
                    .get("operationId")
                    .and_then(JsonValue::as_str)
                    .filter(|id| !id.is_empty())
                    .map(String::from),
                summary: operation
                    .get("summary")
                    .and_then(JsonValue::as_str)
                    .map(String::from),
                description: operation
                    .get("description")
                    .and_then(JsonValue::as_str)
                    .map(String::from),
                parameters,
                request_body,
                responses: flatten_responses(operation),
            });
        }
    }

    endpoints
}

fn text(value: &JsonValue, field: &str) -> String {
    value
        .get(field)
        .and_then(JsonValue::as_str)
        .unwrap_or("")
        .to_string()
}

/// Flatten `requestBody` to its first content type.
fn flatten_request_body(operation: &serde_json::Map<String, JsonValue>) -> Option<RequestBody> {
    let request_body = operation.get("requestBody")?;
    let content = request_body.get("content").and_then(JsonValue::as_object);
    let (content_type, schema) = content
        .and_then(|c| c.iter().next())
        .map(|(ct, media)| {
            (
                ct.clone(),
                media.get("schema").cloned().unwrap_or_else(|| json!({})),
            )
        })
        .unwrap_or_else(|| ("application/json".to_string(), json!({})));

    Some(RequestBody {
        content_type,
        required: request_body
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        schema,
    })
}

/// Turn an object body's properties into synthetic `body` parameters.
fn explode_body_properties(body: &RequestBody, parameters: &mut Vec<Parameter>) {
    if body.schema.get("type").and_then(JsonValue::as_str) != Some("object") {
        return;
    }
    let Some(properties) = body.schema.get("properties").and_then(JsonValue::as_object) else {
        return;
    };

    let required_props: Vec<&str> = body
        .schema
        .get("required")
        .and_then(JsonValue::as_array)
        .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
        .unwrap_or_default();

    for (name, schema) in properties {
        parameters.push(Parameter {
            name: name.clone(),
            in_: "body".to_string(),
            description: schema
                .get("description")
                .and_then(JsonValue::as_str)
                .map(String::from),
            required: required_props.contains(&name.as_str()),
            schema: Some(schema.clone()),
        });
    }
}

fn flatten_responses(operation: &serde_json::Map<String, JsonValue>) -> Vec<ResponseSpec> {
    let Some(responses) = operation.get("responses").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    responses
        .iter()
        .map(|(status_code, response)| {
            let content = response.get("content").and_then(JsonValue::as_object);
            let (content_type, schema) = content
                .and_then(|c| c.iter().next())
                .map(|(ct, media)| {
                    (
                        ct.clone(),
                        media.get("schema").cloned().unwrap_or_else(|| json!({})),
                    )
                })
                .unwrap_or_else(|| (String::new(), json!({})));

            ResponseSpec {
                status_code: status_code.clone(),
                description: text(response, "description"),
                content_type,
                schema,
            }
        })
        .collect()
}

/// Whether an endpoint carries enough information to compile.
///
/// The operation-id condition is effectively always satisfied when the path
/// is present (ids are derivable from method + path), but it is checked
/// independently so future id-inference changes cannot silently bypass path
/// validation.
pub fn validate_endpoint(endpoint: &Endpoint) -> bool {
    if endpoint.path.is_empty() {
        return false;
    }
    if !is_http_method(&endpoint.method) {
        return false;
    }
    if endpoint.operation_id.is_none() && endpoint.path.is_empty() {
        return false;
    }
    endpoint
        .parameters
        .iter()
        .all(|p| !p.name.is_empty() && !p.in_.is_empty())
}

/// Human reason for the first failing completeness check.
///
/// Mirrors [`validate_endpoint`]'s predicate order exactly; divergence between
/// the two is a defect.
pub fn incompleteness_reason(endpoint: &Endpoint) -> String {
    if endpoint.path.is_empty() {
        return "Missing API path".to_string();
    }
    if !is_http_method(&endpoint.method) {
        return "Missing or invalid HTTP method".to_string();
    }
    if endpoint.operation_id.is_none() && endpoint.path.is_empty() {
        return "Missing operation identifier".to_string();
    }
    if endpoint
        .parameters
        .iter()
        .any(|p| p.name.is_empty() || p.in_.is_empty())
    {
        return "Invalid parameter definition (missing name or location)".to_string();
    }
    "Unknown".to_string()
}

/// Derive a tool name from method + path.
///
/// `{param}` segments are stripped, remaining segments are capitalized and
/// appended to the lowercased method; a path with no remaining segments
/// yields `{method}Root`. Pure and deterministic: the result doubles as an
/// identifier in emitted code.
pub fn generate_operation_id(endpoint: &Endpoint) -> String {
    let method = endpoint.method.to_lowercase();
    let mut id = method.clone();
    let mut appended = false;

    for segment in endpoint.path.split('/') {
        if segment.is_empty() || (segment.starts_with('{') && segment.ends_with('}')) {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            id.push_str(&first.to_uppercase().to_string());
            id.push_str(chars.as_str());
            appended = true;
        }
    }

    if appended {
        id
    } else {
        format!("{method}Root")
    }
}

/// Map a JSON-schema type onto the tool parameter type vocabulary.
fn schema_type(schema: &JsonValue) -> String {
    let declared = schema
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or("string");
    match declared {
        "integer" | "number" => "number",
        "boolean" => "boolean",
        "array" => "array",
        "object" => "object",
        "string" | "file" | "binary" => "string",
        _ => "string",
    }
    .to_string()
}

/// Build the merged parameter schema map for one endpoint.
///
/// Merge order, later overwriting earlier on name collision (last-writer-wins
/// by design, collisions are not reported):
/// 1. path parameters from `{name}` tokens in the URL template, enriched from
///    a same-named declared path parameter when one exists, `required` always
///    forced true;
/// 2. declared parameters that are not `path`-located, skipping `body` ones
///    when a request body exists (those are covered by step 3);
/// 3. request-body object properties, `required` taken from membership in the
///    schema's `required` list.
pub fn build_parameter_map(endpoint: &Endpoint) -> BTreeMap<String, ParameterSchema> {
    let mut map = BTreeMap::new();

    for caps in PATH_PARAM_RE.captures_iter(&endpoint.path) {
        let name = caps[1].to_string();
        let declared = endpoint
            .parameters
            .iter()
            .find(|p| p.in_ == "path" && p.name == name);
        map.insert(
            name,
            ParameterSchema {
                type_: declared
                    .map(|p| schema_type(&p.schema_or_default()))
                    .unwrap_or_else(|| "string".to_string()),
                required: true,
                description: declared.and_then(|p| p.description.clone()),
            },
        );
    }

    for param in &endpoint.parameters {
        if param.in_ == "path" {
            continue;
        }
        if param.in_ == "body" && endpoint.request_body.is_some() {
            continue;
        }
        map.insert(
            param.name.clone(),
            ParameterSchema {
                type_: schema_type(&param.schema_or_default()),
                required: param.required,
                description: param.description.clone(),
            },
        );
    }

    if let Some(body) = &endpoint.request_body {
        if let Some(properties) = body.schema.get("properties").and_then(JsonValue::as_object) {
            let required_props: Vec<&str> = body
                .schema
                .get("required")
                .and_then(JsonValue::as_array)
                .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
                .unwrap_or_default();

            for (name, schema) in properties {
                map.insert(
                    name.clone(),
                    ParameterSchema {
                        type_: schema_type(schema),
                        required: required_props.contains(&name.as_str()),
                        description: schema
                            .get("description")
                            .and_then(JsonValue::as_str)
                            .map(String::from),
                    },
                );
            }
        }
    }

    map
}

/// Compile one valid endpoint into a tool descriptor.
fn create_function(endpoint: &Endpoint) -> FunctionDescriptor {
    let name = endpoint
        .operation_id
        .clone()
        .unwrap_or_else(|| generate_operation_id(endpoint));

    let description = endpoint
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .or_else(|| endpoint.summary.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| format!("{} {}", endpoint.method.to_uppercase(), endpoint.path));

    // First 2xx response wins; otherwise the first declared one
    let response = endpoint
        .responses
        .iter()
        .find(|r| r.status_code.starts_with('2'))
        .or_else(|| endpoint.responses.first())
        .map(|r| r.schema.clone());

    FunctionDescriptor {
        name,
        description,
        parameters: build_parameter_map(endpoint),
        response,
    }
}

/// Build the request-construction plan for one valid endpoint.
fn create_plan(endpoint: &Endpoint) -> RequestPlan {
    let method = endpoint.method.to_uppercase();
    // GET and DELETE never attach a body
    let sends_body = matches!(method.as_str(), "POST" | "PUT" | "PATCH");
    let json_body = endpoint
        .request_body
        .as_ref()
        .map(|b| b.content_type.contains("application/json"))
        .unwrap_or(true);

    // Slots must mirror build_parameter_map's sources exactly: every planned
    // name is a function argument in the emitted stub, so a slot the map does
    // not produce would reference an undefined identifier.
    let mut parameters = Vec::new();
    for caps in PATH_PARAM_RE.captures_iter(&endpoint.path) {
        parameters.push(PlannedParameter {
            name: caps[1].to_string(),
            placement: ParameterPlacement::Path,
            required: true,
        });
    }

    for param in &endpoint.parameters {
        let placement = match param.in_.as_str() {
            "path" => continue, // path slots come from the URL template
            "query" => ParameterPlacement::Query,
            "header" => ParameterPlacement::Header,
            "body" => ParameterPlacement::Body,
            _ => ParameterPlacement::Query,
        };
        if placement == ParameterPlacement::Body
            && (!sends_body || endpoint.request_body.is_some())
        {
            continue;
        }
        parameters.push(PlannedParameter {
            name: param.name.clone(),
            placement,
            required: param.required,
        });
    }

    if sends_body {
        if let Some(body) = &endpoint.request_body {
            if let Some(properties) = body.schema.get("properties").and_then(JsonValue::as_object)
            {
                let required_props: Vec<&str> = body
                    .schema
                    .get("required")
                    .and_then(JsonValue::as_array)
                    .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
                    .unwrap_or_default();
                for name in properties.keys() {
                    parameters.push(PlannedParameter {
                        name: name.clone(),
                        placement: ParameterPlacement::Body,
                        required: required_props.contains(&name.as_str()),
                    });
                }
            }
        }
    }

    RequestPlan {
        method,
        url_template: endpoint.path.clone(),
        parameters,
        sends_body,
        json_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(method: &str, path: &str) -> Endpoint {
        Endpoint {
            path: path.to_string(),
            method: method.to_string(),
            ..Endpoint::default()
        }
    }

    #[test]
    fn test_generate_operation_id() {
        assert_eq!(generate_operation_id(&endpoint("get", "/users/{id}")), "getUsers");
        assert_eq!(
            generate_operation_id(&endpoint("post", "/users/{id}/orders")),
            "postUsersOrders"
        );
        assert_eq!(generate_operation_id(&endpoint("get", "/")), "getRoot");
        assert_eq!(generate_operation_id(&endpoint("DELETE", "/{id}")), "deleteRoot");
    }

    #[test]
    fn test_generate_operation_id_is_deterministic() {
        let e = endpoint("get", "/users/{id}");
        assert_eq!(generate_operation_id(&e), generate_operation_id(&e));
    }

    #[test]
    fn test_validate_and_reason_agree() {
        let cases = vec![
            endpoint("get", ""),
            endpoint("fetch", "/x"),
            Endpoint {
                parameters: vec![Parameter {
                    name: "q".to_string(),
                    in_: String::new(),
                    ..Parameter::default()
                }],
                ..endpoint("get", "/x")
            },
        ];
        for e in cases {
            assert!(!validate_endpoint(&e));
            let reason = incompleteness_reason(&e);
            assert_ne!(reason, "Unknown");
            // Stable across repeated calls
            assert_eq!(reason, incompleteness_reason(&e));
        }
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(incompleteness_reason(&endpoint("get", "")), "Missing API path");
        assert_eq!(
            incompleteness_reason(&endpoint("fetch", "/x")),
            "Missing or invalid HTTP method"
        );
        let bad_param = Endpoint {
            parameters: vec![Parameter {
                name: String::new(),
                in_: "query".to_string(),
                ..Parameter::default()
            }],
            ..endpoint("get", "/x")
        };
        assert_eq!(
            incompleteness_reason(&bad_param),
            "Invalid parameter definition (missing name or location)"
        );
        assert_eq!(incompleteness_reason(&endpoint("get", "/ok")), "Unknown");
    }

    #[test]
    fn test_extract_endpoints_verbatim_intermediate() {
        let data = json!({"endpoints": [{"path": "/a", "method": "get"}]});
        let endpoints = extract_endpoints(&data);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/a");
    }

    #[test]
    fn test_extract_explodes_body_properties() {
        let data = json!({
            "paths": {
                "/orders": {
                    "post": {
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {
                                "type": "object",
                                "properties": {"qty": {"type": "integer"}},
                                "required": ["qty"],
                            }}},
                        },
                        "responses": {},
                    }
                }
            }
        });

        let endpoints = extract_endpoints(&data);
        assert_eq!(endpoints.len(), 1);
        let body_params: Vec<_> = endpoints[0]
            .parameters
            .iter()
            .filter(|p| p.in_ == "body")
            .collect();
        assert_eq!(body_params.len(), 1);
        assert_eq!(body_params[0].name, "qty");
        assert!(body_params[0].required);
    }

    #[test]
    fn test_parameter_map_scenario_path_param() {
        // GET /users/{id} with a declared integer path parameter
        let e = Endpoint {
            parameters: vec![Parameter {
                name: "id".to_string(),
                in_: "path".to_string(),
                required: true,
                schema: Some(json!({"type": "integer"})),
                ..Parameter::default()
            }],
            ..endpoint("get", "/users/{id}")
        };

        let map = build_parameter_map(&e);
        assert_eq!(
            map.get("id"),
            Some(&ParameterSchema {
                type_: "number".to_string(),
                required: true,
                description: None,
            })
        );
    }

    #[test]
    fn test_parameter_map_undeclared_token_defaults_to_string() {
        let map = build_parameter_map(&endpoint("get", "/users/{id}"));
        let id = map.get("id").unwrap();
        assert_eq!(id.type_, "string");
        assert!(id.required);
    }

    #[test]
    fn test_parameter_map_body_properties_win_collisions() {
        let e = Endpoint {
            parameters: vec![Parameter {
                name: "qty".to_string(),
                in_: "query".to_string(),
                required: false,
                schema: Some(json!({"type": "string"})),
                ..Parameter::default()
            }],
            request_body: Some(RequestBody {
                content_type: "application/json".to_string(),
                required: true,
                schema: json!({
                    "type": "object",
                    "properties": {"qty": {"type": "integer"}},
                    "required": ["qty"],
                }),
            }),
            ..endpoint("post", "/orders")
        };

        let map = build_parameter_map(&e);
        let qty = map.get("qty").unwrap();
        assert_eq!(qty.type_, "number");
        assert!(qty.required);
    }

    #[test]
    fn test_declared_body_param_skipped_when_request_body_exists() {
        let e = Endpoint {
            parameters: vec![Parameter {
                name: "whole".to_string(),
                in_: "body".to_string(),
                schema: Some(json!({"type": "object"})),
                ..Parameter::default()
            }],
            request_body: Some(RequestBody {
                content_type: "application/json".to_string(),
                required: false,
                schema: json!({"type": "object"}),
            }),
            ..endpoint("post", "/orders")
        };
        // No properties on the body schema and the declared body param is
        // suppressed, so the map is empty
        assert!(build_parameter_map(&e).is_empty());
    }

    #[test]
    fn test_generate_partitions_endpoints() {
        let spec = json!({
            "openapi": "3.0.0",
            "info": {"title": "T", "version": "1"},
            "paths": {
                "/users/{id}": {
                    "get": {
                        "parameters": [
                            {"name": "id", "in": "path", "required": true,
                             "schema": {"type": "integer"}}
                        ],
                        "responses": {"200": {"description": "ok"}},
                    }
                },
                "/broken": {
                    "get": {
                        "parameters": [{"name": "q"}],
                        "responses": {},
                    }
                }
            }
        });

        let artifacts = McpGenerator::new(spec).generate();
        assert_eq!(artifacts.service.functions.len(), 1);
        assert_eq!(artifacts.service.functions[0].name, "getUsers");
        assert_eq!(artifacts.incomplete.len(), 1);
        assert_eq!(
            artifacts.incomplete[0].reason,
            "Invalid parameter definition (missing name or location)"
        );
    }

    #[test]
    fn test_function_description_fallback() {
        let spec = json!({
            "paths": {"/ping": {"get": {"responses": {}}}}
        });
        let artifacts = McpGenerator::new(spec).generate();
        assert_eq!(artifacts.service.functions[0].description, "GET /ping");
    }

    #[test]
    fn test_response_prefers_first_2xx() {
        let e = Endpoint {
            responses: vec![
                ResponseSpec {
                    status_code: "404".to_string(),
                    schema: json!({"type": "string"}),
                    ..ResponseSpec::default()
                },
                ResponseSpec {
                    status_code: "200".to_string(),
                    schema: json!({"type": "object"}),
                    ..ResponseSpec::default()
                },
            ],
            ..endpoint("get", "/x")
        };
        let function = create_function(&e);
        assert_eq!(function.response, Some(json!({"type": "object"})));
    }

    #[test]
    fn test_plan_get_never_sends_body() {
        let e = Endpoint {
            parameters: vec![Parameter {
                name: "stray".to_string(),
                in_: "body".to_string(),
                ..Parameter::default()
            }],
            ..endpoint("get", "/things")
        };
        let plan = create_plan(&e);
        assert!(!plan.sends_body);
        assert!(plan.parameters.is_empty());
    }

    #[test]
    fn test_plan_body_slots_match_parameter_map() {
        // A declared body parameter alongside a request body must not become
        // a plan slot; the body schema's properties are the slots
        let e = Endpoint {
            parameters: vec![Parameter {
                name: "payload".to_string(),
                in_: "body".to_string(),
                required: true,
                schema: Some(json!({"type": "object"})),
                ..Parameter::default()
            }],
            request_body: Some(RequestBody {
                content_type: "application/json".to_string(),
                required: true,
                schema: json!({
                    "type": "object",
                    "properties": {"qty": {"type": "integer"}},
                    "required": ["qty"],
                }),
            }),
            ..endpoint("post", "/orders")
        };

        let plan = create_plan(&e);
        let body_slots: Vec<&str> = plan
            .parameters
            .iter()
            .filter(|p| p.placement == ParameterPlacement::Body)
            .map(|p| p.name.as_str())
            .collect();
        let map = build_parameter_map(&e);
        let map_names: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(body_slots, vec!["qty"]);
        assert_eq!(body_slots, map_names);
    }

    #[test]
    fn test_plan_placements() {
        let e = Endpoint {
            parameters: vec![
                Parameter {
                    name: "id".to_string(),
                    in_: "path".to_string(),
                    required: true,
                    ..Parameter::default()
                },
                Parameter {
                    name: "verbose".to_string(),
                    in_: "query".to_string(),
                    ..Parameter::default()
                },
                Parameter {
                    name: "qty".to_string(),
                    in_: "body".to_string(),
                    required: true,
                    ..Parameter::default()
                },
            ],
            ..endpoint("post", "/orders/{id}")
        };

        let plan = create_plan(&e);
        assert_eq!(plan.method, "POST");
        assert!(plan.sends_body);
        let placements: Vec<_> = plan
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.placement))
            .collect();
        assert_eq!(
            placements,
            vec![
                ("id", ParameterPlacement::Path),
                ("verbose", ParameterPlacement::Query),
                ("qty", ParameterPlacement::Body),
            ]
        );
    }
}
