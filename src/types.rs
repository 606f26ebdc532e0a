/// Result types and response-shape contracts for the diagnostic probes
///
/// Each remote endpoint responds with a loosely specified JSON document.
/// Rather than poking at raw maps, every probe (and the report renderer)
/// reads the body through a typed view with optional fields; a body that
/// fails to match a view simply deserializes to the view's default, which
/// makes the pass predicate evaluate to false without special casing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DiagError;

/// Outcome of a single diagnostic probe.
///
/// One record is produced per probe execution, in the fixed run order.
/// `details` carries the status code and pretty-printed body for support
/// triage; `response_body` carries the parsed body (or an empty object when
/// the body was absent or malformed) for downstream rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Human-readable probe name, e.g. "Step 0: Validate License"
    pub name: String,

    /// Whether the probe's pass predicate held
    pub passed: bool,

    /// Formatted status/body summary, or the transport error message
    pub details: String,

    /// Parsed response body; empty object on transport failure or bad JSON
    pub response_body: Value,
}

impl TestResult {
    /// Result for a request that never produced an HTTP response.
    pub fn transport_failure(name: &str, error: &DiagError) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            details: error.to_string(),
            response_body: empty_body(),
        }
    }

    /// Result for a request that completed with a status code and body.
    pub fn completed(name: &str, passed: bool, status: u16, body: Value) -> Self {
        let pretty =
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        Self {
            name: name.to_string(),
            passed,
            details: format!("Status: {}, Response: {}", status, pretty),
            response_body: body,
        }
    }
}

/// The empty structured body used when no parseable response exists.
pub fn empty_body() -> Value {
    Value::Object(Map::new())
}

/// Parses a raw response body, falling back to an empty object.
///
/// Malformed JSON is not an error at this layer: the predicates evaluate
/// against the empty body and fail naturally.
pub fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| empty_body())
}

/// PHP-style `empty()` truthiness over a JSON value.
///
/// `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are falsy; everything
/// else is truthy. The remote service reports `success` as `true` or `1`
/// depending on the endpoint, so the predicates go through this helper.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// View over the `/auth/validate-license` response body.
#[derive(Debug, Default, Deserialize)]
pub struct LicenseValidationBody {
    /// "success" when the license is valid
    pub status: Option<String>,
    pub message: Option<String>,
}

/// View over the `/check-usage` response body.
#[derive(Debug, Default, Deserialize)]
pub struct UsageBody {
    /// Truthy on success; the service sends `true` or `1`
    pub success: Option<Value>,
    pub subscription: Option<Value>,
    pub usage_limit: Option<Value>,
    pub used_count: Option<Value>,
    pub remaining_count: Option<Value>,
    pub message: Option<String>,
}

/// View over the `/generate-meta` response bodies (subscriber and free trial).
#[derive(Debug, Default, Deserialize)]
pub struct GenerateMetaBody {
    pub success: Option<Value>,
    pub choices: Option<Vec<MetaChoice>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetaChoice {
    pub message: Option<MetaMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetaMessage {
    pub function_call: Option<MetaFunctionCall>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetaFunctionCall {
    /// Either a JSON object or a JSON-encoded string, depending on the
    /// upstream model provider
    pub arguments: Option<Value>,
}

/// View over error response bodies (non-2xx statuses).
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// The three metadata fields returned by the generate-meta function call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageMetadataFields {
    pub alt_text: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
}

/// Deserializes a body value into a typed view, defaulting on mismatch.
pub fn body_view<T: Default + for<'de> Deserialize<'de>>(body: &Value) -> T {
    serde_json::from_value(body.clone()).unwrap_or_default()
}

/// Extracts the generated metadata fields from a generate-meta response.
///
/// The `arguments` payload arrives either as an object or as a JSON string;
/// both forms are handled, anything else yields `None`.
pub fn extract_metadata_fields(body: &Value) -> Option<ImageMetadataFields> {
    let meta: GenerateMetaBody = body_view(body);
    let arguments = meta
        .choices?
        .into_iter()
        .next()?
        .message?
        .function_call?
        .arguments?;

    match arguments {
        Value::String(raw) => serde_json::from_str(&raw).ok(),
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}
