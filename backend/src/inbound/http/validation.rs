//! Request validation helpers shared by the HTTP handlers.
//!
//! Every rejected request becomes `400 invalid_request` with details
//! `{field, code}` so clients can point at the offending input.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{Error, FieldViolation};

const MISSING_FIELD: &str = "missing_field";
const INVALID_BODY: &str = "invalid_body";
const INVALID_ID: &str = "invalid_id";

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Translate a draft validation failure.
pub(crate) fn violation_error(violation: FieldViolation) -> Error {
    field_error(violation.field(), violation.kind().code(), violation.to_string())
}

/// Unwrap a required body field or report it missing.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| {
        field_error(
            field,
            MISSING_FIELD,
            format!("missing required field: {field}"),
        )
    })
}

/// Validate a raw identifier with one of the domain id constructors.
pub(crate) fn parse_id<T>(
    raw: i32,
    ctor: fn(i32) -> Result<T, FieldViolation>,
) -> Result<T, Error> {
    ctor(raw).map_err(violation_error)
}

/// Field named by a serde "missing field `x`" message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let mapped = match missing_field_name(&message) {
        Some(field) => field_error(
            field,
            MISSING_FIELD,
            format!("missing required field: {field}"),
        ),
        None => field_error("body", INVALID_BODY, "request body is not valid JSON for this action"),
    };
    mapped.into()
}

fn path_error(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    field_error("id", INVALID_ID, "id must be a positive integer").into()
}

/// JSON extractor settings answering malformed bodies with `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path extractor settings answering malformed ids with `400`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}
