//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::validation::FieldErrors;
use crate::domain::{Error, LoginValidationError};

/// Message used for every request rejected by field validation.
pub(crate) const VALIDATION_FAILED: &str = "validation failed";

/// Turn collected field failures into a `400` payload listing each field.
pub(crate) fn invalid_fields(errors: &FieldErrors) -> Error {
    Error::invalid_request(VALIDATION_FAILED).with_details(errors.to_details())
}

/// Map blank login fields to a `400` payload in the same `fields` shape.
pub(crate) fn invalid_login(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "fields": [{ "field": field, "code": "blank", "message": err.to_string() }],
    }))
}
