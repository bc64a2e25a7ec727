//! Shared validation helpers for inbound HTTP adapters.

use actix_web::web;
use serde_json::json;

use crate::domain::{DomainError, RecordId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> DomainError {
    DomainError::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> DomainError {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Parse a record id taken from the request path.
pub(crate) fn parse_record_id(value: &str) -> Result<RecordId, DomainError> {
    RecordId::new(value).map_err(|err| {
        field_error(FieldName::new("id"), ErrorCode::InvalidId, err.to_string())
    })
}

/// JSON extractor configuration reporting malformed bodies as domain errors.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        DomainError::invalid_request(format!("malformed JSON body: {err}"))
            .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
            .into()
    })
}

/// Query-string extractor configuration reporting malformed queries as domain
/// errors.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        DomainError::invalid_request(format!("malformed query string: {err}"))
            .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
            .into()
    })
}
