//! Turns [`DomainError`] into the JSON error body of the records API.
//!
//! Rejected record forms come back verbatim with their `details`. A missing
//! data directory is reported as 503 with a `Retry-After` hint, since the
//! front desk usually only has to wait for a network share to come back.
//! Anything else is logged with its full message and answered with a generic
//! one, keeping file paths out of the browser.

use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{DomainError, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Message sent in place of internal failure detail.
pub(crate) const INTERNAL_MESSAGE: &str = "Internal server error";

/// Seconds the client should wait before retrying an unavailable store.
pub(crate) const RETRY_AFTER_SECS: u32 = 5;

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client for `error`.
fn client_body(error: &DomainError) -> DomainError {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let generic = DomainError::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id.to_owned()),
        None => generic,
    }
}

fn log_failure(error: &DomainError) {
    match error.code() {
        ErrorCode::InvalidRequest => {}
        ErrorCode::ServiceUnavailable => {
            warn!(error = %error, trace_id = ?error.trace_id(), "record store unavailable");
        }
        ErrorCode::InternalError => {
            error!(error = %error, trace_id = ?error.trace_id(), "request failed");
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_failure(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::ServiceUnavailable {
            builder.insert_header((RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS)));
        }
        builder.json(client_body(self))
    }
}

impl From<actix_web::Error> for DomainError {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}
