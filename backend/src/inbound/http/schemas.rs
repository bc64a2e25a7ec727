//! OpenAPI shapes for domain values that travel over the wire.
//!
//! The domain error and service enum carry no utoipa derives. The types here
//! describe how they serialise: the error body every endpoint can return, the
//! `details` object attached to a rejected save, and the service labels
//! accepted by the record form.

use utoipa::ToSchema;

/// Failure category carried in every error body.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The record form or request was rejected; see `details`.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The data directory could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The data files could not be read or written; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error body returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = crate::domain::DomainError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Failure category.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Message shown to the front desk, in the salon's wording.
    #[schema(example = "name required")]
    message: String,
    /// Same value as the `trace-id` response header.
    #[schema(rename = "traceId", example = "6a1f0c7e-2b1d-4c55-9d3e-0f8b7a6c5d4e")]
    trace_id: Option<String>,
    /// Which input was rejected, for `invalid_request` only.
    details: Option<ErrorDetailsSchema>,
}

/// Offending input behind an `invalid_request` error.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorDetailsSchema {
    /// Wire name of the rejected field; absent for malformed bodies.
    #[schema(example = "serviceDate")]
    field: Option<String>,
    /// Machine-readable reason, such as `name_required`, `invalid_date`,
    /// `unknown_service` or `malformed_body`.
    #[schema(example = "invalid_date")]
    code: String,
}

/// Services the salon records, by stored label.
#[derive(ToSchema)]
#[schema(as = crate::domain::ServiceType)]
pub enum ServiceTypeSchema {
    /// Eyebrows.
    #[schema(rename = "CEJAS")]
    Eyebrows,
    /// Eyeliner.
    #[schema(rename = "DELINEADO DE OJOS")]
    Eyeliner,
    /// Lips.
    #[schema(rename = "LABIOS")]
    Lips,
    /// Hyaluronic acid.
    #[schema(rename = "ACIDO HIALURONICO")]
    HyaluronicAcid,
    /// Biostimulators.
    #[schema(rename = "BIOESTIMULADORES")]
    Biostimulators,
    /// Touch-up visit, followed up a year later by default.
    #[schema(rename = "RETOQUE")]
    Retouch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    use crate::domain::ServiceType;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_is_named_after_the_domain_error() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.DomainError");
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("details"));
    }

    #[rstest]
    fn error_codes_match_the_wire_names() {
        let json = schema_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "service_unavailable", "internal_error"] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn details_describe_field_and_code() {
        let json = schema_json::<ErrorDetailsSchema>();
        assert!(json.contains("\"field\""));
        assert!(json.contains("\"code\""));
    }

    #[rstest]
    fn service_schema_lists_every_label() {
        assert_eq!(ServiceTypeSchema::name(), "crate.domain.ServiceType");
        let json = schema_json::<ServiceTypeSchema>();
        for service in ServiceType::ALL {
            assert!(json.contains(service.label()), "missing {service}");
        }
    }
}
