//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the record and health endpoints together with the
//! wire shapes from [`crate::inbound::http::schemas`], which keep domain
//! types free of utoipa derives.
//!
//! The generated document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorDetailsSchema, ErrorSchema, ServiceTypeSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon CRM API",
        description = "Client records, follow-up tracking, CSV export and undo history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::save_record,
        crate::inbound::http::records::delete_record,
        crate::inbound::http::records::set_reminder,
        crate::inbound::http::records::undo,
        crate::inbound::http::records::undo_status,
        crate::inbound::http::records::summary,
        crate::inbound::http::records::export_records,
        crate::inbound::http::records::list_services,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema, ErrorDetailsSchema, ServiceTypeSchema)),
    tags(
        (name = "records", description = "Client records and follow-ups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.DomainError";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn openapi_error_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        for field in ["code", "message", "traceId", "details"] {
            assert_object_schema_has_field(error_schema, field);
        }
    }

    #[rstest]
    #[case("/api/v1/records")]
    #[case("/api/v1/records/{id}")]
    #[case("/api/v1/records/{id}/reminder")]
    #[case("/api/v1/records/undo")]
    #[case("/api/v1/records/summary")]
    #[case("/api/v1/records/export")]
    #[case("/api/v1/services")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn openapi_registers_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
