//! Salon CRM library modules.
//!
//! Client visit records with derived follow-up ("retoque") dates, a capped
//! undo history, CSV export and an HTTP API over JSON flat files.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
