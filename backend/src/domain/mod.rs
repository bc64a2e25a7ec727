//! Domain primitives, services and ports.
//!
//! Purpose: model salon client records, derive follow-up dates, and keep the
//! bounded undo history. Types here are transport agnostic; adapters live
//! under `inbound` and `outbound`.
//!
//! Public surface:
//! - DomainError / ErrorCode: transport-neutral failure payload.
//! - ClientRecord and its value types: the stored visit.
//! - FollowUpPolicy: follow-up date derivation and due checks.
//! - UndoHistory: capped snapshot stack.
//! - RecordCommandService / RecordQueryService: driving port implementations.

pub mod error;
pub mod export;
pub mod follow_up;
pub mod ports;
pub mod record;
mod record_service;
pub mod trace_id;
pub mod undo;

pub use self::error::{DomainError, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::export::{EXPORT_FILE_NAME, ExportRow, RecordExport};
pub use self::follow_up::{
    DEFAULT_FOLLOW_UP_DAYS, DEFAULT_RETOUCH_DAYS, FollowUpPolicy, FollowUpState,
    FollowUpSummary, format_display_date, is_due, is_due_str, parse_service_date,
};
pub use self::record::{
    ClientName, ClientRecord, RecordDraft, RecordForm, RecordId, RecordValidationError,
    ServiceType,
};
pub use self::record_service::{RecordCommandService, RecordQueryService, RecordView};
pub use self::trace_id::TraceId;
pub use self::undo::{DEFAULT_UNDO_CAPACITY, RecordSnapshot, UndoHistory};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use salon_crm::domain::{ApiResult, DomainError};
///
/// fn handler() -> ApiResult<()> {
///     Err(DomainError::invalid_request("name required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, DomainError>;
