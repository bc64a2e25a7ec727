//! Driving port for record reads.

use async_trait::async_trait;

use crate::domain::{DomainError, FollowUpSummary, RecordExport, RecordView};

/// Filter applied when listing records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRecordsRequest {
    /// Case-insensitive substring matched against name, phone, service and
    /// comment. Blank means no filter.
    pub query: Option<String>,
}

/// Whether an undo is currently possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoStatus {
    /// Whether an undo would restore anything.
    pub can_undo: bool,
    /// Snapshots held.
    pub depth: usize,
}

/// Driving port for record reads. Reads never take the write gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// Records newest first, optionally filtered.
    async fn list(&self, request: ListRecordsRequest) -> Result<Vec<RecordView>, DomainError>;

    /// Nearest follow-up and due count across all records.
    async fn summary(&self) -> Result<FollowUpSummary, DomainError>;

    /// Export of the live record set, newest first.
    async fn export(&self) -> Result<RecordExport, DomainError>;

    /// How many undo steps are available.
    async fn undo_status(&self) -> Result<UndoStatus, DomainError>;
}
