//! Driving port for record mutations.
//!
//! Every mutation captures the record set into the undo history before it
//! writes, so each successful call can be reverted with [`RecordsCommand::undo`].

use async_trait::async_trait;

use crate::domain::{DomainError, RecordForm, RecordId, RecordView};

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoOutcome {
    /// Whether a snapshot was restored.
    pub restored: bool,
    /// Snapshots left after the call.
    pub remaining: usize,
}

/// Driving port for record mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Create or update a record from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidRequest`] when the form does
    /// not validate, in which case nothing is written.
    async fn save(&self, form: RecordForm) -> Result<RecordView, DomainError>;

    /// Delete a record. Unknown ids succeed and still add an undo step.
    async fn delete(&self, id: &RecordId) -> Result<(), DomainError>;

    /// Set the reminder flag. Every call adds an undo step, even when
    /// nothing changes.
    async fn set_reminder(&self, id: &RecordId, sent: bool) -> Result<(), DomainError>;

    /// Restore the most recent snapshot, if any.
    async fn undo(&self) -> Result<UndoOutcome, DomainError>;
}
