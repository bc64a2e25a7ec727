//! Record domain services.
//!
//! [`RecordCommandService`] implements the mutation port. Each mutation takes
//! the write gate, reads the pre-state, pushes it onto the undo stack and then
//! writes. [`RecordQueryService`] implements the read port and never takes the
//! gate.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ListRecordsRequest, RecordRepository, RecordRepositoryError, RecordsCommand, RecordsQuery,
    UndoOutcome, UndoStack, UndoStatus,
};
use crate::domain::{
    ClientRecord, DomainError, FollowUpPolicy, FollowUpSummary, RecordDraft, RecordExport,
    RecordForm, RecordId, RecordSnapshot, RecordValidationError, is_due,
};

/// A record together with its derived follow-up state as of today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    /// The stored record.
    pub record: ClientRecord,
    /// Effective follow-up date.
    pub follow_up_date: NaiveDate,
    /// Follow-up is today or earlier.
    pub due: bool,
}

impl RecordView {
    /// Derive the follow-up state of `record` as of `today`.
    #[must_use]
    pub fn new(record: ClientRecord, policy: &FollowUpPolicy, today: NaiveDate) -> Self {
        let follow_up_date = policy.for_record(&record);
        Self {
            record,
            follow_up_date,
            due: is_due(follow_up_date, today),
        }
    }
}

fn map_validation_error(error: &RecordValidationError) -> DomainError {
    DomainError::invalid_request(error.to_string())
        .with_details(json!({ "field": error.field(), "code": error.code() }))
}

fn local_today(clock: &dyn Clock) -> NaiveDate {
    clock.local().date_naive()
}

/// Service implementing [`RecordsCommand`].
#[derive(Clone)]
pub struct RecordCommandService<R, U> {
    records: Arc<R>,
    undo: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: FollowUpPolicy,
    write_gate: Arc<Mutex<()>>,
}

impl<R, U> RecordCommandService<R, U> {
    /// Service over the given stores, with its own write gate.
    #[must_use]
    pub fn new(
        records: Arc<R>,
        undo: Arc<U>,
        clock: Arc<dyn Clock>,
        policy: FollowUpPolicy,
    ) -> Self {
        Self {
            records,
            undo,
            clock,
            policy,
            write_gate: Arc::new(Mutex::new(())),
        }
    }
}

impl<R, U> RecordCommandService<R, U>
where
    R: RecordRepository,
    U: UndoStack,
{
    async fn load(&self) -> Result<RecordSnapshot, DomainError> {
        self.records.list().await.map_err(DomainError::from)
    }

    /// Push the pre-state, run `write`, and retract the push if the write
    /// fails so history is left as it was.
    async fn write_with_snapshot<F, Fut>(
        &self,
        before: RecordSnapshot,
        write: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<(), RecordRepositoryError>> + Send,
    {
        let pushed = self.push_snapshot(before).await;
        if let Err(error) = write().await {
            if let Some(evicted) = pushed {
                self.retract_snapshot(evicted).await;
            }
            return Err(DomainError::from(error));
        }
        Ok(())
    }

    /// Record history on a best-effort basis. Returns the entries the push
    /// evicted, or `None` when the push did not land.
    async fn push_snapshot(&self, snapshot: RecordSnapshot) -> Option<Vec<RecordSnapshot>> {
        self.undo
            .push(snapshot)
            .await
            .inspect_err(|error| {
                warn!(%error, "failed to record undo snapshot; continuing without history");
            })
            .ok()
    }

    async fn retract_snapshot(&self, evicted: Vec<RecordSnapshot>) {
        if let Err(error) = self.undo.retract(evicted).await {
            warn!(%error, "failed to retract undo snapshot after write failure");
        }
    }
}

#[async_trait]
impl<R, U> RecordsCommand for RecordCommandService<R, U>
where
    R: RecordRepository,
    U: UndoStack,
{
    async fn save(&self, form: RecordForm) -> Result<RecordView, DomainError> {
        let draft = RecordDraft::parse(form).map_err(|error| map_validation_error(&error))?;

        let _guard = self.write_gate.lock().await;
        let before = self.load().await?;
        let existing = draft
            .id
            .as_ref()
            .and_then(|id| before.iter().find(|record| &record.id == id))
            .cloned();
        let record = match existing {
            Some(mut record) => {
                record.apply_draft(draft);
                record
            }
            None => {
                let id = draft.id.clone().unwrap_or_else(RecordId::random);
                ClientRecord::from_draft(draft, id, self.clock.utc())
            }
        };

        self.write_with_snapshot(before, || self.records.upsert(&record))
            .await?;
        info!(record_id = %record.id, service = %record.service_type, "record saved");

        Ok(RecordView::new(
            record,
            &self.policy,
            local_today(self.clock.as_ref()),
        ))
    }

    async fn delete(&self, id: &RecordId) -> Result<(), DomainError> {
        let _guard = self.write_gate.lock().await;
        let before = self.load().await?;
        let present = before.iter().any(|record| &record.id == id);

        self.write_with_snapshot(before, || self.records.delete(id))
            .await?;
        if present {
            info!(record_id = %id, "record deleted");
        } else {
            debug!(record_id = %id, "delete of unknown record left the set unchanged");
        }
        Ok(())
    }

    async fn set_reminder(&self, id: &RecordId, sent: bool) -> Result<(), DomainError> {
        let _guard = self.write_gate.lock().await;
        let before = self.load().await?;
        let present = before.iter().any(|record| &record.id == id);

        self.write_with_snapshot(before, || self.records.set_reminder(id, sent))
            .await?;
        if present {
            info!(record_id = %id, reminder_sent = sent, "reminder flag updated");
        } else {
            debug!(record_id = %id, "reminder update for unknown record left the set unchanged");
        }
        Ok(())
    }

    async fn undo(&self) -> Result<UndoOutcome, DomainError> {
        let _guard = self.write_gate.lock().await;
        let Some(snapshot) = self.undo.pop().await.map_err(DomainError::from)? else {
            return Ok(UndoOutcome {
                restored: false,
                remaining: 0,
            });
        };

        if let Err(error) = self.records.replace_all(&snapshot).await {
            if let Err(push_error) = self.undo.push(snapshot).await {
                warn!(error = %push_error, "failed to return snapshot to undo history");
            }
            return Err(DomainError::from(error));
        }

        let remaining = self.undo.depth().await.unwrap_or_else(|error| {
            warn!(%error, "failed to read undo depth after restore");
            0
        });
        info!(remaining, "record set restored from undo history");
        Ok(UndoOutcome {
            restored: true,
            remaining,
        })
    }
}

/// Service implementing [`RecordsQuery`].
#[derive(Clone)]
pub struct RecordQueryService<R, U> {
    records: Arc<R>,
    undo: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: FollowUpPolicy,
}

impl<R, U> RecordQueryService<R, U> {
    /// Service over the given stores.
    #[must_use]
    pub fn new(
        records: Arc<R>,
        undo: Arc<U>,
        clock: Arc<dyn Clock>,
        policy: FollowUpPolicy,
    ) -> Self {
        Self {
            records,
            undo,
            clock,
            policy,
        }
    }
}

impl<R, U> RecordQueryService<R, U>
where
    R: RecordRepository,
{
    /// Records ordered newest first; rows without a creation time keep their
    /// stored order after the rest.
    async fn newest_first(&self) -> Result<Vec<ClientRecord>, DomainError> {
        let mut records = self.records.list().await.map_err(DomainError::from)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

fn matches_query(record: &ClientRecord, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);
    contains(record.name.as_ref())
        || record.phone.as_deref().is_some_and(contains)
        || contains(record.service_type.label())
        || record.comment.as_deref().is_some_and(contains)
}

#[async_trait]
impl<R, U> RecordsQuery for RecordQueryService<R, U>
where
    R: RecordRepository,
    U: UndoStack,
{
    async fn list(&self, request: ListRecordsRequest) -> Result<Vec<RecordView>, DomainError> {
        let records = self.newest_first().await?;
        let needle = request
            .query
            .map(|query| query.trim().to_lowercase())
            .filter(|query| !query.is_empty());
        let today = local_today(self.clock.as_ref());

        Ok(records
            .into_iter()
            .filter(|record| {
                needle
                    .as_deref()
                    .is_none_or(|text| matches_query(record, text))
            })
            .map(|record| RecordView::new(record, &self.policy, today))
            .collect())
    }

    async fn summary(&self) -> Result<FollowUpSummary, DomainError> {
        let records = self.records.list().await.map_err(DomainError::from)?;
        Ok(FollowUpSummary::summarise(
            &records,
            &self.policy,
            local_today(self.clock.as_ref()),
        ))
    }

    async fn export(&self) -> Result<RecordExport, DomainError> {
        let records = self.newest_first().await?;
        Ok(RecordExport::new(
            &records,
            &self.policy,
            local_today(self.clock.as_ref()),
        ))
    }

    async fn undo_status(&self) -> Result<UndoStatus, DomainError> {
        let depth = self.undo.depth().await.map_err(DomainError::from)?;
        Ok(UndoStatus {
            can_undo: depth > 0,
            depth,
        })
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
