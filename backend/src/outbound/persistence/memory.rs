//! Process-local adapters used for ephemeral runs and tests.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{RecordRepository, RecordRepositoryError, UndoStack, UndoStackError};
use crate::domain::{ClientRecord, RecordId, RecordSnapshot, UndoHistory};

/// In-memory [`RecordRepository`]. Records are lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    records: Mutex<Vec<ClientRecord>>,
}

impl InMemoryRecordRepository {
    /// Start with `records` already stored.
    #[must_use]
    pub fn with_records(records: Vec<ClientRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn list(&self) -> Result<Vec<ClientRecord>, RecordRepositoryError> {
        Ok(self.records.lock().await.clone())
    }

    async fn upsert(&self, record: &ClientRecord) -> Result<(), RecordRepositoryError> {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => existing.clone_from(record),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), RecordRepositoryError> {
        self.records.lock().await.retain(|record| &record.id != id);
        Ok(())
    }

    async fn set_reminder(&self, id: &RecordId, sent: bool) -> Result<(), RecordRepositoryError> {
        let mut records = self.records.lock().await;
        if let Some(record) = records.iter_mut().find(|record| &record.id == id) {
            record.reminder_sent = sent;
        }
        Ok(())
    }

    async fn replace_all(&self, records: &[ClientRecord]) -> Result<(), RecordRepositoryError> {
        *self.records.lock().await = records.to_vec();
        Ok(())
    }
}

/// In-memory [`UndoStack`] over [`UndoHistory`].
#[derive(Debug, Default)]
pub struct InMemoryUndoStack {
    history: Mutex<UndoHistory>,
}

impl InMemoryUndoStack {
    /// Empty history holding at most `capacity` snapshots.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            history: Mutex::new(UndoHistory::new(capacity)),
        }
    }
}

#[async_trait]
impl UndoStack for InMemoryUndoStack {
    async fn push(&self, snapshot: RecordSnapshot) -> Result<Vec<RecordSnapshot>, UndoStackError> {
        Ok(self.history.lock().await.push(snapshot))
    }

    async fn retract(&self, evicted: Vec<RecordSnapshot>) -> Result<(), UndoStackError> {
        self.history.lock().await.retract(evicted);
        Ok(())
    }

    async fn pop(&self) -> Result<Option<RecordSnapshot>, UndoStackError> {
        Ok(self.history.lock().await.pop())
    }

    async fn depth(&self) -> Result<usize, UndoStackError> {
        Ok(self.history.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientName, ServiceType};
    use chrono::NaiveDate;

    fn record(id: &str) -> ClientRecord {
        ClientRecord {
            id: RecordId::new(id).expect("valid id"),
            name: ClientName::new("Julieta").expect("valid name"),
            phone: Some("11 3333-0000".to_owned()),
            service_date: NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date"),
            service_type: ServiceType::Eyebrows,
            follow_up_override: None,
            comment: None,
            reminder_sent: false,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_matching_id_in_place() {
        let repo = InMemoryRecordRepository::with_records(vec![record("a"), record("b")]);
        let mut edited = record("a");
        edited.phone = None;

        repo.upsert(&edited).await.expect("upsert");

        assert_eq!(
            repo.list().await.expect("list"),
            vec![edited, record("b")]
        );
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_no_op() {
        let repo = InMemoryRecordRepository::with_records(vec![record("a")]);
        repo.delete(&RecordId::new("zzz").expect("valid id"))
            .await
            .expect("delete");
        assert_eq!(repo.list().await.expect("list"), vec![record("a")]);
    }

    #[tokio::test]
    async fn undo_stack_honours_capacity() {
        let undo = InMemoryUndoStack::new(NonZeroUsize::new(1).expect("non-zero"));
        undo.push(vec![record("a")]).await.expect("push");
        undo.push(vec![record("b")]).await.expect("push");

        assert_eq!(undo.depth().await.expect("depth"), 1);
        assert_eq!(undo.pop().await.expect("pop"), Some(vec![record("b")]));
        assert_eq!(undo.pop().await.expect("pop"), None);
    }

    #[tokio::test]
    async fn retract_at_capacity_reinstates_the_evicted_snapshot() {
        let undo = InMemoryUndoStack::new(NonZeroUsize::new(1).expect("non-zero"));
        undo.push(vec![record("a")]).await.expect("push");
        let evicted = undo.push(vec![record("b")]).await.expect("push");

        undo.retract(evicted).await.expect("retract");

        assert_eq!(undo.pop().await.expect("pop"), Some(vec![record("a")]));
        assert_eq!(undo.depth().await.expect("depth"), 0);
    }
}
