//! Port for client record persistence.
//!
//! Adapters store the whole record set; the salon keeps at most a few
//! thousand rows, so every operation may read and rewrite the full table.

use async_trait::async_trait;

use crate::domain::{ClientRecord, RecordId};

use super::define_store_error;

define_store_error! {
    /// Errors raised by record repository adapters.
    pub enum RecordRepositoryError for "record repository";
}

/// Port for record storage.
///
/// Absent identifiers are not errors: `delete` and `set_reminder` leave the
/// store untouched when no record matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All records in stored order.
    async fn list(&self) -> Result<Vec<ClientRecord>, RecordRepositoryError>;

    /// Replace the record with the same id, or append it.
    async fn upsert(&self, record: &ClientRecord) -> Result<(), RecordRepositoryError>;

    /// Remove the record if present.
    async fn delete(&self, id: &RecordId) -> Result<(), RecordRepositoryError>;

    /// Set the reminder flag, leaving every other field alone.
    async fn set_reminder(&self, id: &RecordId, sent: bool)
    -> Result<(), RecordRepositoryError>;

    /// Overwrite the entire record set.
    async fn replace_all(&self, records: &[ClientRecord]) -> Result<(), RecordRepositoryError>;
}

/// Fixture implementation that stores nothing and lists no records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordRepository;

#[async_trait]
impl RecordRepository for FixtureRecordRepository {
    async fn list(&self) -> Result<Vec<ClientRecord>, RecordRepositoryError> {
        Ok(Vec::new())
    }

    async fn upsert(&self, _record: &ClientRecord) -> Result<(), RecordRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &RecordId) -> Result<(), RecordRepositoryError> {
        Ok(())
    }

    async fn set_reminder(
        &self,
        _id: &RecordId,
        _sent: bool,
    ) -> Result<(), RecordRepositoryError> {
        Ok(())
    }

    async fn replace_all(&self, _records: &[ClientRecord]) -> Result<(), RecordRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_lists_nothing() {
        let repo = FixtureRecordRepository;
        repo.delete(&RecordId::random())
            .await
            .expect("fixture delete should succeed");
        let records = repo.list().await.expect("fixture list should succeed");
        assert!(records.is_empty());
    }

    #[rstest]
    fn errors_format_with_context() {
        let error = RecordRepositoryError::connection("permission denied");
        assert_eq!(
            error.to_string(),
            "record repository unavailable: permission denied"
        );
    }
}
