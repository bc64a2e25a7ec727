//! Flat-file `RecordRepository` backed by `crm_data.json`.
//!
//! The file holds a JSON array of rows. Each mutation loads the array,
//! modifies it and rewrites the file atomically; callers serialise writers.
//! Rows that fail validation are hidden from callers and written back after
//! the valid ones, so a mutation never drops them.

use std::sync::Arc;

use async_trait::async_trait;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::ports::{RecordRepository, RecordRepositoryError};
use crate::domain::{ClientRecord, RecordId};

use super::json_file::{JsonFile, JsonFileError};
use super::stored_record::{DecodedRows, StoredRecord, decode_records, encode_records};

/// Default file name for the record set.
pub const DATA_FILE_NAME: &str = "crm_data.json";

fn map_file_error(error: JsonFileError) -> RecordRepositoryError {
    debug!(%error, "record file operation failed");
    if error.is_unavailable() {
        RecordRepositoryError::connection(error.to_string())
    } else {
        RecordRepositoryError::query(error.to_string())
    }
}

/// JSON flat-file implementation of [`RecordRepository`].
#[derive(Debug, Clone)]
pub struct JsonRecordRepository {
    file: JsonFile,
}

impl JsonRecordRepository {
    /// Store records in [`DATA_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn new(dir: Arc<Dir>) -> Self {
        Self::with_file_name(dir, DATA_FILE_NAME)
    }

    /// Store records in `file_name` inside `dir`.
    #[must_use]
    pub fn with_file_name(dir: Arc<Dir>, file_name: &str) -> Self {
        Self {
            file: JsonFile::new(dir, file_name),
        }
    }

    async fn load(&self) -> Result<DecodedRows, RecordRepositoryError> {
        let rows: Vec<StoredRecord> = self
            .file
            .read()
            .await
            .map_err(map_file_error)?
            .unwrap_or_default();
        Ok(decode_records(rows))
    }

    async fn store(
        &self,
        records: &[ClientRecord],
        rejected: &[StoredRecord],
    ) -> Result<(), RecordRepositoryError> {
        let mut rows = encode_records(records);
        rows.extend_from_slice(rejected);
        self.file.write(&rows).await.map_err(map_file_error)
    }
}

#[async_trait]
impl RecordRepository for JsonRecordRepository {
    async fn list(&self) -> Result<Vec<ClientRecord>, RecordRepositoryError> {
        Ok(self.load().await?.records)
    }

    async fn upsert(&self, record: &ClientRecord) -> Result<(), RecordRepositoryError> {
        let DecodedRows {
            mut records,
            rejected,
        } = self.load().await?;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => existing.clone_from(record),
            None => records.push(record.clone()),
        }
        self.store(&records, &rejected).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), RecordRepositoryError> {
        let DecodedRows {
            mut records,
            rejected,
        } = self.load().await?;
        let count = records.len();
        records.retain(|record| &record.id != id);
        if records.len() == count {
            return Ok(());
        }
        self.store(&records, &rejected).await
    }

    async fn set_reminder(&self, id: &RecordId, sent: bool) -> Result<(), RecordRepositoryError> {
        let DecodedRows {
            mut records,
            rejected,
        } = self.load().await?;
        let Some(record) = records.iter_mut().find(|record| &record.id == id) else {
            return Ok(());
        };
        record.reminder_sent = sent;
        self.store(&records, &rejected).await
    }

    async fn replace_all(&self, records: &[ClientRecord]) -> Result<(), RecordRepositoryError> {
        let rejected = self.load().await?.rejected;
        self.store(records, &rejected).await
    }
}
