//! Flat-file `UndoStack` backed by `crm_undo.json`.
//!
//! The document is `{"stack": [[row, ...], ...]}` with the oldest snapshot
//! first. The capacity is re-applied on every push, so lowering it trims the
//! file on the next mutation.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{UndoStack, UndoStackError};
use crate::domain::{RecordSnapshot, UndoHistory};

use super::json_file::{JsonFile, JsonFileError};
use super::stored_record::{StoredRecord, decode_records, encode_records};

/// Default file name for the undo history.
pub const UNDO_FILE_NAME: &str = "crm_undo.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct UndoDocument {
    #[serde(default)]
    stack: Vec<Vec<StoredRecord>>,
}

fn map_file_error(error: JsonFileError) -> UndoStackError {
    debug!(%error, "undo file operation failed");
    if error.is_unavailable() {
        UndoStackError::connection(error.to_string())
    } else {
        UndoStackError::query(error.to_string())
    }
}

/// JSON flat-file implementation of [`UndoStack`].
#[derive(Debug, Clone)]
pub struct JsonUndoStack {
    file: JsonFile,
    capacity: NonZeroUsize,
}

impl JsonUndoStack {
    /// Store history in [`UNDO_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn new(dir: Arc<Dir>, capacity: NonZeroUsize) -> Self {
        Self {
            file: JsonFile::new(dir, UNDO_FILE_NAME),
            capacity,
        }
    }

    async fn load(&self) -> Result<UndoHistory, UndoStackError> {
        let document: UndoDocument = self
            .file
            .read()
            .await
            .map_err(map_file_error)?
            .unwrap_or_default();
        let entries = document
            .stack
            .into_iter()
            .map(|rows| decode_records(rows).records)
            .collect();
        Ok(UndoHistory::from_entries(self.capacity, entries))
    }

    async fn store(&self, history: UndoHistory) -> Result<(), UndoStackError> {
        let document = UndoDocument {
            stack: history
                .into_entries()
                .iter()
                .map(|snapshot| encode_records(snapshot))
                .collect(),
        };
        self.file.write(&document).await.map_err(map_file_error)
    }
}

#[async_trait]
impl UndoStack for JsonUndoStack {
    async fn push(&self, snapshot: RecordSnapshot) -> Result<Vec<RecordSnapshot>, UndoStackError> {
        let mut history = self.load().await?;
        let evicted = history.push(snapshot);
        debug!(
            depth = history.len(),
            evicted = evicted.len(),
            file = %self.file.name(),
            "undo snapshot stored"
        );
        self.store(history).await?;
        Ok(evicted)
    }

    async fn retract(&self, evicted: Vec<RecordSnapshot>) -> Result<(), UndoStackError> {
        let mut history = self.load().await?;
        history.retract(evicted);
        debug!(depth = history.len(), file = %self.file.name(), "undo snapshot retracted");
        self.store(history).await
    }

    async fn pop(&self) -> Result<Option<RecordSnapshot>, UndoStackError> {
        let mut history = self.load().await?;
        let Some(snapshot) = history.pop() else {
            return Ok(None);
        };
        self.store(history).await?;
        Ok(Some(snapshot))
    }

    async fn depth(&self) -> Result<usize, UndoStackError> {
        Ok(self.load().await?.len())
    }
}
