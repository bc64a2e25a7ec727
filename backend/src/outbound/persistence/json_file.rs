//! Whole-file JSON documents inside the data directory.

use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::field::display;

use crate::domain::TraceId;

use super::atomic_io::{read_optional, write_atomic};

/// Failure reading or writing a JSON document.
#[derive(Debug, thiserror::Error)]
pub(crate) enum JsonFileError {
    /// The file or its directory is not accessible.
    #[error("{path} is unavailable: {source}")]
    Unavailable { path: Utf8PathBuf, source: io::Error },
    /// Any other I/O failure.
    #[error("failed to access {path}: {source}")]
    Io { path: Utf8PathBuf, source: io::Error },
    /// The file is not valid JSON for the expected document.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
    /// The document could not be serialised.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
    /// The blocking file task panicked or was cancelled.
    #[error("file task for {path} did not complete: {message}")]
    Task { path: Utf8PathBuf, message: String },
}

impl JsonFileError {
    /// Whether the failure means the store is unreachable rather than broken.
    pub(crate) fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    fn from_io(path: &Utf8Path, source: io::Error) -> Self {
        let owned = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Self::Unavailable {
                path: owned,
                source,
            },
            _ => Self::Io {
                path: owned,
                source,
            },
        }
    }
}

/// Create `path` if needed and open it as a capability-scoped directory.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created or
/// opened.
pub fn open_data_dir(path: &Utf8Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}

/// A single JSON document rewritten atomically on every save.
#[derive(Debug, Clone)]
pub(crate) struct JsonFile {
    dir: Arc<Dir>,
    name: Utf8PathBuf,
}

impl JsonFile {
    pub(crate) fn new(dir: Arc<Dir>, name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir,
            name: name.into(),
        }
    }

    pub(crate) fn name(&self) -> &Utf8Path {
        &self.name
    }

    /// Decode the document, or `None` when the file is missing or blank.
    pub(crate) async fn read<T>(&self) -> Result<Option<T>, JsonFileError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let file = self.clone();
        self.run_blocking(move || {
            let Some(text) =
                read_optional(&file.dir, &file.name).map_err(|source| {
                    JsonFileError::from_io(&file.name, source)
                })?
            else {
                return Ok(None);
            };
            serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| JsonFileError::Decode {
                    path: file.name.clone(),
                    source,
                })
        })
        .await
    }

    /// Pretty-print `value` and atomically replace the document.
    pub(crate) async fn write<T>(&self, value: &T) -> Result<(), JsonFileError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| JsonFileError::Encode {
            path: self.name.clone(),
            source,
        })?;
        let file = self.clone();
        self.run_blocking(move || {
            write_atomic(&file.dir, &file.name, &bytes)
                .map_err(|source| JsonFileError::from_io(&file.name, source))?;
            debug!(
                path = %file.name,
                bytes = bytes.len(),
                trace_id = TraceId::current().map(display),
                "data file replaced"
            );
            Ok(())
        })
        .await
    }

    /// Run file work on the blocking pool under the caller's trace id.
    async fn run_blocking<T, F>(&self, task: F) -> Result<T, JsonFileError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, JsonFileError> + Send + 'static,
    {
        tokio::task::spawn_blocking(TraceId::carry(task))
            .await
            .map_err(|error| JsonFileError::Task {
                path: self.name.clone(),
                message: error.to_string(),
            })?
    }
}
