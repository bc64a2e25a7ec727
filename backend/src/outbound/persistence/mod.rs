//! Persistence adapters for the record store and undo history.
//!
//! Two families ship:
//!
//! - **JSON flat files** (`crm_data.json`, `crm_undo.json`) inside a
//!   capability-scoped data directory. Writes replace the whole file
//!   atomically. The layout matches the files the salon already has.
//! - **In-memory** stores for ephemeral runs and tests.
//!
//! Adapters only translate between stored rows and domain types; ordering,
//! filtering and undo policy live in the domain services.
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! use camino::Utf8Path;
//! use salon_crm::outbound::persistence::{JsonRecordRepository, JsonUndoStack, open_data_dir};
//!
//! let dir = Arc::new(open_data_dir(Utf8Path::new("/var/lib/salon"))?);
//! let records = JsonRecordRepository::new(Arc::clone(&dir));
//! let undo = JsonUndoStack::new(dir, NonZeroUsize::MIN);
//! # Ok::<(), std::io::Error>(())
//! ```

mod atomic_io;
mod json_file;
mod json_record_repository;
mod json_undo_stack;
mod memory;
mod stored_record;

pub use json_file::open_data_dir;
pub use json_record_repository::{DATA_FILE_NAME, JsonRecordRepository};
pub use json_undo_stack::{JsonUndoStack, UNDO_FILE_NAME};
pub use memory::{InMemoryRecordRepository, InMemoryUndoStack};
