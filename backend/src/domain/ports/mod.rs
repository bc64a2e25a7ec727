//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_store_error;

mod record_repository;
mod records_command;
mod records_query;
mod undo_stack;

#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{FixtureRecordRepository, RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use records_command::MockRecordsCommand;
pub use records_command::{RecordsCommand, UndoOutcome};
#[cfg(test)]
pub use records_query::MockRecordsQuery;
pub use records_query::{ListRecordsRequest, RecordsQuery, UndoStatus};
#[cfg(test)]
pub use undo_stack::MockUndoStack;
pub use undo_stack::{FixtureUndoStack, UndoStack, UndoStackError};
