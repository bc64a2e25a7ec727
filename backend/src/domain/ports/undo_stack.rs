//! Port for the persisted undo history.

use async_trait::async_trait;

use crate::domain::RecordSnapshot;

use super::define_store_error;

define_store_error! {
    /// Errors raised by undo stack adapters.
    pub enum UndoStackError for "undo history";
}

/// Bounded LIFO store of record-set snapshots.
///
/// Implementations enforce their configured capacity on every push, evicting
/// the oldest snapshots first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UndoStack: Send + Sync {
    /// Append a snapshot and return the oldest entries evicted to stay within
    /// capacity, oldest first.
    async fn push(&self, snapshot: RecordSnapshot) -> Result<Vec<RecordSnapshot>, UndoStackError>;

    /// Reverse the latest push: drop the newest snapshot and reinstate the
    /// entries that push evicted.
    async fn retract(&self, evicted: Vec<RecordSnapshot>) -> Result<(), UndoStackError>;

    /// Remove and return the most recent snapshot, if any.
    async fn pop(&self) -> Result<Option<RecordSnapshot>, UndoStackError>;

    /// Number of snapshots currently held.
    async fn depth(&self) -> Result<usize, UndoStackError>;
}

/// Fixture implementation that never holds history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUndoStack;

#[async_trait]
impl UndoStack for FixtureUndoStack {
    async fn push(&self, _snapshot: RecordSnapshot) -> Result<Vec<RecordSnapshot>, UndoStackError> {
        Ok(Vec::new())
    }

    async fn retract(&self, _evicted: Vec<RecordSnapshot>) -> Result<(), UndoStackError> {
        Ok(())
    }

    async fn pop(&self) -> Result<Option<RecordSnapshot>, UndoStackError> {
        Ok(None)
    }

    async fn depth(&self) -> Result<usize, UndoStackError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_stack_discards_pushes() {
        let stack = FixtureUndoStack;
        let evicted = stack.push(Vec::new()).await.expect("fixture push");
        assert!(evicted.is_empty());
        assert_eq!(stack.depth().await.expect("fixture depth"), 0);
        assert_eq!(stack.pop().await.expect("fixture pop"), None);
    }
}
