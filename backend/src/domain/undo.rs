//! Bounded history of whole record-set snapshots.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::domain::record::ClientRecord;

/// Default number of snapshots kept.
pub const DEFAULT_UNDO_CAPACITY: NonZeroUsize = match NonZeroUsize::new(30) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Full copy of the record set as it stood before a mutation.
pub type RecordSnapshot = Vec<ClientRecord>;

/// Capped LIFO stack of snapshots. Pushing beyond the cap evicts the oldest.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use salon_crm::domain::UndoHistory;
///
/// let mut history = UndoHistory::new(NonZeroUsize::new(2).expect("non-zero"));
/// history.push(Vec::new());
/// assert!(history.can_undo());
/// assert_eq!(history.pop(), Some(Vec::new()));
/// assert!(!history.can_undo());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoHistory {
    capacity: NonZeroUsize,
    entries: VecDeque<RecordSnapshot>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoHistory {
    /// Empty history holding at most `capacity` snapshots.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    /// Rebuild a history from stored entries, oldest first, trimming to
    /// `capacity`.
    #[must_use]
    pub fn from_entries(capacity: NonZeroUsize, entries: Vec<RecordSnapshot>) -> Self {
        let mut history = Self {
            capacity,
            entries: entries.into(),
        };
        let trimmed = history.enforce_capacity();
        if !trimmed.is_empty() {
            debug!(dropped = trimmed.len(), "undo history trimmed to capacity");
        }
        history
    }

    /// Push a snapshot and return the entries evicted to stay within
    /// capacity, oldest first.
    pub fn push(&mut self, snapshot: RecordSnapshot) -> Vec<RecordSnapshot> {
        self.entries.push_back(snapshot);
        self.enforce_capacity()
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<RecordSnapshot> {
        self.entries.pop_back()
    }

    /// Reverse the latest [`UndoHistory::push`]: drop the newest snapshot and
    /// put the entries that push evicted back at the bottom.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    /// use salon_crm::domain::UndoHistory;
    ///
    /// let mut history = UndoHistory::new(NonZeroUsize::MIN);
    /// history.push(Vec::new());
    /// let evicted = history.push(Vec::new());
    /// assert_eq!(evicted.len(), 1);
    ///
    /// history.retract(evicted);
    /// assert_eq!(history.len(), 1);
    /// ```
    pub fn retract(&mut self, evicted: Vec<RecordSnapshot>) {
        self.entries.pop_back();
        for snapshot in evicted.into_iter().rev() {
            self.entries.push_front(snapshot);
        }
    }

    /// Whether a snapshot is available to restore.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of snapshots kept.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Stored entries, oldest first.
    #[must_use]
    pub fn into_entries(self) -> Vec<RecordSnapshot> {
        self.entries.into()
    }

    fn enforce_capacity(&mut self) -> Vec<RecordSnapshot> {
        let excess = self.entries.len().saturating_sub(self.capacity.get());
        self.entries.drain(..excess).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{ClientName, RecordId, ServiceType};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn snapshot(marker: &str) -> RecordSnapshot {
        vec![ClientRecord {
            id: RecordId::new(marker).expect("valid id"),
            name: ClientName::new("Lucía").expect("valid name"),
            phone: None,
            service_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            service_type: ServiceType::Lips,
            follow_up_override: None,
            comment: None,
            reminder_sent: false,
            created_at: None,
        }]
    }

    fn cap(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero capacity")
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(30)]
    fn pushing_past_capacity_evicts_oldest(#[case] capacity: usize) {
        let mut history = UndoHistory::new(cap(capacity));
        for index in 0..=capacity {
            history.push(snapshot(&index.to_string()));
        }

        assert_eq!(history.len(), capacity);
        let entries = history.into_entries();
        assert_eq!(entries.first(), Some(&snapshot("1")));
        assert_eq!(entries.last(), Some(&snapshot(&capacity.to_string())));
    }

    #[rstest]
    fn pop_returns_most_recent_and_shrinks() {
        let mut history = UndoHistory::default();
        history.push(snapshot("a"));
        history.push(snapshot("b"));

        assert_eq!(history.pop(), Some(snapshot("b")));
        assert_eq!(history.len(), 1);
    }

    #[rstest]
    fn pop_on_empty_is_a_no_op() {
        let mut history = UndoHistory::default();
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }

    #[rstest]
    fn from_entries_applies_a_lowered_capacity() {
        let entries = vec![snapshot("a"), snapshot("b"), snapshot("c")];
        let history = UndoHistory::from_entries(cap(2), entries);
        assert_eq!(history.into_entries(), vec![snapshot("b"), snapshot("c")]);
    }

    #[rstest]
    fn push_at_capacity_reports_the_evicted_entry() {
        let mut history = UndoHistory::new(cap(2));
        assert!(history.push(snapshot("a")).is_empty());
        assert!(history.push(snapshot("b")).is_empty());

        let evicted = history.push(snapshot("c"));

        assert_eq!(evicted, vec![snapshot("a")]);
    }

    #[rstest]
    fn retract_at_capacity_restores_the_previous_entries() {
        let mut history = UndoHistory::new(cap(2));
        history.push(snapshot("a"));
        history.push(snapshot("b"));
        let before = history.clone();

        let evicted = history.push(snapshot("c"));
        history.retract(evicted);

        assert_eq!(history, before);
    }

    #[rstest]
    fn retract_below_capacity_only_drops_the_newest() {
        let mut history = UndoHistory::new(cap(3));
        history.push(snapshot("a"));

        let evicted = history.push(snapshot("b"));
        history.retract(evicted);

        assert_eq!(history.into_entries(), vec![snapshot("a")]);
    }

    #[rstest]
    fn default_capacity_is_thirty() {
        assert_eq!(UndoHistory::default().capacity().get(), 30);
    }
}
