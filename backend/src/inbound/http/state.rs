//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::FollowUpPolicy;
use crate::domain::ports::{RecordsCommand, RecordsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Mutations and undo.
    pub records: Arc<dyn RecordsCommand>,
    /// Listings, summary, export and undo status.
    pub records_query: Arc<dyn RecordsQuery>,
    /// Offsets reported alongside the service list.
    pub policy: FollowUpPolicy,
}

impl HttpState {
    /// Construct state from the record ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use salon_crm::domain::{FollowUpPolicy, RecordCommandService, RecordQueryService};
    /// use salon_crm::inbound::http::state::HttpState;
    /// use salon_crm::outbound::persistence::{InMemoryRecordRepository, InMemoryUndoStack};
    ///
    /// let records = Arc::new(InMemoryRecordRepository::default());
    /// let undo = Arc::new(InMemoryUndoStack::default());
    /// let policy = FollowUpPolicy::default();
    /// let state = HttpState::new(
    ///     Arc::new(RecordCommandService::new(
    ///         records.clone(),
    ///         undo.clone(),
    ///         Arc::new(DefaultClock),
    ///         policy,
    ///     )),
    ///     Arc::new(RecordQueryService::new(records, undo, Arc::new(DefaultClock), policy)),
    ///     policy,
    /// );
    /// let _query = state.records_query.clone();
    /// ```
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordsCommand>,
        records_query: Arc<dyn RecordsQuery>,
        policy: FollowUpPolicy,
    ) -> Self {
        Self {
            records,
            records_query,
            policy,
        }
    }
}
