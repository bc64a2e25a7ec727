//! Builders for HTTP state over the configured record adapters.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use salon_crm::domain::ports::{RecordRepository, UndoStack};
use salon_crm::domain::{FollowUpPolicy, RecordCommandService, RecordQueryService};
use salon_crm::inbound::http::state::HttpState;
use salon_crm::outbound::persistence::{
    InMemoryRecordRepository, InMemoryUndoStack, JsonRecordRepository, JsonUndoStack,
    open_data_dir,
};
use tracing::info;

use super::ServerConfig;

/// Wire the command and query services over one repository and undo stack.
fn build_record_services<R, U>(
    records: Arc<R>,
    undo: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: FollowUpPolicy,
) -> HttpState
where
    R: RecordRepository + 'static,
    U: UndoStack + 'static,
{
    let command = RecordCommandService::new(records.clone(), undo.clone(), clock.clone(), policy);
    let query = RecordQueryService::new(records, undo, clock, policy);
    HttpState::new(Arc::new(command), Arc::new(query), policy)
}

/// Build HTTP state backed by JSON files when a data directory is configured,
/// otherwise by in-memory adapters.
///
/// # Errors
///
/// Returns [`io::Error`] when the data directory cannot be created or opened.
pub(super) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> io::Result<web::Data<HttpState>> {
    let state = match &config.data_dir {
        Some(path) => {
            let dir = Arc::new(open_data_dir(path)?);
            info!(data_dir = %path, undo_capacity = config.undo_capacity.get(), "using JSON record store");
            build_record_services(
                Arc::new(JsonRecordRepository::new(dir.clone())),
                Arc::new(JsonUndoStack::new(dir, config.undo_capacity)),
                clock,
                config.policy,
            )
        }
        None => {
            info!(undo_capacity = config.undo_capacity.get(), "using in-memory record store");
            build_record_services(
                Arc::new(InMemoryRecordRepository::default()),
                Arc::new(InMemoryUndoStack::new(config.undo_capacity)),
                clock,
                config.policy,
            )
        }
    };
    Ok(web::Data::new(state))
}
