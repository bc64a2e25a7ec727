//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`. This
//! module builds the record API over a JSON data directory the way the server
//! binary does, so end-to-end suites exercise the real adapters.

use std::sync::Arc;

use actix_web::{App, web};
use salon_crm::Trace;
use salon_crm::domain::{FollowUpPolicy, RecordCommandService, RecordQueryService};
use salon_crm::inbound::http::health::{HealthState, live, ready};
use salon_crm::inbound::http::records::{
    delete_record, export_records, list_records, list_services, save_record, set_reminder,
    summary, undo, undo_status,
};
use salon_crm::inbound::http::state::HttpState;
use salon_crm::inbound::http::validation::{json_config, query_config};
use salon_crm::outbound::persistence::{JsonRecordRepository, JsonUndoStack};
use salon_crm::test_support::clock::FixtureClock;
use salon_crm::test_support::data_dir::open_temp_data_dir;
use tempfile::TempDir;

/// Record API state over JSON files in `temp`, with the clock frozen at
/// 2025-02-01.
pub fn json_state(temp: &TempDir, undo_capacity: usize) -> HttpState {
    let dir = open_temp_data_dir(temp).expect("open data dir");
    let records = Arc::new(JsonRecordRepository::new(dir.clone()));
    let undo_stack = Arc::new(JsonUndoStack::new(
        dir,
        std::num::NonZeroUsize::new(undo_capacity).expect("non-zero capacity"),
    ));
    let clock = Arc::new(FixtureClock::february_first());
    let policy = FollowUpPolicy::default();
    HttpState::new(
        Arc::new(RecordCommandService::new(
            records.clone(),
            undo_stack.clone(),
            clock.clone(),
            policy,
        )),
        Arc::new(RecordQueryService::new(records, undo_stack, clock, policy)),
        policy,
    )
}

/// Full application with health probes, marked ready.
pub fn app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    App::new()
        .app_data(health)
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(list_records)
                .service(save_record)
                .service(undo)
                .service(undo_status)
                .service(summary)
                .service(export_records)
                .service(delete_record)
                .service(set_reminder)
                .service(list_services),
        )
        .service(ready)
        .service(live)
}
