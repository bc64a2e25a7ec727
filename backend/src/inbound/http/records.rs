//! Client record HTTP handlers.
//!
//! ```text
//! GET    /api/v1/records?q=
//! POST   /api/v1/records
//! DELETE /api/v1/records/{id}
//! PUT    /api/v1/records/{id}/reminder
//! GET    /api/v1/records/undo
//! POST   /api/v1/records/undo
//! GET    /api/v1/records/summary
//! GET    /api/v1/records/export
//! GET    /api/v1/services
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ListRecordsRequest, UndoOutcome, UndoStatus};
use crate::domain::{
    EXPORT_FILE_NAME, FollowUpPolicy, FollowUpState, FollowUpSummary, RecordForm, RecordView,
    ServiceType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ServiceTypeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_record_id};

/// Request body for `POST /api/v1/records`.
///
/// Example JSON:
/// `{"name":"Julieta","serviceDate":"10/01/2025","serviceType":"CEJAS"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecordRequest {
    /// Existing record to update. Omit to create.
    pub id: Option<String>,
    /// Client name; required.
    pub name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// `dd/mm/yyyy` or `yyyy-mm-dd`.
    pub service_date: Option<String>,
    /// Service label, matched case-insensitively.
    pub service_type: Option<String>,
    /// Manual follow-up date overriding the computed one.
    pub follow_up_date: Option<String>,
    /// Free-text note.
    pub comment: Option<String>,
}

impl From<SaveRecordRequest> for RecordForm {
    fn from(value: SaveRecordRequest) -> Self {
        Self {
            id: value.id,
            name: value.name.unwrap_or_default(),
            phone: value.phone,
            service_date: value.service_date.unwrap_or_default(),
            service_type: value.service_type.unwrap_or_default(),
            follow_up_date: value.follow_up_date,
            comment: value.comment,
        }
    }
}

/// A stored record with its derived follow-up state.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// Record id.
    pub id: String,
    /// Client name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Visit date, ISO.
    #[schema(example = "2025-01-10")]
    pub service_date: String,
    /// Service label.
    #[schema(value_type = ServiceTypeSchema, example = "CEJAS")]
    pub service_type: String,
    /// Effective follow-up date, ISO.
    #[schema(example = "2025-01-30")]
    pub follow_up_date: String,
    /// True when `followUpDate` was set manually.
    pub follow_up_overridden: bool,
    /// Free-text note.
    pub comment: Option<String>,
    /// Whether the follow-up reminder went out.
    pub reminder_sent: bool,
    /// Follow-up date is today or earlier.
    pub due: bool,
    /// First save time, RFC 3339; absent for imported rows.
    pub created_at: Option<String>,
}

impl From<RecordView> for RecordResponse {
    fn from(value: RecordView) -> Self {
        let RecordView {
            record,
            follow_up_date,
            due,
        } = value;
        Self {
            id: record.id.to_string(),
            name: record.name.as_ref().to_owned(),
            phone: record.phone,
            service_date: record.service_date.to_string(),
            service_type: record.service_type.label().to_owned(),
            follow_up_date: follow_up_date.to_string(),
            follow_up_overridden: record.follow_up_override.is_some(),
            comment: record.comment,
            reminder_sent: record.reminder_sent,
            due,
            created_at: record.created_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// Query string for `GET /api/v1/records`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    /// Case-insensitive substring matched against name, phone, service and
    /// comment.
    pub q: Option<String>,
}

/// Request body for `PUT /api/v1/records/{id}/reminder`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    /// New flag value; required.
    pub reminder_sent: Option<bool>,
}

/// Result of `POST /api/v1/records/undo`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UndoResponse {
    /// False when there was nothing to undo.
    pub restored: bool,
    /// Snapshots still available.
    pub remaining: usize,
}

impl From<UndoOutcome> for UndoResponse {
    fn from(value: UndoOutcome) -> Self {
        Self {
            restored: value.restored,
            remaining: value.remaining,
        }
    }
}

/// Result of `GET /api/v1/records/undo`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UndoStatusResponse {
    /// Whether an undo would restore anything.
    pub can_undo: bool,
    /// Snapshots held.
    pub depth: usize,
}

impl From<UndoStatus> for UndoStatusResponse {
    fn from(value: UndoStatus) -> Self {
        Self {
            can_undo: value.can_undo,
            depth: value.depth,
        }
    }
}

/// Follow-up banner data.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// `none`, `upcoming` or `due`.
    #[schema(example = "due")]
    pub state: String,
    /// Earliest follow-up date, ISO.
    pub nearest_follow_up: Option<String>,
    /// Negative when the nearest follow-up is overdue.
    pub days_until: Option<i64>,
    /// Records due today or earlier.
    pub due_count: usize,
}

fn state_name(state: FollowUpState) -> &'static str {
    match state {
        FollowUpState::None => "none",
        FollowUpState::Upcoming => "upcoming",
        FollowUpState::Due => "due",
    }
}

impl From<FollowUpSummary> for SummaryResponse {
    fn from(value: FollowUpSummary) -> Self {
        Self {
            state: state_name(value.state).to_owned(),
            nearest_follow_up: value.nearest.map(|date| date.to_string()),
            days_until: value.days_until,
            due_count: value.due_count,
        }
    }
}

/// One entry of the service catalogue.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// Stored label.
    #[schema(value_type = ServiceTypeSchema, example = "CEJAS")]
    pub label: String,
    /// Whether this is the touch-up service.
    pub is_retouch: bool,
    /// Days from the service date to the computed follow-up.
    pub follow_up_days: u32,
}

impl ServiceResponse {
    fn new(service: ServiceType, policy: &FollowUpPolicy) -> Self {
        Self {
            label: service.label().to_owned(),
            is_retouch: service.is_retouch(),
            follow_up_days: if service.is_retouch() {
                policy.retouch_offset_days
            } else {
                policy.default_offset_days
            },
        }
    }
}

/// List records newest first.
#[utoipa::path(
    get,
    path = "/api/v1/records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Records", body = [RecordResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    query: web::Query<ListRecordsQuery>,
) -> ApiResult<web::Json<Vec<RecordResponse>>> {
    let request = ListRecordsRequest {
        query: query.into_inner().q,
    };
    let records = state.records_query.list(request).await?;
    Ok(web::Json(
        records.into_iter().map(RecordResponse::from).collect(),
    ))
}

/// Create a record, or update it when `id` matches an existing one.
///
/// Updates keep the reminder flag and creation time.
#[utoipa::path(
    post,
    path = "/api/v1/records",
    request_body = SaveRecordRequest,
    responses(
        (status = 200, description = "Saved record", body = RecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "saveRecord"
)]
#[post("/records")]
pub async fn save_record(
    state: web::Data<HttpState>,
    payload: web::Json<SaveRecordRequest>,
) -> ApiResult<web::Json<RecordResponse>> {
    let view = state
        .records
        .save(RecordForm::from(payload.into_inner()))
        .await?;
    Ok(web::Json(RecordResponse::from(view)))
}

/// Delete a record. Unknown ids succeed without change.
#[utoipa::path(
    delete,
    path = "/api/v1/records/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 204, description = "Record removed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/records/{id}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path.into_inner())?;
    state.records.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Set whether the client has been reminded.
#[utoipa::path(
    put,
    path = "/api/v1/records/{id}/reminder",
    params(("id" = String, Path, description = "Record identifier")),
    request_body = ReminderRequest,
    responses(
        (status = 204, description = "Reminder flag stored"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "setRecordReminder"
)]
#[put("/records/{id}/reminder")]
pub async fn set_reminder(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReminderRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path.into_inner())?;
    let sent = payload
        .into_inner()
        .reminder_sent
        .ok_or_else(|| missing_field_error(FieldName::new("reminderSent")))?;
    state.records.set_reminder(&id, sent).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Restore the record set to the state before the last change.
#[utoipa::path(
    post,
    path = "/api/v1/records/undo",
    responses(
        (status = 200, description = "Undo outcome", body = UndoResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "undoRecords"
)]
#[post("/records/undo")]
pub async fn undo(state: web::Data<HttpState>) -> ApiResult<web::Json<UndoResponse>> {
    let outcome = state.records.undo().await?;
    Ok(web::Json(UndoResponse::from(outcome)))
}

/// Whether an undo is available and how deep the history is.
#[utoipa::path(
    get,
    path = "/api/v1/records/undo",
    responses(
        (status = 200, description = "Undo availability", body = UndoStatusResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getUndoStatus"
)]
#[get("/records/undo")]
pub async fn undo_status(state: web::Data<HttpState>) -> ApiResult<web::Json<UndoStatusResponse>> {
    let status = state.records_query.undo_status().await?;
    Ok(web::Json(UndoStatusResponse::from(status)))
}

/// Nearest follow-up and how many are due.
#[utoipa::path(
    get,
    path = "/api/v1/records/summary",
    responses(
        (status = 200, description = "Follow-up summary", body = SummaryResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getFollowUpSummary"
)]
#[get("/records/summary")]
pub async fn summary(state: web::Data<HttpState>) -> ApiResult<web::Json<SummaryResponse>> {
    let summary = state.records_query.summary().await?;
    Ok(web::Json(SummaryResponse::from(summary)))
}

/// Download every record as a spreadsheet-friendly CSV file.
#[utoipa::path(
    get,
    path = "/api/v1/records/export",
    responses(
        (
            status = 200,
            description = "CSV export",
            content_type = "text/csv",
            body = String,
            headers(("Content-Disposition" = String, description = "Attachment file name"))
        ),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "exportRecords"
)]
#[get("/records/export")]
pub async fn export_records(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let export = state.records_query.export().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(export.to_csv()))
}

/// Services offered, in form order.
#[utoipa::path(
    get,
    path = "/api/v1/services",
    responses((status = 200, description = "Service catalogue", body = [ServiceResponse])),
    tags = ["records"],
    operation_id = "listServices"
)]
#[get("/services")]
pub async fn list_services(state: web::Data<HttpState>) -> web::Json<Vec<ServiceResponse>> {
    web::Json(
        ServiceType::ALL
            .into_iter()
            .map(|service| ServiceResponse::new(service, &state.policy))
            .collect(),
    )
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
