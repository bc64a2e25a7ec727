//! On-disk record layout shared by the JSON adapters.
//!
//! Keys follow the salon's existing `crm_data.json` files so data written by
//! the older tool loads unchanged. Dates are stored as `dd/mm/yyyy`; ISO dates
//! are accepted on read.
//!
//! Rows saved without an id get one derived from their position and content,
//! so the same file yields the same ids until the next write persists them.
//! Rows that fail validation are set aside instead of failing the whole load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    ClientRecord, RecordDraft, RecordForm, RecordValidationError, format_display_date,
};

/// Namespace for ids derived from id-less rows.
const DERIVED_ROW_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_4c3e_9a52_5b7e_8e0d_2f41_a9c6_73b1);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "nombre", default)]
    name: String,
    #[serde(rename = "telefono", default)]
    phone: String,
    #[serde(rename = "fecha", default)]
    service_date: String,
    #[serde(rename = "servicio", default)]
    service_type: String,
    #[serde(rename = "comentario", default)]
    comment: String,
    #[serde(rename = "recordatorio", default)]
    reminder_sent: bool,
    #[serde(
        rename = "fecha_retoque",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    follow_up_override: Option<String>,
    #[serde(rename = "creado", default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<&ClientRecord> for StoredRecord {
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.to_string(),
            phone: record.phone.clone().unwrap_or_default(),
            service_date: format_display_date(record.service_date),
            service_type: record.service_type.label().to_owned(),
            comment: record.comment.clone().unwrap_or_default(),
            reminder_sent: record.reminder_sent,
            follow_up_override: record.follow_up_override.map(format_display_date),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<StoredRecord> for ClientRecord {
    type Error = RecordValidationError;

    /// Rows must carry an id; [`decode_records`] fills in missing ones.
    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let StoredRecord {
            id,
            name,
            phone,
            service_date,
            service_type,
            comment,
            reminder_sent,
            follow_up_override,
            created_at,
        } = stored;

        let draft = RecordDraft::parse(RecordForm {
            id: Some(id),
            name,
            phone: Some(phone),
            service_date,
            service_type,
            follow_up_date: follow_up_override,
            comment: Some(comment),
        })?;
        Ok(Self {
            id: draft.id.ok_or(RecordValidationError::EmptyId)?,
            name: draft.name,
            phone: draft.phone,
            service_date: draft.service_date,
            service_type: draft.service_type,
            follow_up_override: draft.follow_up_override,
            comment: draft.comment,
            reminder_sent,
            created_at,
        })
    }
}

/// Stable id for a row stored without one.
fn derived_row_id(index: usize, row: &StoredRecord) -> String {
    let seed = format!(
        "{index}\u{1f}{}\u{1f}{}\u{1f}{}",
        row.name, row.service_date, row.service_type
    );
    Uuid::new_v5(&DERIVED_ROW_NAMESPACE, seed.as_bytes()).to_string()
}

/// Encode records for storage.
pub(crate) fn encode_records(records: &[ClientRecord]) -> Vec<StoredRecord> {
    records.iter().map(StoredRecord::from).collect()
}

/// Outcome of decoding a stored row list.
#[derive(Debug, Default)]
pub(crate) struct DecodedRows {
    pub(crate) records: Vec<ClientRecord>,
    /// Rows that failed validation, in stored order, with ids filled in.
    pub(crate) rejected: Vec<StoredRecord>,
}

/// Decode stored rows, assigning ids where missing and setting aside rows
/// that fail validation.
pub(crate) fn decode_records(rows: Vec<StoredRecord>) -> DecodedRows {
    let mut decoded = DecodedRows::default();
    for (index, mut row) in rows.into_iter().enumerate() {
        if row.id.trim().is_empty() {
            row.id = derived_row_id(index, &row);
        }
        match ClientRecord::try_from(row.clone()) {
            Ok(record) => decoded.records.push(record),
            Err(error) => {
                warn!(row = index, record_id = %row.id, %error, "skipping invalid stored row");
                decoded.rejected.push(row);
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::{ClientName, RecordId, ServiceType};

    fn rows(value: serde_json::Value) -> Vec<StoredRecord> {
        serde_json::from_value(value).expect("decode rows")
    }

    #[rstest]
    fn decodes_rows_written_by_the_older_tool() {
        let row: StoredRecord = serde_json::from_value(json!({
            "id": "7f1c",
            "nombre": "María ",
            "telefono": "",
            "fecha": "10/01/2025",
            "servicio": "retoque",
            "comentario": "tono 3",
            "recordatorio": true
        }))
        .expect("decode row");

        let record = ClientRecord::try_from(row).expect("valid row");
        assert_eq!(record.id.as_ref(), "7f1c");
        assert_eq!(record.name.as_ref(), "María");
        assert_eq!(record.phone, None);
        assert_eq!(record.service_type, ServiceType::Retouch);
        assert!(record.reminder_sent);
        assert_eq!(record.created_at, None);
    }

    #[rstest]
    fn rows_without_id_get_the_same_id_on_every_decode() {
        let stored = json!([
            {"nombre": "Ana", "fecha": "2025-01-10", "servicio": "LABIOS"},
            {"nombre": "Ana", "fecha": "2025-01-10", "servicio": "LABIOS"}
        ]);

        let first = decode_records(rows(stored.clone())).records;
        let second = decode_records(rows(stored)).records;

        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|record| record.id.to_string()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids.first(), ids.last());
    }

    #[rstest]
    fn row_without_id_fails_direct_conversion() {
        let row = StoredRecord {
            name: "Ana".to_owned(),
            service_date: "10/01/2025".to_owned(),
            service_type: "CEJAS".to_owned(),
            ..StoredRecord::default()
        };
        assert_eq!(
            ClientRecord::try_from(row),
            Err(RecordValidationError::EmptyId)
        );
    }

    #[rstest]
    fn encoding_uses_day_first_dates_and_legacy_keys() {
        let record = ClientRecord {
            id: RecordId::new("abc").expect("valid id"),
            name: ClientName::new("Ana").expect("valid name"),
            phone: Some("11 2222-3333".to_owned()),
            service_date: NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date"),
            service_type: ServiceType::HyaluronicAcid,
            follow_up_override: Some(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")),
            comment: None,
            reminder_sent: false,
            created_at: Some(
                Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            ),
        };

        let value = serde_json::to_value(StoredRecord::from(&record)).expect("encode row");
        assert_eq!(value.get("fecha"), Some(&json!("05/01/2025")));
        assert_eq!(value.get("servicio"), Some(&json!("ACIDO HIALURONICO")));
        assert_eq!(value.get("fecha_retoque"), Some(&json!("01/03/2025")));
        assert_eq!(value.get("comentario"), Some(&json!("")));

        let decoded: StoredRecord = serde_json::from_value(value).expect("decode row");
        assert_eq!(ClientRecord::try_from(decoded), Ok(record));
    }

    #[rstest]
    fn invalid_rows_are_set_aside() {
        let decoded = decode_records(rows(json!([
            {"id": "a", "nombre": "Ana", "fecha": "10/01/2025", "servicio": "CEJAS"},
            {"id": "b", "nombre": "Bea", "fecha": "someday", "servicio": "CEJAS"},
            {"id": "c", "nombre": "Carla", "fecha": "10/01/2025", "servicio": "PESTAÑAS"}
        ])));

        let kept: Vec<_> = decoded.records.iter().map(|r| r.id.to_string()).collect();
        let rejected: Vec<_> = decoded.rejected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(kept, vec!["a"]);
        assert_eq!(rejected, vec!["b", "c"]);
    }
}
