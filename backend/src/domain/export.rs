//! Spreadsheet-friendly CSV export of the live record set.
//!
//! The output starts with a UTF-8 byte order mark and uses CRLF line endings
//! so spreadsheet tools open accented names correctly. Fields are quoted when
//! they contain a delimiter, quote or line break.

use chrono::NaiveDate;

use crate::domain::follow_up::{FollowUpPolicy, format_display_date, is_due};
use crate::domain::record::ClientRecord;

/// Suggested download name for the export.
pub const EXPORT_FILE_NAME: &str = "crm_export.csv";

const HEADER: [&str; 7] = [
    "NOMBRE",
    "TELEFONO",
    "FECHA",
    "FECHA RETOQUE",
    "SERVICIO",
    "COMENTARIO",
    "VENCIDO",
];
const DUE_MARKER: &str = "SI";
const BOM: char = '\u{feff}';

/// One rendered export line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Client name.
    pub name: String,
    /// Phone, empty when unknown.
    pub phone: String,
    /// Visit date.
    pub service_date: NaiveDate,
    /// Effective follow-up date.
    pub follow_up_date: NaiveDate,
    /// Service label.
    pub service: &'static str,
    /// Note, empty when absent.
    pub comment: String,
    /// Whether the follow-up is today or earlier; rendered as `SI`.
    pub due: bool,
}

impl ExportRow {
    fn cells(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.phone.clone(),
            format_display_date(self.service_date),
            format_display_date(self.follow_up_date),
            self.service.to_owned(),
            self.comment.clone(),
            if self.due { DUE_MARKER } else { "" }.to_owned(),
        ]
    }
}

/// Export of a record set at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordExport {
    rows: Vec<ExportRow>,
}

impl RecordExport {
    /// Build the export rows, preserving the order of `records`.
    #[must_use]
    pub fn new(records: &[ClientRecord], policy: &FollowUpPolicy, today: NaiveDate) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                let follow_up_date = policy.for_record(record);
                ExportRow {
                    name: record.name.to_string(),
                    phone: record.phone.clone().unwrap_or_default(),
                    service_date: record.service_date,
                    follow_up_date,
                    service: record.service_type.label(),
                    comment: record.comment.clone().unwrap_or_default(),
                    due: is_due(follow_up_date, today),
                }
            })
            .collect();
        Self { rows }
    }

    /// Rows in listing order.
    #[must_use]
    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    /// Render the export as CSV text.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push(BOM);
        write_line(&mut out, HEADER.iter().copied());
        for row in &self.rows {
            let cells = row.cells();
            write_line(&mut out, cells.iter().map(String::as_str));
        }
        out
    }
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, cell);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}
