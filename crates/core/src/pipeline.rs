//! The two-stage upload flow: appointments first, then remarks.

use crate::error::{MergeError, Result, UploadKind};
use crate::export::{export_columns, export_xlsx};
use crate::extract::{extract_appointments, extract_lookup};
use crate::locate::{locate_appointments, locate_lookup};
use crate::merge::merge;
use crate::record::{LookupMap, Record};
use crate::upload::{download_name, output_stem, Upload};
use apptmerge_sheet::Book;
use serde::Serialize;

/// Everything produced by one pair of uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub records: Vec<Record>,
    /// Distinct identifiers in the remarks lookup.
    pub remark_ids: usize,
    /// Sanitized stem of the appointments file name.
    pub source_stem: String,
    /// Appointment rows read before the join.
    pub appointment_rows: usize,
    pub matched_appointments: usize,
}

/// Serializable view handed to whatever renders the results.
#[derive(Debug, Serialize)]
pub struct ResultsView<'a> {
    pub filename: &'a str,
    pub total_rows: usize,
    pub appointment_rows: usize,
    pub remark_ids: usize,
    pub matched_appointments: usize,
    pub columns: Vec<String>,
    pub rows: &'a [Record],
}

impl MergeReport {
    /// Rows after one-to-many expansion.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn download_name(&self) -> String {
        download_name(&self.source_stem)
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        export_xlsx(&self.records)
    }

    #[must_use]
    pub fn view(&self) -> ResultsView<'_> {
        ResultsView {
            filename: &self.source_stem,
            total_rows: self.total_rows(),
            appointment_rows: self.appointment_rows,
            remark_ids: self.remark_ids,
            matched_appointments: self.matched_appointments,
            columns: if self.records.is_empty() {
                Vec::new()
            } else {
                export_columns(&self.records)
            },
            rows: &self.records,
        }
    }
}

fn read_book(kind: UploadKind, bytes: &[u8]) -> Result<Book> {
    Book::from_xlsx_bytes(bytes).map_err(|source| MergeError::Parse { kind, source })
}

/// Locate and extract the appointment list from workbook bytes.
pub fn load_appointments(bytes: &[u8]) -> Result<Vec<Record>> {
    let book = read_book(UploadKind::Appointments, bytes)?;
    let layout = locate_appointments(&book)?;
    extract_appointments(&book, &layout)
}

/// Locate and extract the remarks lookup from workbook bytes.
pub fn load_lookup(bytes: &[u8]) -> Result<LookupMap> {
    let book = read_book(UploadKind::Remarks, bytes)?;
    let layout = locate_lookup(&book)?;
    extract_lookup(&book, &layout)
}

/// Validate both uploads, read them and join them.
///
/// Either both stages succeed and a report is returned, or nothing is;
/// callers publish the report only on success.
pub fn process_uploads(appointments: &Upload, remarks: &Upload) -> Result<MergeReport> {
    let appointments_name = appointments.ensure_present()?;
    remarks.ensure_present()?;
    appointments.ensure_allowed_type()?;
    remarks.ensure_allowed_type()?;

    let records = load_appointments(&appointments.bytes)?;
    let appointment_rows = records.len();
    tracing::info!(
        file = appointments_name,
        rows = appointment_rows,
        "processed appointments"
    );

    let lookup = load_lookup(&remarks.bytes)?;
    let outcome = merge(records, &lookup);
    tracing::info!(
        identifiers = lookup.len(),
        matched = outcome.matched_appointments,
        total_rows = outcome.records.len(),
        "updated appointments with remarks and agent names"
    );

    Ok(MergeReport {
        records: outcome.records,
        remark_ids: lookup.len(),
        source_stem: output_stem(appointments_name),
        appointment_rows,
        matched_appointments: outcome.matched_appointments,
    })
}
