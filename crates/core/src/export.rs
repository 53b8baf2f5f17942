//! Writing merged records back out as a spreadsheet.

use crate::error::{MergeError, Result};
use crate::record::{Record, AGENT_NAME, PAT_ID, REMARK};
use apptmerge_sheet::{Sheet, XlsxWriteOptions};
use indexmap::IndexSet;

/// Name of the single worksheet in the export.
pub const EXPORT_SHEET_NAME: &str = "Appointment Data";
/// Column width cap, in characters.
pub const MAX_COLUMN_WIDTH: u16 = 50;

/// Export column order: every key in first-seen order, with `Pat ID`,
/// `Remark` and `Agent Name` moved to the end.
#[must_use]
pub fn export_columns(records: &[Record]) -> Vec<String> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        columns.extend(record.keys());
    }

    let reserved = [PAT_ID, REMARK, AGENT_NAME];
    columns
        .into_iter()
        .filter(|key| !reserved.contains(key))
        .chain(reserved)
        .map(str::to_string)
        .collect()
}

/// Lay the records out as a header row plus one row per record.
///
/// No records gives an empty sheet.
#[must_use]
pub fn export_sheet(records: &[Record]) -> Sheet {
    let mut sheet = Sheet::with_name(EXPORT_SHEET_NAME);
    if records.is_empty() {
        return sheet;
    }

    let columns = export_columns(records);
    sheet.row_append(columns.clone());
    for record in records {
        let row: Vec<&str> = columns
            .iter()
            .map(|key| record.get(key).unwrap_or_default())
            .collect();
        sheet.row_append(row);
    }

    sheet
}

/// Render the records as `.xlsx` bytes: bold centered header, columns sized
/// to their longest text plus two, capped at [`MAX_COLUMN_WIDTH`].
pub fn export_xlsx(records: &[Record]) -> Result<Vec<u8>> {
    let options = XlsxWriteOptions::default()
        .with_header_row(true)
        .with_max_column_width(MAX_COLUMN_WIDTH);

    export_sheet(records)
        .to_xlsx_bytes(&options)
        .map_err(MergeError::Export)
}
