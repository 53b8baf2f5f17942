//! Turning located sheets into records and lookup entries.

use crate::error::{MergeError, Result, UploadKind};
use crate::locate::{AppointmentLayout, LookupLayout};
use crate::record::{normalize_id, LookupEntry, LookupMap, Record, AGENT_NAME, PAT_ID, REMARK};
use apptmerge_sheet::{Book, Sheet};

fn layout_sheet<'a>(book: &'a Book, name: &str, kind: UploadKind) -> Result<&'a Sheet> {
    book.get_sheet(name)
        .map_err(|source| MergeError::Parse { kind, source })
}

/// Build one record per data row below the header.
///
/// Every column is kept verbatim under its header; the identifier is then
/// normalized into [`PAT_ID`] and the reserved remark fields are added empty.
/// Rows without an identifier are dropped.
pub fn extract_appointments(book: &Book, layout: &AppointmentLayout) -> Result<Vec<Record>> {
    let sheet = layout_sheet(book, &layout.sheet, UploadKind::Appointments)?;
    let keys = layout.record_keys();

    let mut records = Vec::new();
    for row in layout.header_row + 1..sheet.row_count() {
        let pat_id = normalize_id(&sheet.text(row, layout.id_col));
        if pat_id.is_empty() {
            continue;
        }

        let mut record: Record = keys
            .iter()
            .enumerate()
            .map(|(col, key)| (key.as_str(), sheet.text(row, col)))
            .collect();

        record.insert(PAT_ID, pat_id);
        record.ensure(REMARK);
        record.ensure(AGENT_NAME);
        records.push(record);
    }

    tracing::debug!(
        sheet = %layout.sheet,
        rows = records.len(),
        "extracted appointments"
    );
    Ok(records)
}

/// Collect remarks per normalized identifier, appending when an identifier
/// recurs. Rows without an identifier are skipped.
pub fn extract_lookup(book: &Book, layout: &LookupLayout) -> Result<LookupMap> {
    let sheet = layout_sheet(book, &layout.sheet, UploadKind::Remarks)?;

    let mut lookup = LookupMap::new();
    for row in layout.header_row + 1..sheet.row_count() {
        let pat_id = normalize_id(&sheet.text(row, layout.id_col));
        if pat_id.is_empty() {
            continue;
        }

        let remark = sheet.text(row, layout.remark_col).trim().to_string();
        let agent_name = layout
            .agent_name_col
            .map(|col| sheet.text(row, col).trim().to_string())
            .unwrap_or_default();

        lookup
            .entry(pat_id)
            .or_default()
            .push(LookupEntry::new(remark, agent_name));
    }

    tracing::debug!(
        sheet = %layout.sheet,
        identifiers = lookup.len(),
        "extracted remarks"
    );
    Ok(lookup)
}
