//! Header detection across every sheet of an uploaded workbook.
//!
//! Header names are matched fuzzily: each cell is lower-cased and stripped of
//! spaces, underscores, hyphens and periods, then tested against substring
//! rules. The first sheet (in workbook order) and first of its leading rows
//! that satisfies the required rules wins; candidates are never scored.

use crate::error::{MergeError, Result, UploadKind};
use apptmerge_sheet::{Book, Sheet};
use indexmap::IndexSet;

/// How many leading rows of each sheet may hold the header.
pub const HEADER_SCAN_ROWS: usize = 5;

/// Lower-case a header cell and drop separator characters.
///
/// ```
/// use apptmerge_core::clean_header;
///
/// assert_eq!(clean_header(" Patient_ID. "), "patientid");
/// assert_eq!(clean_header("Agent-Name"), "agentname");
/// ```
#[must_use]
pub fn clean_header(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .collect()
}

/// Substring rules applied to cleaned header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// "pat" and "id", or exactly "pid".
    AppointmentId,
    /// "patient" and "id", or exactly "pid".
    LookupId,
    /// "remark".
    Remark,
    /// "agent" and "name".
    AgentName,
}

impl ColumnRule {
    #[must_use]
    pub fn matches(self, cleaned: &str) -> bool {
        match self {
            ColumnRule::AppointmentId => {
                (cleaned.contains("pat") && cleaned.contains("id")) || cleaned == "pid"
            }
            ColumnRule::LookupId => {
                (cleaned.contains("patient") && cleaned.contains("id")) || cleaned == "pid"
            }
            ColumnRule::Remark => cleaned.contains("remark"),
            ColumnRule::AgentName => cleaned.contains("agent") && cleaned.contains("name"),
        }
    }
}

/// Where the appointment list lives in its workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentLayout {
    pub sheet: String,
    /// 0-based; data starts on the next row.
    pub header_row: usize,
    /// 0-based identifier column.
    pub id_col: usize,
    /// Trimmed header text for every column of the sheet.
    pub headers: Vec<String>,
}

impl AppointmentLayout {
    /// Record keys, one per column.
    ///
    /// Empty headers become `Column N` (1-based) and repeated names get a
    /// ` (2)`, ` (3)`, ... suffix, so no column overwrites another.
    #[must_use]
    pub fn record_keys(&self) -> Vec<String> {
        let mut seen: IndexSet<String> = IndexSet::with_capacity(self.headers.len());
        let mut keys = Vec::with_capacity(self.headers.len());

        for (idx, header) in self.headers.iter().enumerate() {
            let base = if header.is_empty() {
                format!("Column {}", idx + 1)
            } else {
                header.clone()
            };

            let mut key = base.clone();
            let mut n = 2;
            while seen.contains(&key) {
                key = format!("{base} ({n})");
                n += 1;
            }

            seen.insert(key.clone());
            keys.push(key);
        }

        keys
    }
}

/// Where the remarks lookup lives in its workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupLayout {
    pub sheet: String,
    /// 0-based; data starts on the next row.
    pub header_row: usize,
    pub id_col: usize,
    pub remark_col: usize,
    pub agent_name_col: Option<usize>,
}

fn header_row(sheet: &Sheet, row: usize) -> Vec<String> {
    (0..sheet.col_count())
        .map(|col| sheet.text(row, col).trim().to_string())
        .collect()
}

fn candidate_rows(sheet: &Sheet) -> std::ops::Range<usize> {
    0..sheet.row_count().min(HEADER_SCAN_ROWS)
}

fn sheet_names(book: &Book) -> Vec<String> {
    book.sheet_names().into_iter().map(str::to_string).collect()
}

fn find_appointment_id(headers: &[String]) -> Option<usize> {
    headers
        .iter()
        .position(|h| ColumnRule::AppointmentId.matches(&clean_header(h)))
}

/// Find the appointment sheet: any row among the first few with an identifier
/// column. Only the identifier is required.
pub fn locate_appointments(book: &Book) -> Result<AppointmentLayout> {
    for (name, sheet) in book.sheets() {
        for row in candidate_rows(sheet) {
            let headers = header_row(sheet, row);
            if let Some(id_col) = find_appointment_id(&headers) {
                tracing::debug!(sheet = name, row, id_col, "appointments header found");
                return Ok(AppointmentLayout {
                    sheet: name.to_string(),
                    header_row: row,
                    id_col,
                    headers,
                });
            }
        }
    }

    // Fall back to the first row of the active sheet.
    let fallback = book.active_sheet();
    let headers = fallback.map(|sheet| header_row(sheet, 0)).unwrap_or_default();

    match (fallback, find_appointment_id(&headers)) {
        (Some(sheet), Some(id_col)) => Ok(AppointmentLayout {
            sheet: sheet.name().to_string(),
            header_row: 0,
            id_col,
            headers,
        }),
        _ => Err(MergeError::ColumnNotFound {
            kind: UploadKind::Appointments,
            column: "Pat ID",
            sheets: sheet_names(book),
            found: Some(headers.into_iter().filter(|h| !h.is_empty()).collect()),
        }),
    }
}

#[derive(Default)]
struct LookupColumns {
    id: Option<usize>,
    remark: Option<usize>,
    agent_name: Option<usize>,
}

/// Classify each cell of one row. A cell is claimed by the first rule it
/// satisfies (identifier, then remark, then agent name); later cells matching
/// the same rule replace earlier ones.
fn scan_lookup_row(sheet: &Sheet, row: usize) -> LookupColumns {
    let mut found = LookupColumns::default();

    for col in 0..sheet.col_count() {
        let cleaned = clean_header(&sheet.text(row, col));
        if ColumnRule::LookupId.matches(&cleaned) {
            found.id = Some(col);
        } else if ColumnRule::Remark.matches(&cleaned) {
            found.remark = Some(col);
        } else if ColumnRule::AgentName.matches(&cleaned) {
            found.agent_name = Some(col);
        }
    }

    found
}

/// Find the remarks sheet: identifier and remark columns are required, agent
/// name is optional.
pub fn locate_lookup(book: &Book) -> Result<LookupLayout> {
    for (name, sheet) in book.sheets() {
        for row in candidate_rows(sheet) {
            let found = scan_lookup_row(sheet, row);
            if let (Some(id_col), Some(remark_col)) = (found.id, found.remark) {
                tracing::debug!(sheet = name, row, id_col, remark_col, "remarks header found");
                return Ok(LookupLayout {
                    sheet: name.to_string(),
                    header_row: row,
                    id_col,
                    remark_col,
                    agent_name_col: found.agent_name,
                });
            }
        }
    }

    let not_found = |column: &'static str| MergeError::ColumnNotFound {
        kind: UploadKind::Remarks,
        column,
        sheets: sheet_names(book),
        found: None,
    };

    // Fall back to the first row of the active sheet.
    let Some(sheet) = book.active_sheet() else {
        return Err(not_found("Patient ID"));
    };
    let found = scan_lookup_row(sheet, 0);
    let id_col = found.id.ok_or_else(|| not_found("Patient ID"))?;
    let remark_col = found.remark.ok_or_else(|| not_found("Remark"))?;

    Ok(LookupLayout {
        sheet: sheet.name().to_string(),
        header_row: 0,
        id_col,
        remark_col,
        agent_name_col: found.agent_name,
    })
}
