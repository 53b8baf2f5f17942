//! # apptmerge-core
//!
//! Matches an appointment list against a remarks lookup table, both read from
//! spreadsheet uploads whose header names, sheet placement and header row are
//! not known in advance.
//!
//! The flow is: locate the identifier column in the appointments workbook,
//! locate the identifier and remark columns in the remarks workbook, join on
//! the normalized identifier (one appointment may expand into several rows),
//! then export the merged rows as `.xlsx`.
//!
//! ```
//! use apptmerge_core::{merge, LookupEntry, LookupMap, Record};
//!
//! let appointment: Record = [("Pat ID", "10"), ("Name", "Alice")].into_iter().collect();
//! let mut lookup = LookupMap::new();
//! lookup.entry("10".to_string()).or_default().push(LookupEntry::new("late", "Amy"));
//! lookup.entry("10".to_string()).or_default().push(LookupEntry::new("no-show", "Ben"));
//!
//! let outcome = merge(vec![appointment], &lookup);
//! assert_eq!(outcome.records.len(), 2);
//! assert_eq!(outcome.matched_appointments, 1);
//! ```

mod error;
mod export;
mod extract;
mod locate;
mod merge;
mod pipeline;
mod record;
mod upload;

pub use error::{MergeError, Result, UploadKind};
pub use export::{export_columns, export_sheet, export_xlsx, EXPORT_SHEET_NAME, MAX_COLUMN_WIDTH};
pub use extract::{extract_appointments, extract_lookup};
pub use locate::{
    clean_header, locate_appointments, locate_lookup, AppointmentLayout, ColumnRule, LookupLayout,
    HEADER_SCAN_ROWS,
};
pub use merge::{merge, MergeOutcome};
pub use pipeline::{load_appointments, load_lookup, process_uploads, MergeReport, ResultsView};
pub use record::{normalize_id, LookupEntry, LookupMap, Record, AGENT_NAME, PAT_ID, REMARK};
pub use upload::{
    allowed_excel_file, download_name, output_stem, secure_filename, Upload, ALLOWED_EXTENSIONS,
    XLSX_MIME,
};
