//! Error types for apptmerge.

use apptmerge_sheet::SheetError;
use std::fmt;
use thiserror::Error;

/// Result type for apptmerge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Which of the two uploads an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// The primary appointment list.
    Appointments,
    /// The remarks lookup table.
    Remarks,
}

impl UploadKind {
    /// Multipart form field carrying this upload.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Appointments => "appointments_file",
            UploadKind::Remarks => "remarks_file",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadKind::Appointments => write!(f, "Appointments"),
            UploadKind::Remarks => write!(f, "Remarks"),
        }
    }
}

/// Errors that can occur while validating, matching or exporting uploads.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A required upload was absent or empty.
    #[error("Please upload the {kind} Excel file.")]
    MissingUpload { kind: UploadKind },

    /// The upload's extension is not `.xlsx` or `.xls`.
    #[error("Invalid {kind} Excel file type. Please upload .xlsx or .xls")]
    InvalidFileType { kind: UploadKind, filename: String },

    /// A required column could not be detected in any sheet.
    #[error("{}", column_not_found(.column, .sheets, .found.as_deref()))]
    ColumnNotFound {
        kind: UploadKind,
        column: &'static str,
        sheets: Vec<String>,
        /// Non-empty header cells seen on the fallback row (appointments only).
        found: Option<Vec<String>>,
    },

    /// The upload could not be read as a workbook.
    #[error("{source}")]
    Parse {
        kind: UploadKind,
        #[source]
        source: SheetError,
    },

    /// The merged records could not be written as a workbook.
    #[error("Error creating Excel file: {0}")]
    Export(#[source] SheetError),
}

impl MergeError {
    /// Message shown to the person who submitted the uploads.
    ///
    /// Detection and read failures are prefixed with the upload they came from.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            MergeError::ColumnNotFound { kind, .. } | MergeError::Parse { kind, .. } => {
                format!("Error processing {kind} Excel: {self}")
            }
            _ => self.to_string(),
        }
    }
}

fn column_not_found(column: &str, sheets: &[String], found: Option<&[String]>) -> String {
    let checked = sheets.join(", ");
    match found {
        Some(found) => {
            let found = if found.is_empty() {
                "none".to_string()
            } else {
                found
                    .iter()
                    .map(|h| format!("'{h}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "{column} column not found in appointments Excel. Checked sheets: {checked}. \
                 Found columns: {found}. Please ensure there's a column containing 'Pat ID', \
                 'Patient ID', or similar."
            )
        }
        None => format!("{column} column not found in Excel file. Checked sheets: {checked}"),
    }
}
