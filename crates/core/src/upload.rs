//! Upload validation and output naming.

use crate::error::{MergeError, Result, UploadKind};
use unicode_normalization::UnicodeNormalization as _;

/// Extensions accepted for either upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// MIME type of the merged download.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// One uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub kind: UploadKind,
    /// Client-supplied file name, if any.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(kind: UploadKind, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Upload {
            kind,
            filename: Some(filename.into()),
            bytes,
        }
    }

    /// A form field that was not submitted.
    pub fn missing(kind: UploadKind) -> Self {
        Upload {
            kind,
            filename: None,
            bytes: Vec::new(),
        }
    }

    /// Fail unless a named, non-empty file was supplied.
    pub fn ensure_present(&self) -> Result<&str> {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() && !self.bytes.is_empty() => Ok(name),
            _ => Err(MergeError::MissingUpload { kind: self.kind }),
        }
    }

    /// Fail unless the file name carries an allowed extension.
    pub fn ensure_allowed_type(&self) -> Result<()> {
        let name = self.ensure_present()?;
        if allowed_excel_file(name) {
            Ok(())
        } else {
            Err(MergeError::InvalidFileType {
                kind: self.kind,
                filename: name.to_string(),
            })
        }
    }
}

/// `true` when the text after the last `.` is an allowed extension
/// (case-insensitive).
#[must_use]
pub fn allowed_excel_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reduce a client file name to a safe ASCII basename.
///
/// Accented letters fold to their NFKD base letter (`é` becomes `e`) and other
/// non-ASCII text is dropped. Path separators count as whitespace, whitespace
/// runs become `_`, anything outside `[A-Za-z0-9._-]` is dropped and
/// leading/trailing `.`/`_` trimmed.
#[must_use]
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Stem used to name the download, e.g. `"Clinic Week 3.xlsx"` gives
/// `"Clinic_Week_3"`.
#[must_use]
pub fn output_stem(filename: &str) -> String {
    let safe = secure_filename(filename);
    let stem = match safe.rfind('.') {
        Some(idx) if idx > 0 => &safe[..idx],
        _ => safe.as_str(),
    };

    if stem.is_empty() {
        "appointments".to_string()
    } else {
        stem.to_string()
    }
}

/// Attachment name for the merged workbook.
#[must_use]
pub fn download_name(stem: &str) -> String {
    format!("{stem}_appointments.xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_excel_file("week.xlsx"));
        assert!(allowed_excel_file("WEEK.XLS"));
        assert!(allowed_excel_file("a.b.xlsx"));
        assert!(!allowed_excel_file("week.csv"));
        assert!(!allowed_excel_file("xlsx"));
        assert!(!allowed_excel_file("week.xlsx.bak"));
    }

    #[test]
    fn test_missing_upload() {
        let upload = Upload::missing(UploadKind::Appointments);
        assert!(matches!(
            upload.ensure_present(),
            Err(MergeError::MissingUpload {
                kind: UploadKind::Appointments
            })
        ));

        let unnamed = Upload::new(UploadKind::Remarks, "", b"data".to_vec());
        assert!(unnamed.ensure_present().is_err());

        let empty = Upload::new(UploadKind::Remarks, "r.xlsx", Vec::new());
        assert!(empty.ensure_present().is_err());
    }

    #[test]
    fn test_invalid_type_message() {
        let upload = Upload::new(UploadKind::Remarks, "remarks.csv", b"a,b".to_vec());
        let err = upload.ensure_allowed_type().unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid Remarks Excel file type. Please upload .xlsx or .xls"
        );
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool file.xlsx"), "My_cool_file.xlsx");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\week.xls"), "C_Users_me_week.xls");
        assert_eq!(secure_filename("résumé.xlsx"), "resume.xlsx");
        assert_eq!(secure_filename("Zoë ﬁles.xls"), "Zoe_files.xls");
        assert_eq!(secure_filename("日本.xlsx"), "xlsx");
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem("Clinic Week 3.xlsx"), "Clinic_Week_3");
        assert_eq!(output_stem("a.b.xlsx"), "a.b");
        assert_eq!(output_stem("noext"), "noext");
        assert_eq!(output_stem("???.xlsx"), "xlsx");
        assert_eq!(output_stem("///"), "appointments");
        assert_eq!(download_name("week"), "week_appointments.xlsx");
    }
}
