use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Failed to read workbook: {0}")]
    Read(String),

    #[error("Failed to write workbook: {0}")]
    Write(String),

    #[error("Index overflow: {0}")]
    IndexOverflow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Read(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Write(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
