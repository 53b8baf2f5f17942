//! Workbook model for apptmerge
//!
//! Reads `.xlsx` and `.xls` uploads into an ordered [`Book`] of [`Sheet`]s and
//! writes a single sheet back out as `.xlsx`.
//!
//! # Examples
//!
//! ```
//! use apptmerge_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Data", Sheet::from_data(vec![vec!["Pat ID"], vec!["10"]])).unwrap();
//!
//! let sheet = book.active_sheet().unwrap();
//! assert_eq!(sheet.text(1, 0), "10");
//! assert_eq!(sheet.text(9, 9), "");
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export XLSX write options.
pub use xlsx::XlsxWriteOptions;
