use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::io::Cursor;
use std::path::Path;

/// Options for writing Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxWriteOptions {
    /// Render the first row bold and center-aligned
    pub header_row: bool,
    /// Size each column to its longest text plus two, capped at this width
    pub max_column_width: Option<u16>,
}

impl XlsxWriteOptions {
    /// Set whether the first row is a header row
    #[must_use]
    pub fn with_header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }

    /// Enable column auto-sizing capped at `max`
    #[must_use]
    pub fn with_max_column_width(mut self, max: u16) -> Self {
        self.max_column_width = Some(max);
        self
    }
}

/// Render a date cell; serials below one day carry no date part.
fn format_datetime(naive: NaiveDateTime, serial: f64) -> String {
    if (0.0..1.0).contains(&serial) {
        naive.format("%H:%M:%S").to_string()
    } else {
        naive.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::String(format_datetime(naive, dt.as_f64())),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Convert a calamine range into sheet rows anchored at A1.
///
/// calamine ranges start at the first populated cell, so leading empty rows
/// and columns are padded back in to keep row numbers absolute.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut data: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut row_data: Vec<CellValue> = vec![CellValue::Null; start_col as usize];
        row_data.extend(row.iter().map(data_to_cell_value));
        data.push(row_data);
    }

    data
}

impl Book {
    /// Load a book from in-memory `.xlsx` or `.xls` content (all sheets)
    ///
    /// The format is detected from the content, not from a file name.
    ///
    /// # Errors
    ///
    /// Returns error if the content is not a readable workbook.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut book = Book::new();

        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name)?;

            let mut sheet = Sheet::with_name(&sheet_name);
            *sheet.data_mut() = range_to_rows(&range);
            tracing::debug!(
                sheet = %sheet_name,
                rows = sheet.row_count(),
                cols = sheet.col_count(),
                "loaded worksheet"
            );

            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Load a book from an Excel file (all sheets)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_xlsx_bytes(&bytes)
    }
}

impl Sheet {
    /// Render the sheet as an in-memory `.xlsx` document
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled.
    pub fn to_xlsx_bytes(&self, options: &XlsxWriteOptions) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        self.write_to_worksheet(worksheet, options)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Save the sheet to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P, options: &XlsxWriteOptions) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        self.write_to_worksheet(worksheet, options)?;

        workbook.save(path.as_ref())?;

        Ok(())
    }

    /// Write sheet data to a worksheet
    fn write_to_worksheet(&self, worksheet: &mut Worksheet, options: &XlsxWriteOptions) -> Result<()> {
        worksheet.set_name(self.name())?;

        let header_format = Format::new().set_bold().set_align(FormatAlign::Center);

        for (row_idx, row) in self.data().iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| SheetError::IndexOverflow(format!("row {row_idx}")))?;

            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| SheetError::IndexOverflow(format!("column {col_idx}")))?;

                if options.header_row && row_idx == 0 {
                    worksheet.write_string_with_format(row_num, col_num, cell.as_str(), &header_format)?;
                    continue;
                }

                match cell {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                    CellValue::Int(i) => {
                        // Note: Excel stores all numbers as f64, so integers > 2^53
                        // (9,007,199,254,740,992) may lose precision
                        worksheet.write_number(row_num, col_num, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(row_num, col_num, *f)?;
                    }
                    CellValue::String(s) if s.is_empty() => {}
                    CellValue::String(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                }
            }
        }

        if let Some(max) = options.max_column_width {
            for (col_idx, width) in self.column_widths(max).into_iter().enumerate() {
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| SheetError::IndexOverflow(format!("column {col_idx}")))?;
                worksheet.set_column_width(col_num, f64::from(width))?;
            }
        }

        Ok(())
    }

    /// Column widths: longest rendered text (in chars) plus two, capped at `max`
    #[must_use]
    pub fn column_widths(&self, max: u16) -> Vec<u16> {
        let mut widths = vec![0usize; self.col_count()];
        for row in self.rows() {
            for (col_idx, cell) in row.iter().enumerate() {
                let len = cell.as_str().chars().count();
                if len > widths[col_idx] {
                    widths[col_idx] = len;
                }
            }
        }

        widths
            .into_iter()
            .map(|len| u16::try_from(len + 2).unwrap_or(u16::MAX).min(max))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn workbook_bytes(sheets: Vec<(&str, u32, Vec<Vec<&str>>)>) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, first_row, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    if !value.is_empty() {
                        worksheet
                            .write_string(first_row + r as u32, c as u16, *value)
                            .unwrap();
                    }
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_book_from_bytes_preserves_sheet_order() {
        let bytes = workbook_bytes(vec![
            ("Numbers", 0, vec![vec!["1", "2"]]),
            ("Letters", 0, vec![vec!["a", "b"]]),
        ]);

        let book = Book::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(
            book.sheets().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["Numbers", "Letters"]
        );
        assert_eq!(book.active_sheet().unwrap().name(), "Numbers");
        assert_eq!(book.get_sheet("Letters").unwrap().text(0, 1), "b");
    }

    #[test]
    fn test_leading_empty_rows_keep_absolute_positions() {
        let bytes = workbook_bytes(vec![("Data", 2, vec![vec!["", "Patient ID"], vec!["", "42"]])]);

        let book = Book::from_xlsx_bytes(&bytes).unwrap();
        let sheet = book.get_sheet("Data").unwrap();

        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.text(2, 1), "Patient ID");
        assert_eq!(sheet.text(3, 1), "42");
        assert_eq!(sheet.text(0, 0), "");
    }

    #[test]
    fn test_numbers_read_back_as_text() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_number(0, 0, 10.0).unwrap();
        worksheet.write_number(0, 1, 2.5).unwrap();
        worksheet.write_boolean(0, 2, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let book = Book::from_xlsx_bytes(&bytes).unwrap();
        let sheet = book.active_sheet().unwrap();

        assert_eq!(sheet.text(0, 0), "10");
        assert_eq!(sheet.text(0, 1), "2.5");
        assert_eq!(sheet.text(0, 2), "true");
    }

    #[test]
    fn test_time_only_cells_have_no_date_part() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let time = Format::new().set_num_format("hh:mm:ss");
        let stamp = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        worksheet.write_number_with_format(0, 0, 0.5, &time).unwrap();
        worksheet.write_number_with_format(0, 1, 45292.5, &stamp).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let book = Book::from_xlsx_bytes(&bytes).unwrap();
        let sheet = book.active_sheet().unwrap();

        assert_eq!(sheet.text(0, 0), "12:00:00");
        assert_eq!(sheet.text(0, 1), "2024-01-01 12:00:00");
    }

    #[test]
    fn test_garbage_bytes_fail_to_read() {
        let err = Book::from_xlsx_bytes(b"not a spreadsheet").unwrap_err();
        assert!(matches!(err, SheetError::Read(_)));
    }

    #[test]
    fn test_sheet_write_and_read() {
        let mut sheet = Sheet::with_name("Appointment Data");
        sheet.row_append(vec!["Name", "Pat ID"]);
        sheet.row_append(vec!["Alice", "10"]);
        sheet.row_append(vec!["Bob", ""]);

        let options = XlsxWriteOptions::default()
            .with_header_row(true)
            .with_max_column_width(50);
        let bytes = sheet.to_xlsx_bytes(&options).unwrap();

        let loaded = Book::from_xlsx_bytes(&bytes).unwrap();
        let loaded = loaded.get_sheet("Appointment Data").unwrap();

        assert_eq!(loaded.row_count(), 3);
        assert_eq!(loaded.text(0, 1), "Pat ID");
        assert_eq!(loaded.text(1, 0), "Alice");
        assert_eq!(loaded.text(2, 1), "");
    }

    #[test]
    fn test_save_as_xlsx_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let sheet = Sheet::from_data(vec![vec!["a", "b"], vec!["c", "d"]]);
        sheet.save_as_xlsx(&path, &XlsxWriteOptions::default()).unwrap();

        let loaded = Book::from_xlsx(&path).unwrap();
        assert_eq!(loaded.get_sheet("Sheet1").unwrap().text(1, 1), "d");
    }

    #[test]
    fn test_column_widths_capped() {
        let long = "x".repeat(80);
        let sheet = Sheet::from_data(vec![
            vec!["Name".to_string(), "Note".to_string()],
            vec!["Alexandra".to_string(), long],
        ]);

        assert_eq!(sheet.column_widths(50), vec![11, 50]);
    }

    #[test]
    fn test_column_widths_count_chars_not_bytes() {
        let sheet = Sheet::from_data(vec![vec!["Zoë"]]);
        assert_eq!(sheet.column_widths(50), vec![5]);
    }
}
