use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct Book {
    sheets: IndexMap<String, Sheet>,
    active_sheet: Option<String>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Book {
            sheets: IndexMap::new(),
            active_sheet: None,
        }
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get the active sheet
    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active_sheet
            .as_ref()
            .and_then(|name| self.sheets.get(name))
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);

        // Set as active if first sheet
        if self.active_sheet.is_none() {
            self.active_sheet = Some(name.to_string());
        }

        Ok(())
    }

    /// Iterate over sheets in workbook order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sheet_is_active() {
        let mut book = Book::new();
        book.add_sheet("Summary", Sheet::with_name("Sheet1")).unwrap();
        book.add_sheet("Data", Sheet::with_name("Sheet1")).unwrap();

        assert_eq!(book.active_sheet().unwrap().name(), "Summary");
        assert_eq!(book.sheet_names(), vec!["Summary", "Data"]);
    }

    #[test]
    fn test_duplicate_sheet_rejected() {
        let mut book = Book::new();
        book.add_sheet("Data", Sheet::with_name("Sheet1")).unwrap();
        let err = book.add_sheet("Data", Sheet::with_name("Sheet1")).unwrap_err();
        assert!(matches!(err, SheetError::SheetAlreadyExists { .. }));
    }

    #[test]
    fn test_added_sheets_take_their_key_as_name() {
        let mut book = Book::new();
        book.add_sheet("B", Sheet::with_name("Sheet1")).unwrap();
        book.add_sheet("A", Sheet::with_name("Sheet1")).unwrap();

        let names: Vec<_> = book.sheets().map(|(key, sheet)| (key, sheet.name())).collect();
        assert_eq!(names, vec![("B", "B"), ("A", "A")]);
        assert!(matches!(
            book.get_sheet("C"),
            Err(SheetError::SheetNotFound { .. })
        ));
    }
}
