use crate::cell::CellValue;

/// A sheet representing a 2D grid of cells (row-major storage)
///
/// Rows may be ragged; cells past the end of a row read as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            data: converted,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get a cell (0-based), `None` when outside the populated grid
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell rendered as text; missing cells render as `""`
    #[must_use]
    pub fn text(&self, row: usize, col: usize) -> String {
        self.get(row, col).map(CellValue::as_str).unwrap_or_default()
    }

    /// Append a row
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) {
        self.data.push(data.into_iter().map(Into::into).collect());
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get the underlying data
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable access to the underlying data
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows() {
        let mut sheet = Sheet::with_name("Sheet1");
        sheet.row_append(vec!["a", "b", "c"]);
        sheet.row_append(vec!["d"]);

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(sheet.get(1, 2), None);
        assert_eq!(sheet.text(1, 2), "");
        assert_eq!(sheet.text(0, 1), "b");
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let sheet = Sheet::from_data(vec![vec!["1", "2"]]);
        assert_eq!(sheet.text(5, 0), "");
        assert_eq!(sheet.get(0, 2), None);
        assert_eq!(sheet.text(0, 1), "2");
    }
}
