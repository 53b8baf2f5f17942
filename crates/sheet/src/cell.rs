use std::fmt;

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Get the value as display text.
    ///
    /// Integral floats render without a fraction (`10.0` becomes `"10"`),
    /// matching how an integer cell reads back.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_null_is_empty() {
        assert_eq!(CellValue::Null.as_str(), "");
    }

    #[test]
    fn test_display_integral_float() {
        assert_eq!(CellValue::Float(10.0).as_str(), "10");
        assert_eq!(CellValue::Float(2.5).as_str(), "2.5");
        assert_eq!(CellValue::Int(-7).as_str(), "-7");
    }

    #[test]
    fn test_display_text_kept_verbatim() {
        assert_eq!(CellValue::from(" 10.0 ").as_str(), " 10.0 ");
        assert_eq!(CellValue::Bool(true).as_str(), "true");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from("x"), CellValue::String("x".to_string()));
        assert_eq!(CellValue::from(String::new()), CellValue::String(String::new()));
    }
}
