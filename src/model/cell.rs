//! Cell values.

use std::fmt;

/// The value held by a single worksheet cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// String content, including dates rendered as text and error codes
    Text(String),
    /// Numeric content
    Number(f64),
    /// Boolean content
    Boolean(bool),
    /// No value
    #[default]
    Empty,
}

impl CellValue {
    /// Create a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if this cell carries no value.
    ///
    /// An empty string counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the value as a CSV field (before quoting).
    ///
    /// Integral numbers below 1e15 in magnitude are written without a
    /// fractional part; other numbers use the shortest decimal that
    /// round-trips. Booleans are `True`/`False`.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(true) => "True".to_string(),
            CellValue::Boolean(false) => "False".to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        // -0.0 prints as "0"
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}
