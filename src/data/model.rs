use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as handed over by the spreadsheet readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Whole numbers print without the trailing ".0" so that numeric
            // phone cells read like the digits typed into the sheet.
            CellValue::Number(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
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
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

// ---------------------------------------------------------------------------
// Row – one data row of a sheet
// ---------------------------------------------------------------------------

/// Where a row was read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provenance {
    pub file: String,
    pub sheet: String,
}

/// A single data row: header → value, plus the file/sheet it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
    pub source: Provenance,
}

impl Row {
    pub fn new(cells: BTreeMap<String, CellValue>, source: Provenance) -> Self {
        Self { cells, source }
    }

    /// Cell for `column`; `None` when the row carries no such header.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// String form of the cell, empty when the header is absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// SheetTable – everything produced by one load operation
// ---------------------------------------------------------------------------

/// Rows from one or more source files sharing a display header order.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    /// Display order of the columns (first non-empty source wins).
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// File names that contributed to this table, in load order.
    pub sources: Vec<String>,
}

impl SheetTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another table. Headers are adopted only if none are set yet
    /// and the other table actually has rows.
    pub fn append(&mut self, other: SheetTable) {
        if self.headers.is_empty() && !other.rows.is_empty() {
            self.headers = other.headers;
        }
        self.rows.extend(other.rows);
        self.sources.extend(other.sources);
    }
}
