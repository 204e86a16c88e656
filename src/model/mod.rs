use crate::error::{Result, ToolError};

/// Label given to the vehicle make and model column.
pub const MAKE_MODEL: &str = "Make/Model";
/// Label given to the year of manufacture column.
pub const YEAR_OF_MANUFACTURE: &str = "Year of manufacture";
/// Label given to the fuel type column.
pub const FUEL_TYPE: &str = "Fuel type";
/// Label of the column holding the former postcode column labels.
pub const POSTCODE: &str = "Postcode";
/// Label of the column holding the registration counts.
pub const COUNT: &str = "Count";

/// Columns identifying a row of the source table. Every other column is a
/// postcode.
pub const ID_COLUMNS: [&str; 3] = [MAKE_MODEL, YEAR_OF_MANUFACTURE, FUEL_TYPE];

/// Columns of the written table, in order.
pub const OUTPUT_COLUMNS: [&str; 5] = [POSTCODE, MAKE_MODEL, YEAR_OF_MANUFACTURE, FUEL_TYPE, COUNT];

/// Cell texts read as missing values, besides the empty cell. These are the
/// markers spreadsheet and dataframe tools emit for "not available".
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether `cell` holds a missing value.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// An in-memory table with ordered column labels.
///
/// Cells are kept as text. An empty cell stands for a missing value. Every
/// row holds exactly one cell per column, and `lines[i]` is the 1-based
/// source line row `i` was derived from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub lines: Vec<usize>,
}

impl Table {
    /// Builds a table whose rows are numbered from line 1.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let lines = (1..=rows.len()).collect();
        Self::with_lines(columns, rows, lines)
    }

    pub fn with_lines(columns: Vec<String>, rows: Vec<Vec<String>>, lines: Vec<usize>) -> Self {
        debug_assert_eq!(rows.len(), lines.len());
        Self {
            columns,
            rows,
            lines,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column labelled `label`.
    pub fn column_index(&self, label: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == label)
            .ok_or_else(|| ToolError::MissingColumn(label.to_string()))
    }

    /// Cells of the column labelled `label`, top to bottom.
    pub fn column_values(&self, label: &str) -> Result<Vec<&str>> {
        let index = self.column_index(label)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

/// Describes where things sit in the registration export.
///
/// The defaults match the published spreadsheet: the postcode header is the
/// tenth row, a second header row follows it, the make/model and year
/// columns have no label, and the fuel type column is labelled
/// `Aust Postcode`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLayout {
    /// Zero-based record index of the header row.
    pub header_row: usize,
    /// Number of records directly below the header that are discarded.
    pub skip_rows_after_header: usize,
    /// Position of the unlabelled make/model column.
    pub make_model_position: usize,
    /// Position of the unlabelled year of manufacture column.
    pub year_position: usize,
    /// Header label that actually sits above the fuel type values.
    pub fuel_type_source: String,
    /// Label suffix marking footnote columns.
    pub annotation_suffix: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            header_row: 9,
            skip_rows_after_header: 1,
            make_model_position: 0,
            year_position: 1,
            fuel_type_source: "Aust Postcode".to_string(),
            annotation_suffix: " - Annotations".to_string(),
        }
    }
}

/// Label given to a blank header cell at `position`.
pub fn unnamed_label(position: usize) -> String {
    format!("Unnamed: {position}")
}

/// Row and column counts gathered while reformatting one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReformatSummary {
    pub source_rows: usize,
    pub postcode_columns: usize,
    pub melted_rows: usize,
    pub written_rows: usize,
}
