use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::model::{SourceLayout, Table, is_missing, unnamed_label};

/// Reads the registration export at `path` into a [`Table`].
///
/// The record at `layout.header_row` supplies the column labels, the
/// records directly below it are discarded, and every remaining record
/// becomes a data row. Missing-value markers such as `NA` are read as empty
/// cells.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_source(path: &Path, layout: &SourceLayout) -> Result<Table> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_source_from(file, layout)
}

/// Same as [`read_source`] but over any reader.
pub fn read_source_from<R: Read>(reader: R, layout: &SourceLayout) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.records();
    let mut seen = 0;
    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if seen == layout.header_row {
                    break record;
                }
                seen += 1;
            }
            None => {
                return Err(ToolError::MissingHeader {
                    header_row: layout.header_row,
                    found: seen,
                });
            }
        }
    };

    let columns = header_labels(&header);
    let width = columns.len();

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for (offset, record) in records.enumerate() {
        let record = record?;
        if offset < layout.skip_rows_after_header {
            continue;
        }
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(layout.header_row + 2 + offset);
        if record.len() > width {
            return Err(ToolError::RaggedRow {
                line,
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<String> = record.iter().map(normalize_cell).collect();
        row.resize(width, String::new());
        rows.push(row);
        lines.push(line);
    }

    debug!(columns = width, rows = rows.len(), "source table loaded");
    Ok(Table::with_lines(columns, rows, lines))
}

/// Trims the cell and blanks out missing-value markers.
fn normalize_cell(cell: &str) -> String {
    if is_missing(cell) {
        String::new()
    } else {
        cell.trim().to_string()
    }
}

/// Turns the raw header record into unique column labels. Blank cells are
/// labelled by position and repeated labels receive a numeric suffix.
fn header_labels(header: &StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut labels = Vec::with_capacity(header.len());

    for (position, cell) in header.iter().enumerate() {
        let trimmed = cell.trim();
        let base = if trimmed.is_empty() {
            unnamed_label(position)
        } else {
            trimmed.to_string()
        };

        let mut label = base.clone();
        let mut counter = 1;
        while used.contains(&label) {
            label = format!("{base}.{counter}");
            counter += 1;
        }
        used.insert(label.clone());
        labels.push(label);
    }

    labels
}
