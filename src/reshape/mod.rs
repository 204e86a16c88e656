//! Table operations used to turn the wide export into the long table.
//!
//! Each operation consumes a [`Table`] and returns the reshaped one, so the
//! pipeline in [`crate::reformat`] reads as a straight sequence of steps.

use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{
    FUEL_TYPE, MAKE_MODEL, SourceLayout, Table, YEAR_OF_MANUFACTURE, is_missing, unnamed_label,
};

/// Gives the identifying columns their semantic labels.
///
/// The make/model and year columns are renamed only while they still carry
/// the generated blank labels. The fuel type column is found by its source
/// label. Labels that are absent are left for later steps to report.
pub fn rename_columns(mut table: Table, layout: &SourceLayout) -> Table {
    let renames = [
        (unnamed_label(layout.make_model_position), MAKE_MODEL),
        (unnamed_label(layout.year_position), YEAR_OF_MANUFACTURE),
        (layout.fuel_type_source.clone(), FUEL_TYPE),
    ];

    for column in &mut table.columns {
        if let Some((_, target)) = renames
            .iter()
            .find(|(source, _)| source.as_str() == column.as_str())
        {
            *column = (*target).to_string();
        }
    }
    table
}

/// Removes every column whose label ends with `suffix`.
pub fn drop_annotation_columns(table: Table, suffix: &str) -> Table {
    let keep: Vec<bool> = table
        .columns
        .iter()
        .map(|column| !column.ends_with(suffix))
        .collect();
    let dropped = keep.iter().filter(|kept| !**kept).count();
    debug!(dropped, "annotation columns removed");

    let columns = retain_flagged(table.columns, &keep);
    let rows = table
        .rows
        .into_iter()
        .map(|row| retain_flagged(row, &keep))
        .collect();
    Table::with_lines(columns, rows, table.lines)
}

fn retain_flagged(values: Vec<String>, keep: &[bool]) -> Vec<String> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(value, kept)| kept.then_some(value))
        .collect()
}

/// Replaces each missing cell of `column` with the closest non-missing cell
/// above it. Missing cells before the first value are left empty.
pub fn forward_fill(mut table: Table, column: &str) -> Result<Table> {
    let index = table.column_index(column)?;
    let mut last: Option<String> = None;

    for row in &mut table.rows {
        let cell = &mut row[index];
        if is_missing(cell) {
            match &last {
                Some(previous) => cell.clone_from(previous),
                None => cell.clear(),
            }
        } else {
            last = Some(cell.clone());
        }
    }
    Ok(table)
}

/// Unpivots every column not listed in `id_columns`.
///
/// The result has the identifying columns followed by `label_column` (the
/// former column label) and `value_column` (the cell). Rows are grouped by
/// former column, in the original column order, each group repeating the
/// source rows in order. The result always has
/// `height * (width - id_columns.len())` rows.
pub fn melt(
    table: Table,
    id_columns: &[&str],
    label_column: &str,
    value_column: &str,
) -> Result<Table> {
    let id_indices = id_columns
        .iter()
        .map(|column| table.column_index(column))
        .collect::<Result<Vec<_>>>()?;
    let value_indices: Vec<usize> = (0..table.width())
        .filter(|index| !id_indices.contains(index))
        .collect();

    let mut columns: Vec<String> = id_columns.iter().map(|column| column.to_string()).collect();
    columns.push(label_column.to_string());
    columns.push(value_column.to_string());

    let mut rows = Vec::with_capacity(table.height() * value_indices.len());
    let mut lines = Vec::with_capacity(rows.capacity());
    for &value_index in &value_indices {
        let label = &table.columns[value_index];
        lines.extend_from_slice(&table.lines);
        for row in &table.rows {
            let mut melted: Vec<String> = id_indices.iter().map(|&i| row[i].clone()).collect();
            melted.push(label.clone());
            melted.push(row[value_index].clone());
            rows.push(melted);
        }
    }

    debug!(
        value_columns = value_indices.len(),
        rows = rows.len(),
        "table melted"
    );
    Ok(Table::with_lines(columns, rows, lines))
}

/// Keeps only rows whose `value_column` holds a number strictly greater
/// than zero. Missing cells are dropped; text that is not a number is an
/// error naming the row's `label_column` value and source line.
pub fn filter_positive(table: Table, value_column: &str, label_column: &str) -> Result<Table> {
    let value_index = table.column_index(value_column)?;
    let label_index = table.column_index(label_column)?;

    let mut rows = Vec::with_capacity(table.height());
    let mut lines = Vec::with_capacity(table.height());
    for (row, line) in table.rows.into_iter().zip(table.lines) {
        let cell = row[value_index].trim();
        if is_missing(cell) {
            continue;
        }
        let count: f64 = cell.parse().map_err(|_| ToolError::InvalidCount {
            postcode: row[label_index].clone(),
            line,
            value: cell.to_string(),
        })?;
        if count > 0.0 {
            rows.push(row);
            lines.push(line);
        }
    }

    Ok(Table::with_lines(table.columns, rows, lines))
}

/// Projects the table onto `columns`, in that order.
pub fn select(table: Table, columns: &[&str]) -> Result<Table> {
    let indices = columns
        .iter()
        .map(|column| table.column_index(column))
        .collect::<Result<Vec<_>>>()?;

    let rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(Table::with_lines(
        columns.iter().map(|column| column.to_string()).collect(),
        rows,
        table.lines,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{COUNT, ID_COLUMNS, POSTCODE};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn rename_maps_blank_labels_and_fuel_column() {
        let source = table(&["Unnamed: 0", "Unnamed: 1", "Aust Postcode", "2000"], &[]);
        let renamed = rename_columns(source, &SourceLayout::default());

        assert_eq!(
            renamed.columns,
            vec![MAKE_MODEL, YEAR_OF_MANUFACTURE, FUEL_TYPE, "2000"]
        );
    }

    #[test]
    fn rename_leaves_labelled_leading_columns_alone() {
        let source = table(&["Brand", "Unnamed: 1", "Aust Postcode"], &[]);
        let renamed = rename_columns(source, &SourceLayout::default());

        assert_eq!(renamed.columns, vec!["Brand", YEAR_OF_MANUFACTURE, FUEL_TYPE]);
        let err = forward_fill(renamed, MAKE_MODEL).unwrap_err();
        assert!(matches!(err, ToolError::MissingColumn(label) if label == MAKE_MODEL));
    }

    #[test]
    fn annotation_columns_are_removed_from_header_and_rows() {
        let source = table(
            &["Fuel type", "2000", "2000 - Annotations", "2001", "2001 - Annotations"],
            &[&["Petrol", "5", "note", "1", ""]],
        );
        let cleaned = drop_annotation_columns(source, " - Annotations");

        assert_eq!(cleaned.columns, vec!["Fuel type", "2000", "2001"]);
        assert_eq!(cleaned.rows, vec![vec!["Petrol", "5", "1"]]);
    }

    #[test]
    fn forward_fill_follows_row_order() {
        let source = table(
            &[MAKE_MODEL, YEAR_OF_MANUFACTURE],
            &[&["", "2019"], &["Acme", "2020"], &["", "2021"], &["Bolt", "2020"], &["", "2022"]],
        );
        let filled = forward_fill(source, MAKE_MODEL).expect("column present");

        let makes = filled.column_values(MAKE_MODEL).expect("column present");
        assert_eq!(makes, vec!["", "Acme", "Acme", "Bolt", "Bolt"]);
    }

    #[test]
    fn forward_fill_treats_missing_markers_as_gaps() {
        let source = table(
            &[MAKE_MODEL, YEAR_OF_MANUFACTURE],
            &[&["NA", "2019"], &["Acme", "2020"], &["NA", "2021"], &["n/a", "2022"]],
        );
        let filled = forward_fill(source, MAKE_MODEL).expect("column present");

        let makes = filled.column_values(MAKE_MODEL).expect("column present");
        assert_eq!(makes, vec!["", "Acme", "Acme", "Acme"]);
    }

    #[test]
    fn melt_multiplies_rows_by_postcode_columns() {
        let source = table(
            &[MAKE_MODEL, YEAR_OF_MANUFACTURE, FUEL_TYPE, "2000", "2001", "2002"],
            &[&["Acme", "2020", "Petrol", "1", "2", "3"], &["Acme", "2021", "Diesel", "4", "", "6"]],
        );
        let melted = melt(source, &ID_COLUMNS, POSTCODE, COUNT).expect("melted");

        assert_eq!(melted.height(), 6);
        assert_eq!(
            melted.columns,
            vec![MAKE_MODEL, YEAR_OF_MANUFACTURE, FUEL_TYPE, POSTCODE, COUNT]
        );
        assert_eq!(melted.rows[0], vec!["Acme", "2020", "Petrol", "2000", "1"]);
        assert_eq!(melted.rows[1], vec!["Acme", "2021", "Diesel", "2000", "4"]);
        assert_eq!(melted.rows[3], vec!["Acme", "2021", "Diesel", "2001", ""]);
        assert_eq!(melted.lines, vec![1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn melt_requires_identifying_columns() {
        let source = table(&[MAKE_MODEL, YEAR_OF_MANUFACTURE, "2000"], &[]);
        let err = melt(source, &ID_COLUMNS, POSTCODE, COUNT).unwrap_err();

        assert!(matches!(err, ToolError::MissingColumn(label) if label == FUEL_TYPE));
    }

    #[test]
    fn filter_drops_missing_zero_and_negative_counts() {
        let source = table(
            &[POSTCODE, COUNT],
            &[
                &["2000", "5"],
                &["2001", "0"],
                &["2002", ""],
                &["2003", "-1"],
                &["2004", "0.5"],
                &["2005", "n/a"],
                &["2006", "NA"],
            ],
        );
        let filtered = filter_positive(source, COUNT, POSTCODE).expect("numeric counts");

        assert_eq!(filtered.rows, vec![vec!["2000", "5"], vec!["2004", "0.5"]]);
        assert_eq!(filtered.lines, vec![1, 5]);
    }

    #[test]
    fn filter_rejects_non_numeric_counts() {
        let source = Table::with_lines(
            vec![POSTCODE.into(), COUNT.into()],
            vec![vec!["2000".into(), "5".into()], vec!["2001".into(), "lots".into()]],
            vec![12, 13],
        );
        let err = filter_positive(source, COUNT, POSTCODE).unwrap_err();

        assert!(matches!(
            err,
            ToolError::InvalidCount { ref postcode, line: 13, ref value }
                if postcode == "2001" && value == "lots"
        ));
    }

    #[test]
    fn select_reorders_columns() {
        let source = table(&["a", "b", "c"], &[&["1", "2", "3"]]);
        let selected = select(source, &["c", "a"]).expect("columns present");

        assert_eq!(selected.columns, vec!["c", "a"]);
        assert_eq!(selected.rows, vec![vec!["3", "1"]]);
    }
}
