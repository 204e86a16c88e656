use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::{csv_read, csv_write};
use crate::model::{
    COUNT, ID_COLUMNS, MAKE_MODEL, OUTPUT_COLUMNS, POSTCODE, ReformatSummary, SourceLayout, Table,
};
use crate::reshape;

/// Reformats the registration export at `input` into the long table written
/// to `output`, using the layout of the published spreadsheet.
pub fn reformat_vehicle_data(input: &Path, output: &Path) -> Result<ReformatSummary> {
    reformat_with_layout(input, output, &SourceLayout::default())
}

/// Reformats `input` into `output` for an export laid out as `layout`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn reformat_with_layout(
    input: &Path,
    output: &Path,
    layout: &SourceLayout,
) -> Result<ReformatSummary> {
    let source = csv_read::read_source(input, layout)?;
    info!(
        rows = source.height(),
        columns = source.width(),
        "read registration export"
    );

    let (table, summary) = reshape_table(source, layout)?;
    csv_write::write_table(output, &table)?;

    info!(
        postcodes = summary.postcode_columns,
        written = summary.written_rows,
        "long table written"
    );
    Ok(summary)
}

/// Runs the reshape steps between loading and writing.
pub fn reshape_table(source: Table, layout: &SourceLayout) -> Result<(Table, ReformatSummary)> {
    let mut summary = ReformatSummary {
        source_rows: source.height(),
        ..ReformatSummary::default()
    };

    let table = reshape::rename_columns(source, layout);
    let table = reshape::drop_annotation_columns(table, &layout.annotation_suffix);
    let table = reshape::forward_fill(table, MAKE_MODEL)?;
    summary.postcode_columns = table.width().saturating_sub(ID_COLUMNS.len());

    let table = reshape::melt(table, &ID_COLUMNS, POSTCODE, COUNT)?;
    summary.melted_rows = table.height();

    let table = reshape::filter_positive(table, COUNT, POSTCODE)?;
    debug!(kept = table.height(), "positive counts kept");

    let table = reshape::select(table, &OUTPUT_COLUMNS)?;
    summary.written_rows = table.height();
    Ok((table, summary))
}
