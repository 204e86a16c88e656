use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::instrument;

use crate::error::Result;
use crate::model::Table;

/// Writes the table to `path` as comma-delimited text with a header row and
/// no index column. An existing file is truncated.
#[instrument(
    level = "debug",
    skip_all,
    fields(path = %path.display(), rows = table.height())
)]
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_table_to(file, table)
}

/// Same as [`write_table`] but over any writer.
pub fn write_table_to<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
