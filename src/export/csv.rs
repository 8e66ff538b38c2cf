use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::{macros::format_description, Date};

use super::panel::LayerSamples;
use crate::common::write_atomic;

/// Number of value slots after the `layer` column.
const CSV_SLOTS: usize = 4;

const CSV_HEADER: &str = "layer,c1,c2,c3,c4\n";

/// One export invocation: a file name and its UTF-8 contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
}

impl CsvExport {
    /// Write the export into `dir` under its file name.
    pub fn write_to(&self, dir: &Path, force: bool) -> Result<PathBuf> {
        write_atomic(&dir.join(&self.filename), self.contents.as_bytes(), force)
    }
}

/// `<prefix>_<YYYY-MM-DD>.csv`
pub fn export_filename(prefix: &str, date: Date) -> Result<String> {
    let date = date.format(format_description!("[year]-[month]-[day]"))
        .context("[export::csv] format export date")?;
    Ok(format!("{prefix}_{date}.csv"))
}

/// Flatten samples into CSV: header `layer,c1,c2,c3,c4`, then one row per sample
/// with the layer key and exactly four double-quoted values (padded with "").
pub fn to_csv(samples: &[LayerSamples]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(CSV_HEADER.as_bytes().to_vec());

    for layer in samples {
        for row in &layer.rows {
            let mut record = Vec::with_capacity(CSV_SLOTS + 1);
            record.push(layer.key.to_str());
            record.extend(
                (0..CSV_SLOTS).map(|i| row.values.get(i).map(String::as_str).unwrap_or(""))
            );
            writer.write_record(&record).context("[export::csv] write record")?;
        }
    }

    let bytes = writer.into_inner().context("[export::csv] flush CSV")?;
    String::from_utf8(bytes).context("[export::csv] CSV is not UTF-8")
}
