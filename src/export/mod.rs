//! Display and export formatting of viewport samples.

mod csv;
mod legend;
mod panel;

pub use self::csv::{export_filename, to_csv, CsvExport};
pub use legend::{legend, LegendEntry};
pub use panel::{format, LayerSamples, PanelSummary, PanelTable};
