use anyhow::Result;
use comfy_table::{Attribute, Cell, Table};
use webgis::PanelSummary;

use super::render;

/// Print the info panel with one terminal table per active layer.
pub(crate) fn print_panel(summary: &PanelSummary) {
    println!("Zoom: {}  Center: {:.4}, {:.4}", summary.zoom, summary.center.0, summary.center.1);
    if summary.tables.is_empty() {
        println!("No active layers.");
        return;
    }
    println!("Active layers: {}", summary.active_layers.join(", "));

    for panel in &summary.tables {
        println!("\n{}", panel.label);
        if panel.is_empty() {
            println!("No features in view.");
            continue;
        }
        let mut table = Table::new();
        table
            .set_header(panel.columns.iter().map(|c| Cell::new(c).add_attribute(Attribute::Bold)))
            .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);
        for row in &panel.rows {
            table.add_row(row);
        }
        println!("{table}");
    }
}

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SampleArgs) -> Result<()> {
    let mut viewer = args.view.load(cli.viewer_config()?)?;
    let state = render(&mut viewer, &args.view)?;

    let summary = match args.max {
        Some(max) => PanelSummary::new(state.zoom, state.bounds.center(), &viewer.active_samples(&state, max)),
        None => viewer.info_panel(&state),
    };
    print_panel(&summary);
    Ok(())
}
