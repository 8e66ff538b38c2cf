use std::io::Write;

use anyhow::{Context, Result};
use webgis::{materialize, FeatureCollection, Viewer};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::FilterArgs) -> Result<()> {
    let config = cli.viewer_config()?;
    let selection = args.selection.selection()?;
    let mut viewer = Viewer::new(config)?;

    log::info!("[filter] loading {} from {}", args.layer, args.input.display());
    viewer.load_layer(args.layer, FeatureCollection::from_path(&args.input)?)?;

    let layer = viewer.config().layer(args.layer)
        .with_context(|| format!("[filter] Layer {} is not configured", args.layer))?;
    let source = viewer.source(args.layer)
        .with_context(|| format!("[filter] Layer {} is not loaded", args.layer))?;
    let features = materialize(layer, source, &selection);
    log::info!("[filter] {} of {} features pass", features.len(), source.len());

    let geojson = serde_json::to_string(&FeatureCollection::to_geojson(features))?;
    match &args.output {
        Some(path) => std::fs::write(path, geojson)
            .with_context(|| format!("[filter] Failed to write {}", path.display()))?,
        None => writeln!(std::io::stdout().lock(), "{geojson}")?,
    }
    Ok(())
}
