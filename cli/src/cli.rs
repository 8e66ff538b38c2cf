use std::path::PathBuf;

use anyhow::{Context, Result};
use webgis::{FilterSelection, LayerKey, Viewer, ViewerConfig, Viewport};

/// Thematic map viewer core (filter, sample and export GeoJSON layers)
#[derive(clap::Parser, Debug)]
#[command(name = "webgis", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Viewer configuration (JSON), defaults to the built-in layers
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn viewer_config(&self) -> Result<ViewerConfig> {
        match &self.config {
            Some(path) => ViewerConfig::from_path(path),
            None => Ok(ViewerConfig::default()),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Write the features of one layer that pass the selection as GeoJSON
    Filter(FilterArgs),

    /// Print the info panel for a viewport
    Sample(SampleArgs),

    /// Write the viewport sample of every layer as CSV
    Export(ExportArgs),

    /// Print the CQL predicate and WFS/WMS parameters for a selection
    Predicate(PredicateArgs),
}

/// Dropdown values; an omitted value means "all".
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Macro-region, e.g. Sul, Centro-Oeste
    #[arg(long)]
    pub region: Option<String>,

    /// Two-letter state code, e.g. SP
    #[arg(long)]
    pub state: Option<String>,

    /// Municipality hierarchy code
    #[arg(long)]
    pub hierarchy: Option<String>,
}

impl SelectionArgs {
    pub fn selection(&self) -> Result<FilterSelection> {
        Ok(FilterSelection::from_controls(
            self.region.as_deref().unwrap_or_default(),
            self.state.as_deref().unwrap_or_default(),
            self.hierarchy.as_deref().unwrap_or_default(),
        )?)
    }
}

/// A layer source given as `key=path`.
#[derive(Debug, Clone)]
pub struct LayerInput {
    pub key: LayerKey,
    pub path: PathBuf,
}

fn parse_layer_key(key: &str) -> Result<LayerKey, String> {
    LayerKey::from_str(key).ok_or_else(|| {
        let known: Vec<&str> = LayerKey::ALL.iter().map(|k| k.to_str()).collect();
        format!("unknown layer {key:?}, expected one of {}", known.join(", "))
    })
}

fn parse_layer_input(input: &str) -> Result<LayerInput, String> {
    let (key, path) = input.split_once('=')
        .ok_or_else(|| format!("expected key=path, got {input:?}"))?;
    Ok(LayerInput { key: parse_layer_key(key)?, path: PathBuf::from(path) })
}

fn parse_bbox(input: &str) -> Result<Viewport, String> {
    let values = input.split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    Viewport::from_bbox(&values).map_err(|e| e.to_string())
}

/// Layers, viewport and selection of a fixed map view.
#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// Layer source as key=path.geojson (repeatable)
    #[arg(short, long = "layer", value_parser = parse_layer_input, required = true)]
    pub layers: Vec<LayerInput>,

    /// Viewport as west,south,east,north
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Viewport,

    /// Map zoom, defaults to the configured initial zoom
    #[arg(short, long)]
    pub zoom: Option<f64>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl ViewArgs {
    /// Build a viewer with every given layer loaded.
    pub fn load(&self, config: ViewerConfig) -> Result<Viewer> {
        let mut viewer = Viewer::new(config)?;
        for input in &self.layers {
            let collection = webgis::FeatureCollection::from_path(&input.path)?;
            viewer.load_layer(input.key, collection)
                .with_context(|| format!("[cli] Failed to load layer {} from {}", input.key, input.path.display()))?;
        }
        Ok(viewer)
    }
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Layer key, e.g. municipalities
    #[arg(value_parser = parse_layer_key)]
    pub layer: LayerKey,

    /// Input GeoJSON file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output GeoJSON file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Rows per layer, defaults to the configured panel sample size
    #[arg(short, long)]
    pub max: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing export of the same day
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct PredicateArgs {
    /// Layer key, e.g. informal_settlements
    #[arg(value_parser = parse_layer_key)]
    pub layer: LayerKey,

    /// Also print the WFS sample request for this viewport (west,south,east,north)
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<Viewport>,

    /// Feature count of the WFS sample request
    #[arg(short, long, default_value_t = webgis::EXPORT_SAMPLE_SIZE)]
    pub max: usize,

    /// Run the WFS request against the configured server and print the rows
    #[arg(long, requires = "bbox")]
    pub fetch: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_view_arguments() {
        let cli = Cli::parse_from([
            "webgis", "-vv", "sample",
            "--layer", "municipalities=mun.geojson",
            "-l", "strata=estratos.geojson",
            "--bbox", "-60,-30,-40,-10",
            "--region", "Sul",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Sample(args) = cli.command else { panic!("expected sample") };
        assert_eq!(args.view.layers.len(), 2);
        assert_eq!(args.view.layers[1].key, LayerKey::Strata);
        assert_eq!(args.view.bbox.to_bbox(), [-60.0, -30.0, -40.0, -10.0]);
        assert_eq!(args.view.selection.selection().unwrap().region, Some(webgis::Region::Sul));
    }

    #[test]
    fn rejects_unknown_layers_and_short_bboxes() {
        assert!(Cli::try_parse_from(["webgis", "filter", "rivers", "in.geojson"]).is_err());
        assert!(Cli::try_parse_from(["webgis", "predicate", "strata", "--bbox", "1,2,3"]).is_err());
        assert!(Cli::try_parse_from(["webgis", "predicate", "strata", "--fetch"]).is_err());
    }

    #[test]
    fn empty_selection_arguments() {
        let selection = SelectionArgs::default().selection().unwrap();
        assert!(selection.is_empty());
        let bad = SelectionArgs { state: Some("São Paulo".into()), ..Default::default() };
        assert!(bad.selection().is_err());
    }
}
