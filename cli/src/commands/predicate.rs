use anyhow::{Context, Result};
use webgis::{compile_predicate, sample_request, wms_params};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::PredicateArgs) -> Result<()> {
    let config = cli.viewer_config()?;
    let selection = args.selection.selection()?;
    let layer = config.layer(args.layer)
        .with_context(|| format!("[predicate] Layer {} is not configured", args.layer))?;

    match compile_predicate(layer, &selection)? {
        Some(predicate) => println!("{predicate}"),
        None => println!("(no filter)"),
    }
    for (key, value) in wms_params(layer, &selection)? {
        println!("WMS {key}={value}");
    }

    let Some(viewport) = &args.bbox else { return Ok(()) };
    let geometry_field = config.remote.as_ref().map_or("geom", |r| r.geometry_field.as_str());
    let query = sample_request(layer, &selection, viewport, args.max, geometry_field)?;
    for (key, value) in query.params() {
        println!("WFS {key}={value}");
    }

    if args.fetch {
        let remote = config.remote.as_ref()
            .context("[predicate] --fetch needs a \"remote\" section in the config")?;
        let rows = webgis::fetch_sample(&remote.base_url, &remote.geometry_field, layer, &selection, viewport, args.max)?;
        let samples = [webgis::LayerSamples::new(layer, rows)];
        let summary = webgis::PanelSummary::new(config.zoom, viewport.center(), &samples);
        super::sample::print_panel(&summary);
    }
    Ok(())
}
