pub mod export;
pub mod filter;
pub mod predicate;
pub mod sample;

use webgis::{LayerKey, ViewState, Viewer};

use crate::cli::ViewArgs;

/// Render the view once: apply the selection, then the zoom gate.
pub(crate) fn render(viewer: &mut Viewer, args: &ViewArgs) -> anyhow::Result<ViewState> {
    let zoom = args.zoom.unwrap_or(viewer.config().zoom);
    let mut state = ViewState::new(args.bbox, zoom, args.layers.iter().map(|l| l.key));

    viewer.set_selection(args.selection.selection()?, &mut state);
    let hidden: Vec<LayerKey> = viewer.on_zoom(&mut state).into_iter()
        .filter(|key| args.layers.iter().any(|l| l.key == *key))
        .collect();
    if !hidden.is_empty() {
        log::warn!("[render] hidden at zoom {zoom}: {}", hidden.iter().map(|k| k.to_str()).collect::<Vec<_>>().join(", "));
    }
    for (key, count) in &state.rendered {
        log::info!("[render] {key}: {count} features");
    }
    Ok(state)
}
