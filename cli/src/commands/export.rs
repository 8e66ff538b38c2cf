use anyhow::Result;
use time::OffsetDateTime;

use super::render;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ExportArgs) -> Result<()> {
    let mut viewer = args.view.load(cli.viewer_config()?)?;
    let state = render(&mut viewer, &args.view)?;

    let Some(export) = viewer.export_csv(&state, OffsetDateTime::now_utc().date())? else {
        log::warn!("[export] no active layers to export");
        return Ok(());
    };
    let dir = args.output.clone().unwrap_or(".".into());
    let path = export.write_to(&dir, args.force)?;
    println!("[export] wrote {}", path.display());
    Ok(())
}
