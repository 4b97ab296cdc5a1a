//! `pdk snapshot` command - save the catalog for offline runs

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::open_catalog;
use crate::cli::helpers::counted;
use crate::cli::GlobalOpts;
use crate::core::catalog::{Snapshot, SnapshotCatalog};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct SnapshotArgs {
    /// File to write
    pub output: PathBuf,
}

pub fn run(args: SnapshotArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = open_catalog(global, &config)?;
    let snapshot = Snapshot::export(catalog.as_ref())?;

    let summary = format!(
        "{}, {}, {}, {}",
        counted(snapshot.parts.len(), "part"),
        counted(snapshot.locations.len(), "location"),
        counted(snapshot.stock.len(), "stock item"),
        counted(snapshot.bom.len(), "BOM line")
    );
    SnapshotCatalog::from_snapshot(snapshot).save(&args.output)?;

    if !global.quiet {
        println!(
            "{} Saved {} to {}",
            style("✓").green(),
            summary,
            style(args.output.display()).cyan()
        );
    }
    Ok(())
}
