//! `pdk resolve` command - which catalog part a component name maps to

use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::open_catalog;
use crate::cli::helpers::print_json;
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::resolver::{IdentityResolver, MatchKind};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Component names as printed on labels ("10K", "A100K", "TL072")
    #[arg(required = true)]
    pub components: Vec<String>,

    /// Only consider parts without a default location, like reconcile does
    #[arg(long)]
    pub unlocated: bool,
}

#[derive(Serialize)]
struct ResolveRow {
    component: String,
    part_id: Option<u64>,
    part_name: Option<String>,
    strategy: Option<MatchKind>,
}

pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = open_catalog(global, &config)?;
    let parts: Vec<_> = catalog
        .list_parts()?
        .into_iter()
        .filter(|p| !args.unlocated || p.default_location.is_none())
        .collect();

    let resolver = IdentityResolver::new();
    let rows: Vec<ResolveRow> = args
        .components
        .iter()
        .map(|component| {
            let resolution = resolver.resolve(component, &parts);
            ResolveRow {
                component: component.clone(),
                part_id: resolution.as_ref().map(|r| r.record.id),
                part_name: resolution.as_ref().map(|r| r.record.name.clone()),
                strategy: resolution.map(|r| r.strategy),
            }
        })
        .collect();

    if global.format == OutputFormat::Json {
        return print_json(&rows);
    }

    let mut table = Table::new(&["Component", "Part", "ID", "Match"], "component");
    for row in &rows {
        table.push([
            row.component.clone(),
            row.part_name.clone().unwrap_or_else(|| "-".to_string()),
            row.part_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            row.strategy
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no match".to_string()),
        ]);
    }
    table.print(global.format, global.quiet);
    Ok(())
}
