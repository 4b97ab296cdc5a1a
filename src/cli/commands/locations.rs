//! `pdk locations` command - label sheet to component location map

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{counted, print_json};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::labels::LabelSheet;
use crate::core::Config;
use crate::entities::location::LocationMap;

#[derive(clap::Args, Debug)]
pub struct LocationsArgs {
    /// Label sheet to read (default: labels_file from config)
    #[arg(long, short = 'l')]
    pub labels: Option<PathBuf>,

    /// Location map to write (default: location_map_file from config)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List every component and its compartments
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: LocationsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let labels = args.labels.unwrap_or_else(|| config.labels_file());
    let output = args.output.unwrap_or_else(|| config.location_map_file());

    if !labels.exists() {
        return Err(miette::miette!(
            help = "Run `pdk labels` first, or pass --labels <file>",
            "Label sheet '{}' not found",
            labels.display()
        ));
    }

    let sheet = LabelSheet::read_csv(&labels)?;
    let map = LocationMap::from_sheet(&sheet);
    map.save(&output)?;

    if global.format == OutputFormat::Json {
        return print_json(&map);
    }

    if args.show {
        let mut table = Table::new(&["Component", "Location", "Also in"], "component");
        for (component, locations) in map.iter() {
            let also: Vec<String> = locations.iter().skip(1).map(|l| l.short_code()).collect();
            table.push([
                component.to_string(),
                locations.first().map(|l| l.short_code()).unwrap_or_default(),
                also.join(", "),
            ]);
        }
        table.print(global.format, global.quiet);
    }

    if !global.quiet {
        println!(
            "{} Mapped {} from {} to {}",
            style("✓").green(),
            counted(map.len(), "component"),
            counted(sheet.len(), "label"),
            style(output.display()).cyan()
        );
    }
    Ok(())
}
