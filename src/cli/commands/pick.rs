//! `pdk pick` command - picking sheet for an assembly build

use console::style;
use miette::Result;
use std::path::PathBuf;
use tracing::warn;

use crate::cli::commands::utils::{load_location_map, open_catalog};
use crate::cli::helpers::{print_heading, print_json};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::parser::format_number;
use crate::core::picking::{find_assemblies, find_assembly, PickingSheet};
use crate::core::Config;
use crate::entities::location::LocationMap;

#[derive(clap::Args, Debug)]
pub struct PickArgs {
    /// Assembly name or part of it; lists assemblies when omitted
    pub assembly: Option<String>,

    /// Category holding assemblies (default: assembly_category from config)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Location map used for parts without a default location
    #[arg(long, short = 'm')]
    pub map: Option<PathBuf>,
}

pub fn run(args: PickArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = open_catalog(global, &config)?;
    let category = args.category.unwrap_or_else(|| config.assembly_category());
    let assemblies = find_assemblies(catalog.as_ref(), &category)?;

    let Some(query) = args.assembly else {
        let mut table = Table::new(&["#", "Assembly"], "assembly");
        for (i, assembly) in assemblies.iter().enumerate() {
            table.push([(i + 1).to_string(), assembly.name.clone()]);
        }
        table.print(global.format, global.quiet);
        return Ok(());
    };

    let assembly = find_assembly(&assemblies, &query).ok_or_else(|| {
        miette::miette!(
            help = "Run `pdk pick` without arguments to list assemblies",
            "No assembly in '{}' matches '{}'",
            category,
            query
        )
    })?;

    let map_path = args.map.unwrap_or_else(|| config.location_map_file());
    let map = if map_path.exists() {
        load_location_map(&map_path)?
    } else {
        warn!("location map {} not found", map_path.display());
        LocationMap::new()
    };

    let sheet = PickingSheet::build(catalog.as_ref(), assembly, &map)?;

    match global.format {
        OutputFormat::Json => print_json(&sheet),
        OutputFormat::Auto => {
            print_sheet(&sheet);
            Ok(())
        }
        format => {
            let mut table = Table::new(
                &["Location", "Reference", "Part", "Qty", "Available"],
                "line",
            );
            for line in sheet.lines() {
                table.push([
                    line.location.clone(),
                    line.reference.clone(),
                    line.name.clone(),
                    format_number(line.quantity),
                    format_number(line.available),
                ]);
            }
            table.print(format, global.quiet);
            Ok(())
        }
    }
}

fn print_sheet(sheet: &PickingSheet) {
    print_heading(&format!("PICKING SHEET: {}", sheet.assembly));
    if sheet.total_lines() == 0 {
        println!("No BOM items found for this assembly.");
        return;
    }
    println!("Total BOM items: {}", sheet.total_lines());

    for group in &sheet.groups {
        println!();
        println!("{} {}", style("LOCATION:").bold(), style(&group.location).cyan());
        println!("{}", "-".repeat(70));
        for line in &group.lines {
            let qty = if line.quantity > 1.0 {
                format!("(x{})", format_number(line.quantity))
            } else {
                String::new()
            };
            let indicator = if line.in_stock() {
                style("✓").green()
            } else {
                style("⚠").yellow()
            };
            println!(
                "  [ ] {:8} {:30} {:6} {}",
                line.reference, line.name, qty, indicator
            );
        }
    }

    println!();
    println!("{}", "=".repeat(70));
    println!("{}", style("SUMMARY:").bold());
    println!("  Total items to pick: {}", sheet.total_lines());
    println!("  Unique locations: {}", sheet.unique_locations());
    println!("  Items in stock: {}/{}", sheet.in_stock(), sheet.total_lines());

    let shortages = sheet.shortages();
    if !shortages.is_empty() {
        println!();
        println!(
            "  {} {} items need to be ordered",
            style("⚠").yellow(),
            shortages.len()
        );
        for line in shortages {
            println!(
                "    - {}: need {} more (have {})",
                line.name,
                format_number(line.shortfall()),
                format_number(line.available)
            );
        }
    }
}
