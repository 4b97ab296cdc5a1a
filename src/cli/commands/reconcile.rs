//! `pdk reconcile` command - assign default locations from the location map

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{load_location_map, open_catalog};
use crate::cli::helpers::{counted, print_heading, print_json};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::reconcile::{ReconcileOptions, ReconcileReport, Reconciler};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ReconcileArgs {
    /// Location map to read (default: location_map_file from config)
    #[arg(long, short = 'm')]
    pub map: Option<PathBuf>,

    /// Show what would change without writing to the catalog
    #[arg(long)]
    pub dry_run: bool,

    /// Also re-assign parts that already have a default location
    #[arg(long)]
    pub all: bool,

    /// Top-level stock location (default: root_location from config)
    #[arg(long)]
    pub root: Option<String>,

    /// List every match instead of the summary only
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: ReconcileArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let map = load_location_map(&args.map.unwrap_or_else(|| config.location_map_file()))?;
    let mut catalog = open_catalog(global, &config)?;

    let options = ReconcileOptions {
        dry_run: args.dry_run,
        all_parts: args.all,
        root: args.root.unwrap_or_else(|| config.root_location()),
    };
    let report = Reconciler::new(catalog.as_mut(), options).run(&map)?;

    if global.format == OutputFormat::Json {
        return print_json(&report);
    }

    if args.show {
        let mut table = Table::new(&["Component", "Part", "Match", "Location"], "match");
        for m in &report.matched {
            table.push([
                m.component.clone(),
                m.part_name.clone(),
                m.strategy.to_string(),
                m.location.clone(),
            ]);
        }
        table.print(global.format, global.quiet);
        println!();
    }

    if !global.quiet {
        print_summary(&report, map.len(), config.preview_limit());
    }
    Ok(())
}

fn print_summary(report: &ReconcileReport, components: usize, preview_limit: usize) {
    let title = if report.dry_run {
        "Reconcile (dry run)"
    } else {
        "Reconcile"
    };
    print_heading(title);
    println!("Components in map: {}", style(components).cyan());
    println!("Candidate parts:   {}", style(report.candidates).cyan());
    println!(
        "{} Matched {}",
        style("✓").green(),
        counted(report.matched.len(), "component")
    );
    for (kind, count) in &report.strategies {
        println!("    {:<12} {}", kind.to_string(), count);
    }
    if !report.dry_run {
        println!(
            "{} Updated {}",
            style("✓").green(),
            counted(report.updated, "part")
        );
    }

    if !report.unmatched.is_empty() {
        println!(
            "{} {} without a catalog match",
            style("!").yellow(),
            counted(report.unmatched.len(), "component")
        );
        for name in report.unmatched_preview(preview_limit) {
            println!("    - {}", name);
        }
        let hidden = report.unmatched.len().saturating_sub(preview_limit);
        if hidden > 0 {
            println!("    ... and {} more", hidden);
        }
    }

    for failure in &report.errors {
        println!(
            "{} {}: {}",
            style("✗").red(),
            failure.component,
            failure.message
        );
    }
}
