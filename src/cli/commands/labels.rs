//! `pdk labels` command - generate the drawer label sheet

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{load_reference, open_catalog};
use crate::cli::helpers::{counted, print_heading, print_json};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::layout::{Layout, LayoutBuilder};
use crate::core::Config;
use crate::entities::component::RawComponent;

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Label sheet to write (default: labels_file from config, labels.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print every label instead of the summary
    #[arg(long)]
    pub show: bool,

    /// Build the sheet without writing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: LabelsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let reference = load_reference(&config)?;
    let catalog = open_catalog(global, &config)?;

    let parts: Vec<RawComponent> = catalog.list_parts()?.iter().map(|p| p.to_raw()).collect();
    let layout = LayoutBuilder::new(&reference).build(&parts)?;

    let output = args.output.unwrap_or_else(|| config.labels_file());
    if !args.dry_run {
        layout.sheet.write_csv(&output)?;
    }

    if global.format == OutputFormat::Json {
        return print_json(&layout.report);
    }

    if args.show {
        print_labels(&layout, global);
    } else if !global.quiet {
        print_summary(&layout);
    }

    if !args.dry_run && !global.quiet {
        println!(
            "{} Wrote {} to {}",
            style("✓").green(),
            counted(layout.sheet.len(), "label"),
            style(output.display()).cyan()
        );
    }
    Ok(())
}

fn print_labels(layout: &Layout, global: &GlobalOpts) {
    let mut table = Table::new(
        &["Unit", "Bin_Top", "Bin_Bottom", "Label_Top", "Label_Bottom"],
        "label",
    );
    for record in layout.sheet.records() {
        table.push([
            record.unit.as_str(),
            record.bin_top.as_str(),
            record.bin_bottom.as_str(),
            record.label_top.as_str(),
            record.label_bottom.as_str(),
        ]);
    }
    table.print(global.format, global.quiet);
}

fn print_summary(layout: &Layout) {
    let report = &layout.report;
    print_heading("Drawer labels");
    println!("Catalog parts: {}", style(report.parts).cyan());
    println!();

    let mut table = Table::new(&["Family", "Values", "In stock", "Drawers"], "family");
    for family in &report.families {
        table.push([
            family.family.to_string(),
            family.values.to_string(),
            family.in_stock.to_string(),
            family.drawers.to_string(),
        ]);
    }
    print!("{}", table.render(OutputFormat::Auto));
    println!();

    for usage in &report.usage {
        println!("  {} drawers: {}", usage.kind, usage);
    }
    for family in &report.empty_families {
        println!("{} no {} values found", style("!").yellow(), family);
    }
    for warning in &report.warnings {
        println!("{} {}", style("⚠").yellow(), warning);
    }
}
