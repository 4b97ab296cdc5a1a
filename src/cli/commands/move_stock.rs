//! `pdk move-stock` command - move stock items to their default locations

use console::style;
use miette::Result;

use crate::cli::commands::utils::open_catalog;
use crate::cli::helpers::{counted, print_json};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::parser::format_number;
use crate::core::stock::move_stock_to_defaults;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct MoveStockArgs {
    /// Show the moves without making them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: MoveStockArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut catalog = open_catalog(global, &config)?;
    let report = move_stock_to_defaults(catalog.as_mut(), args.dry_run)?;

    if global.format == OutputFormat::Json {
        return print_json(&report);
    }

    if !report.moved.is_empty() {
        let mut table = Table::new(&["Part", "Qty", "From", "To"], "move");
        for m in &report.moved {
            table.push([
                m.part.clone(),
                format_number(m.quantity),
                m.from.clone(),
                m.to.clone(),
            ]);
        }
        table.print(global.format, true);
    }

    if global.quiet {
        return Ok(());
    }
    let verb = if report.dry_run { "Would move" } else { "Moved" };
    println!(
        "{} {} {}",
        style("✓").green(),
        verb,
        counted(report.moved.len(), "stock item")
    );
    println!("  Already correct: {}", report.already_correct);
    if !report.errors.is_empty() {
        println!("  {} Errors: {}", style("⚠").yellow(), report.errors.len());
        for failure in &report.errors {
            println!("    {} {}: {}", style("✗").red(), failure.part, failure.message);
        }
    }
    Ok(())
}
