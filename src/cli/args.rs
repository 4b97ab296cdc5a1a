//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, labels::LabelsArgs, locations::LocationsArgs,
    move_stock::MoveStockArgs, parse::ParseArgs, pick::PickArgs, reconcile::ReconcileArgs,
    resolve::ResolveArgs, snapshot::SnapshotArgs,
};

#[derive(Parser)]
#[command(name = "pdk")]
#[command(author, version, about = "Parts drawer kit")]
#[command(long_about = "Organize an electronic parts inventory into labelled drawers and keep the inventory's stock locations in step with the printed labels.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Offline catalog snapshot (JSON) instead of a live server
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Inventory server base URL (overrides config and PDK_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Inventory API token (overrides config and PDK_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the drawer label sheet from the catalog
    Labels(LabelsArgs),

    /// Build the component location map from a label sheet
    Locations(LocationsArgs),

    /// Assign catalog parts their default compartment location
    Reconcile(ReconcileArgs),

    /// Move stock items to their part's default location
    MoveStock(MoveStockArgs),

    /// Picking sheet for an assembly, ordered by drawer
    Pick(PickArgs),

    /// Show the canonical value parsed from a part name
    Parse(ParseArgs),

    /// Show the catalog part a component name resolves to
    Resolve(ResolveArgs),

    /// Export the live catalog to an offline snapshot file
    Snapshot(SnapshotArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and summaries
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
