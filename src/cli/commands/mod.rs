//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod labels;
pub mod locations;
pub mod move_stock;
pub mod parse;
pub mod pick;
pub mod reconcile;
pub mod resolve;
pub mod snapshot;
