//! pdk: parts drawer kit
//!
//! Turns an electronic parts inventory into printed drawer labels, then
//! feeds the resulting layout back into the inventory as stock locations.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
