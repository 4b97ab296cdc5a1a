//! `pdk parse` command - show how part names canonicalize

use miette::Result;

use crate::cli::helpers::print_json;
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::grouping::{decade_band, decade_band_name};
use crate::core::parser::{self, format_number};
use crate::entities::component::{CanonicalValue, Family, RawComponent};

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Part names to parse
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Parse as this family (resistor, capacitor, diode, transistor, ic, pot)
    #[arg(long, short = 'F')]
    pub family: Option<Family>,

    /// Category path, used for transistor polarity and family detection
    #[arg(long, default_value = "")]
    pub category: String,
}

/// Parse with the given family, else the first family the name or
/// category path points at
pub fn parse_any(raw: &RawComponent, family: Option<Family>) -> Option<CanonicalValue> {
    if let Some(family) = family {
        return parser::parse(raw, family);
    }
    Family::all()
        .iter()
        .filter(|f| raw.is_candidate_for(**f))
        .find_map(|f| parser::parse(raw, *f))
}

/// Section a value is filed under: decade band for resistors, else subtype
fn group_of(value: &CanonicalValue) -> String {
    match (value.family, value.subtype) {
        (Family::Resistor, _) => decade_band_name(decade_band(value.numeric_value)).to_string(),
        (_, Some(subtype)) => subtype.to_string(),
        (_, None) => "-".to_string(),
    }
}

pub fn run(args: ParseArgs, global: &GlobalOpts) -> Result<()> {
    let parsed: Vec<(String, Option<CanonicalValue>)> = args
        .names
        .iter()
        .map(|name| {
            let raw = RawComponent::new(name.as_str(), args.category.as_str(), 0.0);
            (name.clone(), parse_any(&raw, args.family))
        })
        .collect();

    if global.format == OutputFormat::Json {
        let values: Vec<serde_json::Value> = parsed
            .iter()
            .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
            .collect();
        return print_json(&values);
    }

    let mut table = Table::new(&["Name", "Family", "Display", "Value", "Group"], "name");
    for (name, value) in &parsed {
        match value {
            Some(v) => table.push([
                name.clone(),
                v.family.to_string(),
                v.display.clone(),
                if v.family.is_numeric() {
                    format_number(v.numeric_value)
                } else {
                    "-".to_string()
                },
                group_of(v),
            ]),
            None => table.push([name.as_str(), "-", "not recognized (try --family)", "-", "-"]),
        }
    }
    table.print(global.format, global.quiet);
    Ok(())
}
