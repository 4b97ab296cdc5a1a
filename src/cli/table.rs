//! Table output for CLI list commands
//!
//! Every command that prints rows goes through [`Table`] so the `--format`
//! flag behaves the same everywhere. JSON is handled by the commands
//! themselves since they serialize their report types directly.

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// Widest a cell gets in human-readable output
const MAX_CELL_WIDTH: usize = 60;

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    /// What one row is, for the "N <noun>(s)" summary line
    noun: &'static str,
}

impl Table {
    pub fn new(headers: &[&'static str], noun: &'static str) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
            noun,
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render for `format`; JSON falls back to TSV
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Auto => self.render_pretty(),
            OutputFormat::Md => self.render_md(),
            OutputFormat::Csv => self.render_csv(),
            OutputFormat::Tsv | OutputFormat::Json => self.render_tsv(),
        }
    }

    /// Print the table, with a summary line in human-readable mode
    pub fn print(&self, format: OutputFormat, quiet: bool) {
        print!("{}", self.render(format));
        if format == OutputFormat::Auto && !quiet {
            println!("{} {}(s)", style(self.rows.len()).cyan(), self.noun);
        }
    }

    fn render_pretty(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().copied());
        for row in &self.rows {
            builder.push_record(row.iter().map(|c| truncate_str(c, MAX_CELL_WIDTH)));
        }
        format!("{}\n", builder.build().with(Style::sharp()))
    }

    fn render_md(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().copied());
        for row in &self.rows {
            builder.push_record(row.iter().map(|c| c.replace('|', "\\|")));
        }
        format!("{}\n", builder.build().with(Style::markdown()))
    }

    fn render_tsv(&self) -> String {
        let mut out = self.headers.join("\t");
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join("\t"));
            out.push('\n');
        }
        out
    }

    fn render_csv(&self) -> String {
        let mut out = self
            .headers
            .iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(",");
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_csv(c)).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(&["Component", "Location"], "component");
        table.push(["10K", "U1-S3-2"]);
        table.push(["Switches: 3PDT, SPDT", "U1-S40-1"]);
        table
    }

    #[test]
    fn test_tsv() {
        assert_eq!(
            sample().render(OutputFormat::Tsv),
            "Component\tLocation\n10K\tU1-S3-2\nSwitches: 3PDT, SPDT\tU1-S40-1\n"
        );
    }

    #[test]
    fn test_csv_escapes_commas() {
        let csv = sample().render(OutputFormat::Csv);
        assert!(csv.contains("\"Switches: 3PDT, SPDT\",U1-S40-1"));
    }

    #[test]
    fn test_markdown() {
        let mut table = Table::new(&["Label"], "label");
        table.push(["R: 100R  |  220R"]);
        let md = table.render(OutputFormat::Md);
        assert!(md.contains("| Label"));
        assert!(md.contains("R: 100R  \\|  220R"));
    }

    #[test]
    fn test_pretty_contains_cells() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert!(table.render(OutputFormat::Auto).contains("U1-S40-1"));
    }
}
