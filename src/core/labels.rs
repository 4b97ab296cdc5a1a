//! Label sheet CSV and the component location map derived from it
//!
//! The label sheet is the only artifact kept between runs. Label texts follow
//! `<prefix>: <value>  |  <value>  |  ...`, one value per compartment, so the
//! location of every component can be recovered from the sheet alone.

use miette::Diagnostic;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::entities::label::{parse_drawer_id, LabelRecord, Unit};
use crate::entities::location::{LocationEntry, LocationMap};

/// Separator between compartment values on a label
pub const LABEL_SEPARATOR: &str = "  |  ";

/// Columns of the label sheet, followed by blank columns for the label printer
pub const HEADER: [&str; 5] = ["Unit", "Bin_Top", "Bin_Bottom", "Label_Top", "Label_Bottom"];

/// Blank trailing columns expected by the label printing software
pub const RESERVED_COLUMNS: usize = 7;

#[derive(Debug, Error, Diagnostic)]
pub enum LayoutError {
    #[error("The parts catalog is empty")]
    #[diagnostic(
        code(pdk::layout::empty_catalog),
        help("Check the catalog source (--catalog or --server) returns parts")
    )]
    EmptyCatalog,

    #[error("Label sheet is missing the '{column}' column")]
    #[diagnostic(
        code(pdk::layout::missing_column),
        help("Expected header: Unit,Bin_Top,Bin_Bottom,Label_Top,Label_Bottom")
    )]
    MissingColumn { column: String },

    #[error("Label sheet row {row}: {message}")]
    #[diagnostic(code(pdk::layout::malformed_label))]
    MalformedLabel { row: usize, message: String },

    #[error("CSV error: {0}")]
    #[diagnostic(code(pdk::layout::csv))]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(pdk::layout::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(pdk::layout::io))]
    Io(#[from] std::io::Error),
}

/// `R: 100R  |  220R` from a prefix and compartment values
pub fn format_label(prefix: &str, values: &[String]) -> String {
    format_label_with(prefix, values, LABEL_SEPARATOR)
}

pub fn format_label_with(prefix: &str, values: &[String], separator: &str) -> String {
    let joined = values.join(separator);
    if prefix.is_empty() {
        joined
    } else {
        format!("{}: {}", prefix, joined)
    }
}

/// Compartment values of a label text; the prefix before the first ':' is
/// dropped, labels without one are all values
pub fn extract_components(label: &str) -> Vec<String> {
    let values = match label.split_once(':') {
        Some((_, rest)) => rest,
        None => label,
    };
    values
        .split('|')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered label records, one per printed label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSheet {
    records: Vec<LabelRecord>,
}

impl LabelSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LabelRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LabelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), LayoutError> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), LayoutError> {
        let mut wtr = csv::WriterBuilder::new().flexible(false).from_writer(writer);
        let blanks = [""; RESERVED_COLUMNS];

        wtr.write_record(HEADER.iter().chain(blanks.iter()))?;
        for r in &self.records {
            wtr.write_record(
                [
                    r.unit.as_str(),
                    r.bin_top.as_str(),
                    r.bin_bottom.as_str(),
                    r.label_top.as_str(),
                    r.label_bottom.as_str(),
                ]
                .iter()
                .chain(blanks.iter()),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self, LayoutError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Columns are located by header name (case-insensitive); extra columns
    /// are ignored
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LayoutError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut columns = [0usize; 5];
        for (slot, name) in columns.iter_mut().zip(HEADER) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| LayoutError::MissingColumn {
                    column: name.to_string(),
                })?;
        }

        let mut sheet = LabelSheet::new();
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            // header is row 1
            let row_number = i + 2;
            let field = |col: usize| row.get(columns[col]).unwrap_or("").trim().to_string();

            let record = LabelRecord {
                unit: field(0),
                bin_top: field(1),
                bin_bottom: field(2),
                label_top: field(3),
                label_bottom: field(4),
            };
            if record == LabelRecord::default() {
                continue;
            }
            validate(&record, row_number)?;
            sheet.push(record);
        }
        Ok(sheet)
    }
}

fn validate(record: &LabelRecord, row: usize) -> Result<(), LayoutError> {
    record
        .unit
        .parse::<Unit>()
        .map_err(|message| LayoutError::MalformedLabel { row, message })?;

    for bin in [&record.bin_top, &record.bin_bottom] {
        if !bin.is_empty() && parse_drawer_id(bin).is_none() {
            return Err(LayoutError::MalformedLabel {
                row,
                message: format!("invalid drawer id '{}', expected S/L/T/M and a number", bin),
            });
        }
    }
    if record.bin_top.is_empty() && !record.label_top.is_empty() {
        return Err(LayoutError::MalformedLabel {
            row,
            message: "top label has no drawer".to_string(),
        });
    }
    Ok(())
}

impl LocationMap {
    /// Compartment locations of every labelled component, top half before
    /// bottom, in sheet order
    pub fn from_sheet(sheet: &LabelSheet) -> Self {
        let mut map = LocationMap::new();
        for record in sheet.records() {
            let unit = match record.unit.parse::<Unit>() {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("skipping label {}: {}", record.bin_top, e);
                    continue;
                }
            };
            for (drawer, label) in record.halves() {
                for (i, component) in extract_components(label).iter().enumerate() {
                    map.push(component, LocationEntry::new(unit, drawer, i as u32 + 1));
                }
            }
        }
        map
    }

    pub fn save(&self, path: &Path) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_components() {
        assert_eq!(
            extract_components("Caps Cer: 10pF  |  22pF  |  100pF  |  1nF"),
            strings(&["10pF", "22pF", "100pF", "1nF"])
        );
        assert_eq!(extract_components("PCBs"), strings(&["PCBs"]));
        // only the first ':' separates the prefix
        assert_eq!(
            extract_components("IC Socket: 8-pin  |  14-pin"),
            strings(&["8-pin", "14-pin"])
        );
        assert_eq!(extract_components("R: 1R |  | 2R"), strings(&["1R", "2R"]));
        assert!(extract_components("").is_empty());
    }

    #[test]
    fn test_format_inverts_extract() {
        let values = strings(&["100R", "220R", "470R"]);
        let label = format_label("R", &values);
        assert_eq!(label, "R: 100R  |  220R  |  470R");
        assert_eq!(extract_components(&label), values);

        let label = format_label("Q NPN", &strings(&["2N3904"]));
        assert_eq!(extract_components(&label), strings(&["2N3904"]));
        assert_eq!(format_label_with("H", &strings(&["a", "b"]), " | "), "H: a | b");
    }

    fn sample_sheet() -> LabelSheet {
        let mut sheet = LabelSheet::new();
        sheet.push(LabelRecord::new(
            Unit::U1,
            "S1",
            "S2",
            "R: 10R  |  22R",
            "R: 100R  |  10R",
        ));
        sheet.push(LabelRecord::new(Unit::U2, "M1", "", "IC: TL072", ""));
        sheet
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        sample_sheet().to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Unit,Bin_Top,Bin_Bottom,Label_Top,Label_Bottom,,,,,,,")
        );
        assert_eq!(lines.next(), Some("U1,S1,S2,R: 10R  |  22R,R: 100R  |  10R,,,,,,,"));
        assert_eq!(lines.next(), Some("U2,M1,,IC: TL072,,,,,,,,"));
    }

    #[test]
    fn test_csv_read_back() {
        let sheet = sample_sheet();
        let mut buf = Vec::new();
        sheet.to_writer(&mut buf).unwrap();
        let read = LabelSheet::from_reader(buf.as_slice()).unwrap();
        assert_eq!(read, sheet);
    }

    #[test]
    fn test_csv_header_case_and_order() {
        let csv = "label_top,UNIT,bin_top,Bin_Bottom,Label_Bottom\nR: 1K,U1,S3,,\n";
        let sheet = LabelSheet::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(sheet.records()[0].bin_top, "S3");
        assert_eq!(sheet.records()[0].label_top, "R: 1K");
    }

    #[test]
    fn test_csv_rejects_bad_rows() {
        let csv = "Unit,Bin_Top,Bin_Bottom,Label_Top,Label_Bottom\nU1,S1,,R: 1K,\nU3,S2,,R: 2K,\n";
        let err = LabelSheet::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLabel { row: 3, .. }));

        let csv = "Unit,Bin_Top,Bin_Bottom,Label_Top,Label_Bottom\nU1,X9,,R: 1K,\n";
        let err = LabelSheet::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLabel { row: 2, .. }));

        let csv = "Unit,Bin_Top,Label_Top\nU1,S1,R: 1K\n";
        let err = LabelSheet::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::MissingColumn { .. }));
    }

    #[test]
    fn test_location_map_from_sheet() {
        let map = LocationMap::from_sheet(&sample_sheet());
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["10R", "22R", "100R", "TL072"]);

        // printed twice, first occurrence is the default
        assert_eq!(
            map.get("10R").unwrap(),
            &[
                LocationEntry::new(Unit::U1, "S1", 1),
                LocationEntry::new(Unit::U1, "S2", 2)
            ]
        );
        assert_eq!(
            map.default_location("TL072"),
            Some(&LocationEntry::new(Unit::U2, "M1", 1))
        );
    }

    #[test]
    fn test_location_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("component_locations.json");
        let map = LocationMap::from_sheet(&sample_sheet());
        map.save(&path).unwrap();
        assert_eq!(LocationMap::load(&path).unwrap(), map);
    }
}
