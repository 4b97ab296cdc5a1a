//! Layout pipeline - catalog parts to a printed label sheet
//!
//! Sections are processed in the reference catalog's order, all drawing from
//! one allocator so drawer ids are consecutive across the whole sheet.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::allocator::{CapacityWarning, DrawerAllocator, DrawerUsage};
use crate::core::grouping;
use crate::core::labels::{format_label_with, LabelSheet, LayoutError, LABEL_SEPARATOR};
use crate::core::registry;
use crate::entities::component::{Family, RawComponent};
use crate::entities::label::{DrawerKind, LabelRecord};
use crate::entities::reference::{ReferenceCatalog, Section};

/// Per-family line of the layout report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilySummary {
    pub family: Family,
    /// Distinct canonical values placed
    pub values: usize,
    /// Values that came from the catalog rather than the reference
    pub in_stock: usize,
    pub drawers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub generated_at: DateTime<Utc>,
    pub parts: usize,
    pub labels: usize,
    pub families: Vec<FamilySummary>,
    pub usage: Vec<DrawerUsage>,
    pub warnings: Vec<CapacityWarning>,
    /// Families that produced no values at all
    pub empty_families: Vec<Family>,
}

/// Result of one label generation run
#[derive(Debug, Clone)]
pub struct Layout {
    pub sheet: LabelSheet,
    pub report: LayoutReport,
}

pub struct LayoutBuilder<'a> {
    reference: &'a ReferenceCatalog,
    allocator: DrawerAllocator,
    sheet: LabelSheet,
    families: Vec<FamilySummary>,
    empty_families: Vec<Family>,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(reference: &'a ReferenceCatalog) -> Self {
        Self {
            reference,
            allocator: DrawerAllocator::new(),
            sheet: LabelSheet::new(),
            families: Vec::new(),
            empty_families: Vec::new(),
        }
    }

    pub fn build(mut self, parts: &[RawComponent]) -> Result<Layout, LayoutError> {
        if parts.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }

        for section in self.reference.sections() {
            match section {
                Section::Family { family } => self.family_section(family, parts),
                Section::Fixed {
                    drawer,
                    top,
                    bottom,
                } => {
                    let mut groups = vec![vec![top]];
                    groups.extend(bottom.map(|b| vec![b]));
                    self.emit("", drawer, groups, LABEL_SEPARATOR);
                }
                Section::List {
                    drawer,
                    prefix,
                    items,
                    per_drawer,
                    separator,
                } => {
                    let groups = items
                        .chunks(per_drawer.max(1))
                        .map(|c| c.to_vec())
                        .collect();
                    self.emit(&prefix, drawer, groups, &separator);
                }
            }
        }

        let warnings = self.allocator.warnings();
        for w in &warnings {
            warn!("{}", w);
        }

        let report = LayoutReport {
            generated_at: Utc::now(),
            parts: parts.len(),
            labels: self.sheet.len(),
            families: self.families,
            usage: self.allocator.usage(),
            warnings,
            empty_families: self.empty_families,
        };
        Ok(Layout {
            sheet: self.sheet,
            report,
        })
    }

    fn family_section(&mut self, family: Family, parts: &[RawComponent]) {
        let values = registry::register(parts, self.reference, family);
        if values.is_empty() {
            warn!("no {} values found", family);
            self.empty_families.push(family);
            return;
        }

        let sections = grouping::sections(family, &values);
        let drawers = sections.iter().map(|s| s.groups.len()).sum();
        info!(
            "{}: {} values in {} drawers",
            family,
            values.len(),
            drawers
        );
        self.families.push(FamilySummary {
            family,
            values: values.len(),
            in_stock: values.iter().filter(|v| v.source.stock > 0.0).count(),
            drawers,
        });

        for section in sections {
            let groups = section.groups.iter().map(|g| g.displays()).collect();
            self.emit(&section.prefix, section.drawer, groups, LABEL_SEPARATOR);
        }
    }

    /// Pair consecutive groups onto labels. When the drawer kind has no
    /// bottom drawer left, the next group moves to the following label.
    ///
    /// Once a bounded kind is exhausted, labels stop pairing two groups:
    /// every further label carries one group on `Label_Top` with
    /// `Bin_Bottom` and `Label_Bottom` empty. Readers of the label sheet
    /// must not assume the top and bottom groups of a label are consecutive
    /// past that point.
    fn emit(&mut self, prefix: &str, kind: DrawerKind, groups: Vec<Vec<String>>, separator: &str) {
        let mut queue = groups.into_iter().filter(|g| !g.is_empty());
        while let Some(top) = queue.next() {
            let pair = self.allocator.next_pair(kind);
            let (bin_bottom, label_bottom) = match pair.bottom {
                Some(id) => match queue.next() {
                    Some(bottom) => (id, format_label_with(prefix, &bottom, separator)),
                    None => (String::new(), String::new()),
                },
                None => (String::new(), String::new()),
            };
            self.sheet.push(LabelRecord::new(
                pair.unit,
                pair.top,
                bin_bottom,
                format_label_with(prefix, &top, separator),
                label_bottom,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reference::ReferenceList;
    use crate::entities::reference::ReferenceEntry;

    fn catalog_with(sections: Vec<Section>) -> ReferenceCatalog {
        ReferenceCatalog {
            sections: Some(sections),
            ..Default::default()
        }
    }

    fn rows(sheet: &LabelSheet) -> Vec<(String, String, String, String, String)> {
        sheet
            .records()
            .iter()
            .map(|r| {
                (
                    r.unit.clone(),
                    r.bin_top.clone(),
                    r.bin_bottom.clone(),
                    r.label_top.clone(),
                    r.label_bottom.clone(),
                )
            })
            .collect()
    }

    fn row(u: &str, t: &str, b: &str, lt: &str, lb: &str) -> (String, String, String, String, String) {
        (u.into(), t.into(), b.into(), lt.into(), lb.into())
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let reference = ReferenceCatalog::default();
        let err = LayoutBuilder::new(&reference).build(&[]).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyCatalog));
    }

    #[test]
    fn test_resistor_labels() {
        let reference = catalog_with(vec![Section::Family {
            family: Family::Resistor,
        }]);
        let parts: Vec<_> = ["10K", "4.7K", "100R", "220R", "1K"]
            .iter()
            .map(|v| RawComponent::new(format!("{} Resistor", v), "Passives", 10.0))
            .collect();

        let layout = LayoutBuilder::new(&reference).build(&parts).unwrap();
        assert_eq!(
            rows(&layout.sheet),
            vec![
                row("U1", "S1", "S2", "R: 100R  |  220R", "R: 1K  |  4.7K"),
                row("U1", "S3", "", "R: 10K", ""),
            ]
        );
        assert_eq!(layout.report.families[0].values, 5);
        assert_eq!(layout.report.families[0].drawers, 3);
        assert_eq!(layout.report.usage[0].to_string(), "S1-S4");
    }

    #[test]
    fn test_fixed_and_list_sections() {
        let reference = catalog_with(vec![
            Section::Fixed {
                drawer: DrawerKind::Small,
                top: "Switches: 3PDT  |  SPDT".into(),
                bottom: None,
            },
            Section::List {
                drawer: DrawerKind::Small,
                prefix: "H-shrink-4x".into(),
                items: vec!["1/8\"".into(), "1/4\"".into(), "1/2\"".into()],
                per_drawer: 2,
                separator: " | ".into(),
            },
            Section::Fixed {
                drawer: DrawerKind::Large,
                top: "PCBs".into(),
                bottom: Some("Enclosures".into()),
            },
        ]);
        let parts = vec![RawComponent::new("Widget", "Misc", 1.0)];
        let layout = LayoutBuilder::new(&reference).build(&parts).unwrap();
        assert_eq!(
            rows(&layout.sheet),
            vec![
                row("U1", "S1", "", "Switches: 3PDT  |  SPDT", ""),
                row("U1", "S3", "S4", "H-shrink-4x: 1/8\" | 1/4\"", "H-shrink-4x: 1/2\""),
                row("U2", "L1", "L2", "PCBs", "Enclosures"),
            ]
        );
    }

    #[test]
    fn test_medium_overflow_warns_and_keeps_every_group() {
        let ics: Vec<ReferenceEntry> = (0..72)
            .map(|n| ReferenceEntry::new(format!("CHIP{:03}", n)))
            .collect();
        let reference = ReferenceCatalog {
            ics: ReferenceList { values: ics },
            sections: Some(vec![Section::Family { family: Family::Ic }]),
            ..Default::default()
        };
        let parts = vec![RawComponent::new("Widget", "Misc", 1.0)];
        let layout = LayoutBuilder::new(&reference).build(&parts).unwrap();

        // 18 groups: 8 full labels on M1-M16, then one label per group
        let records = layout.sheet.records();
        assert_eq!(records.len(), 10);
        assert_eq!(records[7].bin_bottom, "M16");
        assert_eq!(records[8].bin_top, "M17");
        assert_eq!(records[8].bin_bottom, "");
        assert_eq!(records[9].bin_top, "M18");
        assert_eq!(records[9].label_top, "IC: CHIP068  |  CHIP069  |  CHIP070  |  CHIP071");
        assert_eq!(layout.report.warnings.len(), 1);
        assert_eq!(layout.report.warnings[0].used, 18);
    }

    #[test]
    fn test_default_layout_from_embedded_reference() {
        let reference = ReferenceCatalog::embedded().unwrap();
        let parts = vec![
            RawComponent::new("10K Resistor", "Passives/Resistors", 100.0),
            RawComponent::new("TL072 Dual Op-Amp", "Active/ICs/Op-Amps", 5.0),
        ];
        let layout = LayoutBuilder::new(&reference).build(&parts).unwrap();
        let records = layout.sheet.records();

        assert!(records[0].label_top.starts_with("R: "));
        assert!(records.iter().any(|r| r.label_top.starts_with("IC Socket:")));
        let last = records.last().unwrap();
        assert_eq!((last.bin_top.as_str(), last.bin_bottom.as_str()), ("L1", "L2"));
        assert!(layout.report.warnings.is_empty());
        assert!(layout.report.empty_families.is_empty());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let reference = ReferenceCatalog::embedded().unwrap();
        let parts = vec![
            RawComponent::new("4.7uF Electrolytic Capacitor", "Passives", 20.0),
            RawComponent::new("A100K Pot", "Pots", 3.0),
        ];
        let first = LayoutBuilder::new(&reference).build(&parts).unwrap();
        let second = LayoutBuilder::new(&reference).build(&parts).unwrap();
        assert_eq!(first.sheet, second.sheet);
    }
}
