//! Bin-packer - canonical values into compartment groups
//!
//! A group is the contents of one drawer: up to four values, one per
//! compartment. Groups of one label prefix form a section; the sections of a
//! family are emitted in a fixed order and paired onto labels by the layout.

use std::collections::HashSet;

use crate::entities::component::{CanonicalValue, Dielectric, Family, Polarity};
use crate::entities::label::{DrawerKind, COMPARTMENTS_PER_DRAWER};

/// Upper bounds of the resistor decade bands; values at or above the last
/// bound fall in an open-ended seventh band
const DECADE_BOUNDS: [f64; 6] = [10.0, 100.0, 1e3, 1e4, 1e5, 1e6];

const DECADE_NAMES: [&str; 7] = [
    "<10R",
    "10R-100R",
    "100R-1K",
    "1K-10K",
    "10K-100K",
    "100K-1M",
    "1M+",
];

/// Contents of one drawer, 1..=4 values
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    values: Vec<CanonicalValue>,
}

impl Group {
    /// None when `values` is empty or does not fit a drawer
    pub fn new(values: Vec<CanonicalValue>) -> Option<Self> {
        if values.is_empty() || values.len() > COMPARTMENTS_PER_DRAWER {
            return None;
        }
        Some(Self { values })
    }

    pub fn values(&self) -> &[CanonicalValue] {
        &self.values
    }

    pub fn displays(&self) -> Vec<String> {
        self.values.iter().map(|v| v.display.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Groups sharing a label prefix and drawer kind
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSection {
    pub prefix: String,
    pub drawer: DrawerKind,
    pub groups: Vec<Group>,
}

impl GroupSection {
    fn new(prefix: impl Into<String>, drawer: DrawerKind, values: Vec<CanonicalValue>) -> Self {
        Self {
            prefix: prefix.into(),
            drawer,
            groups: chunk(values),
        }
    }
}

/// Index of the decade band holding `ohms`
pub fn decade_band(ohms: f64) -> usize {
    DECADE_BOUNDS
        .iter()
        .position(|bound| ohms < *bound)
        .unwrap_or(DECADE_BOUNDS.len())
}

pub fn decade_band_name(band: usize) -> &'static str {
    DECADE_NAMES.get(band).copied().unwrap_or("?")
}

/// Consecutive runs of up to four values
fn chunk(values: Vec<CanonicalValue>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut current = Vec::with_capacity(COMPARTMENTS_PER_DRAWER);
    for value in values {
        current.push(value);
        if current.len() == COMPARTMENTS_PER_DRAWER {
            groups.extend(Group::new(std::mem::take(&mut current)));
        }
    }
    groups.extend(Group::new(current));
    groups
}

fn sort_numeric(values: &mut [CanonicalValue]) {
    values.sort_by(|a, b| a.numeric_value.total_cmp(&b.numeric_value));
}

/// Sorted ascending, bucketed by decade; a band never shares a drawer with
/// its neighbours
fn resistor_groups(values: &[CanonicalValue]) -> Vec<Group> {
    let mut sorted = values.to_vec();
    sort_numeric(&mut sorted);

    let mut bands: Vec<Vec<CanonicalValue>> = vec![Vec::new(); DECADE_NAMES.len()];
    for value in sorted {
        bands[decade_band(value.numeric_value)].push(value);
    }
    bands.into_iter().flat_map(chunk).collect()
}

/// Label sections of one family's canonical values
pub fn sections(family: Family, values: &[CanonicalValue]) -> Vec<GroupSection> {
    let sections = match family {
        Family::Resistor => vec![GroupSection {
            prefix: "R".to_string(),
            drawer: DrawerKind::Small,
            groups: resistor_groups(values),
        }],
        Family::Capacitor => Dielectric::all()
            .iter()
            .map(|dielectric| {
                let mut of_type: Vec<_> = values
                    .iter()
                    .filter(|v| v.dielectric() == Some(*dielectric))
                    .cloned()
                    .collect();
                sort_numeric(&mut of_type);
                GroupSection::new(dielectric.label_prefix(), DrawerKind::Small, of_type)
            })
            .collect(),
        Family::Diode => vec![GroupSection::new(
            "Diodes",
            DrawerKind::Small,
            values.to_vec(),
        )],
        Family::Transistor => {
            let mut order: Vec<Polarity> = Vec::new();
            for polarity in values.iter().filter_map(|v| v.polarity()) {
                if !order.contains(&polarity) {
                    order.push(polarity);
                }
            }
            order
                .into_iter()
                .map(|polarity| {
                    let of_type = values
                        .iter()
                        .filter(|v| v.polarity() == Some(polarity))
                        .cloned()
                        .collect();
                    GroupSection::new(polarity.label_prefix(), DrawerKind::Small, of_type)
                })
                .collect()
        }
        Family::Ic => vec![GroupSection::new(
            "IC",
            DrawerKind::Medium,
            sorted_unique_displays(values),
        )],
        // every taper shares the same drawers
        Family::Potentiometer => vec![GroupSection::new(
            "Pots",
            DrawerKind::Medium,
            sorted_unique_displays(values),
        )],
        Family::Other => Vec::new(),
    };

    sections
        .into_iter()
        .filter(|s| !s.groups.is_empty())
        .collect()
}

/// First value per display, alphabetical by display
fn sorted_unique_displays(values: &[CanonicalValue]) -> Vec<CanonicalValue> {
    let mut seen = HashSet::new();
    let mut unique: Vec<CanonicalValue> = values
        .iter()
        .filter(|v| seen.insert(v.display.clone()))
        .cloned()
        .collect();
    unique.sort_by(|a, b| a.display.cmp(&b.display));
    unique
}

/// All groups of a family in label order
pub fn group(family: Family, values: &[CanonicalValue]) -> Vec<Group> {
    sections(family, values)
        .into_iter()
        .flat_map(|s| s.groups)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_capacitor, parse_ic, parse_resistor, parse_transistor};
    use crate::entities::component::{Subtype, Taper};

    fn resistors(names: &[&str]) -> Vec<CanonicalValue> {
        names.iter().filter_map(|n| parse_resistor(n)).collect()
    }

    fn group_displays(groups: &[Group]) -> Vec<Vec<String>> {
        groups.iter().map(|g| g.displays()).collect()
    }

    #[test]
    fn test_decade_bands() {
        assert_eq!(decade_band(4.7), 0);
        assert_eq!(decade_band(10.0), 1);
        assert_eq!(decade_band(100.0), 2);
        assert_eq!(decade_band(999.0), 2);
        assert_eq!(decade_band(4700.0), 3);
        assert_eq!(decade_band(1e6), 6);
        assert_eq!(decade_band_name(3), "1K-10K");
    }

    #[test]
    fn test_resistors_grouped_by_decade() {
        let values = resistors(&["10K Resistor", "4.7K Resistor", "100R Resistor"]);
        let groups = group(Family::Resistor, &values);
        // 10K is the first value of the 10K-100K band
        assert_eq!(
            group_displays(&groups),
            vec![vec!["100R"], vec!["4.7K"], vec!["10K"]]
        );

        let values = resistors(&["1K", "4.7K", "2.2K", "1.5K", "3.3K", "9.1K", "220R"]);
        let groups = group(Family::Resistor, &values);
        assert_eq!(
            group_displays(&groups),
            vec![
                vec!["220R"],
                vec!["1K", "1.5K", "2.2K", "3.3K"],
                vec!["4.7K", "9.1K"],
            ]
        );
    }

    #[test]
    fn test_bands_never_merge() {
        let values = resistors(&["10R", "22R", "47R", "100R", "220R"]);
        let groups = group(Family::Resistor, &values);
        assert_eq!(
            group_displays(&groups),
            vec![vec!["10R", "22R", "47R"], vec!["100R", "220R"]]
        );
    }

    #[test]
    fn test_capacitors_split_by_dielectric() {
        let values: Vec<_> = [
            "4.7uF Electrolytic Capacitor",
            "100nF Film Cap",
            "22pF Capacitor",
            "10pF Capacitor",
            "1uF Electrolytic Capacitor",
        ]
        .iter()
        .filter_map(|n| parse_capacitor(n))
        .collect();

        let sections = sections(Family::Capacitor, &values);
        let summary: Vec<_> = sections
            .iter()
            .map(|s| (s.prefix.as_str(), group_displays(&s.groups)))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Caps Cer", vec![vec!["10pF".to_string(), "22pF".to_string()]]),
                ("Caps Film", vec![vec!["100nF".to_string()]]),
                (
                    "Caps Elect",
                    vec![vec!["1uF".to_string(), "4.7uF".to_string()]]
                ),
            ]
        );
    }

    #[test]
    fn test_transistors_keep_discovery_order() {
        let values = vec![
            parse_transistor("2N5457", "Transistors/JFET").unwrap(),
            parse_transistor("BC549", "Transistors/NPN").unwrap(),
            parse_transistor("J201", "Transistors/JFET").unwrap(),
        ];
        let sections = sections(Family::Transistor, &values);
        assert_eq!(sections[0].prefix, "Q JFET");
        assert_eq!(group_displays(&sections[0].groups), vec![vec!["2N5457", "J201"]]);
        assert_eq!(sections[1].prefix, "Q NPN");
    }

    #[test]
    fn test_ics_sorted_and_pots_consolidated() {
        let ics: Vec<_> = ["TL072", "NE5532", "LM308", "PT2399", "CD4049"]
            .iter()
            .filter_map(|n| parse_ic(n))
            .collect();
        let ic_sections = sections(Family::Ic, &ics);
        assert_eq!(ic_sections[0].drawer, DrawerKind::Medium);
        assert_eq!(
            group_displays(&ic_sections[0].groups),
            vec![vec!["CD4049", "LM308", "NE5532", "PT2399"], vec!["TL072"]]
        );

        let pot = |d: &str, t: Taper| {
            CanonicalValue::new(1.0, d, Family::Potentiometer, Some(Subtype::Taper(t)))
        };
        let pots = vec![
            pot("500K", Taper::A),
            pot("100K", Taper::A),
            pot("100K", Taper::B),
            pot("10K", Taper::Trim),
        ];
        let pot_sections = sections(Family::Potentiometer, &pots);
        assert_eq!(pot_sections.len(), 1);
        assert_eq!(pot_sections[0].prefix, "Pots");
        assert_eq!(
            group_displays(&pot_sections[0].groups),
            vec![vec!["100K", "10K", "500K"]]
        );
    }

    #[test]
    fn test_groups_cover_every_value_once() {
        let names: Vec<String> = (1..=23).map(|n| format!("{}K Resistor", n * 3)).collect();
        let values: Vec<_> = names.iter().filter_map(|n| parse_resistor(n)).collect();
        let groups = group(Family::Resistor, &values);

        assert!(groups.iter().all(|g| (1..=4).contains(&g.len())));
        let flattened: Vec<f64> = groups
            .iter()
            .flat_map(|g| g.values().iter().map(|v| v.numeric_value))
            .collect();
        let mut expected: Vec<f64> = values.iter().map(|v| v.numeric_value).collect();
        expected.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_empty_sections_dropped() {
        assert!(sections(Family::Capacitor, &[]).is_empty());
        assert!(Group::new(Vec::new()).is_none());
    }
}
