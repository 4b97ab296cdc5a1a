//! Canonical registry - observed values merged with expected ones
//!
//! Values parsed from the catalog are registered first, then every reference
//! value that is not already present is synthesised with zero stock so it
//! still gets a compartment before the first order arrives.

use std::collections::HashSet;
use tracing::debug;

use crate::core::parser;
use crate::entities::component::{
    CanonicalValue, Dielectric, Family, Polarity, RawComponent, Subtype, Taper,
};
use crate::entities::reference::{ReferenceCatalog, ReferenceEntry};

/// Deduplicated canonical values of one family in first-seen order
#[derive(Debug, Clone)]
pub struct CanonicalRegistry {
    family: Family,
    values: Vec<CanonicalValue>,
    seen: HashSet<(String, Option<Subtype>)>,
}

impl CanonicalRegistry {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            values: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn into_values(self) -> Vec<CanonicalValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert unless the (display, subtype) key is taken; returns whether inserted
    fn insert(&mut self, value: CanonicalValue) -> bool {
        if self.seen.insert(value.dedup_key()) {
            self.values.push(value);
            true
        } else {
            false
        }
    }

    /// Register a catalog part; unparseable names are dropped
    pub fn add_discovered(&mut self, raw: &RawComponent) -> bool {
        match parser::parse(raw, self.family) {
            Some(value) => self.insert(value),
            None => {
                debug!("{}: cannot parse '{}', skipping", self.family, raw.name);
                false
            }
        }
    }

    /// Register a reference value unless an equivalent one is present
    pub fn add_expected(&mut self, entry: &ReferenceEntry, subtype: Option<Subtype>) -> bool {
        let Some(value) = synthesize(&entry.value, self.family, subtype) else {
            debug!("{}: reference value '{}' not usable", self.family, entry.value);
            return false;
        };
        if self.is_present(&entry.value, &value) {
            return false;
        }
        self.insert(value)
    }

    fn is_present(&self, reference_text: &str, expected: &CanonicalValue) -> bool {
        match self.family {
            Family::Resistor => {
                // "100R" counts as present once "100K" is: plain containment
                let wanted = strip_ohms(reference_text);
                self.values.iter().any(|v| {
                    v.display == reference_text
                        || (!wanted.is_empty() && v.display.contains(&wanted))
                })
            }
            // Any dielectric: a stocked ceramic 100nF covers a film 100nF
            Family::Capacitor => self.values.iter().any(|v| v.display == expected.display),
            Family::Potentiometer => {
                let wanted = expected.display.to_lowercase();
                let group = taper_group(expected.subtype);
                self.values.iter().any(|v| {
                    taper_group(v.subtype) == group && v.display.to_lowercase().contains(&wanted)
                })
            }
            _ => {
                let wanted = expected.display.to_lowercase();
                self.values.iter().any(|v| {
                    v.subtype == expected.subtype && v.display.to_lowercase().contains(&wanted)
                })
            }
        }
    }
}

fn strip_ohms(text: &str) -> String {
    text.replace(['R', 'Ω'], "")
}

fn taper_group(subtype: Option<Subtype>) -> Option<&'static str> {
    match subtype {
        Some(Subtype::Taper(t)) => Some(t.group_key()),
        _ => None,
    }
}

/// Zero-stock canonical value for a reference entry
fn synthesize(text: &str, family: Family, subtype: Option<Subtype>) -> Option<CanonicalValue> {
    let value = match (family, subtype) {
        (Family::Resistor, _) => {
            let value = parser::parse_resistor(&format!("{} Resistor", text))?;
            let name = format!("{} Resistor", value.display);
            value.with_source(name, 0.0)
        }
        (Family::Capacitor, Some(Subtype::Dielectric(dielectric))) => {
            let mut value = parser::parse_capacitor(&format!("{} Capacitor", text))?;
            value.subtype = Some(Subtype::Dielectric(dielectric));
            let name = format!("{} {} Capacitor", value.display, dielectric.title());
            value.with_source(name, 0.0)
        }
        (Family::Capacitor, _) => {
            let value = parser::parse_capacitor(text)?;
            let name = format!("{} Capacitor", value.display);
            value.with_source(name, 0.0)
        }
        (Family::Diode, _) => parser::parse_diode(text)?.with_source(text, 0.0),
        (Family::Transistor, Some(Subtype::Polarity(polarity))) => {
            parser::parse_transistor(text, &polarity.to_string())?.with_source(text, 0.0)
        }
        (Family::Transistor, _) => parser::parse_transistor(text, "")?.with_source(text, 0.0),
        (Family::Ic, _) => parser::parse_ic(text)?.with_source(text, 0.0),
        (Family::Potentiometer, Some(Subtype::Taper(taper))) => {
            let bare = text.trim_start_matches(['A', 'B', 'C', 'W']);
            let value = parser::parse_potentiometer_value(bare, taper)?;
            let name = match taper {
                Taper::Trim => format!("{} Trimpot", value.display),
                _ => format!("{}{} Pot", taper, value.display),
            };
            value.with_source(name, 0.0)
        }
        (Family::Potentiometer, _) => parser::parse_potentiometer(text)?.with_source(text, 0.0),
        (Family::Other, _) => return None,
    };
    Some(value)
}

/// Reference entries of a family with the subtype their section implies
pub fn reference_entries(
    reference: &ReferenceCatalog,
    family: Family,
) -> Vec<(&ReferenceEntry, Option<Subtype>)> {
    fn tagged(entries: &[ReferenceEntry], subtype: Option<Subtype>) -> Vec<(&ReferenceEntry, Option<Subtype>)> {
        entries.iter().map(|e| (e, subtype)).collect()
    }

    match family {
        Family::Resistor => tagged(&reference.resistors.values, None),
        Family::Capacitor => Dielectric::all()
            .iter()
            .flat_map(|d| tagged(reference.capacitors.get(*d), Some(Subtype::Dielectric(*d))))
            .collect(),
        Family::Diode => tagged(&reference.diodes.values, None),
        Family::Transistor => Polarity::all()
            .iter()
            .flat_map(|p| tagged(reference.transistors.get(*p), Some(Subtype::Polarity(*p))))
            .collect(),
        Family::Ic => tagged(&reference.ics.values, None),
        Family::Potentiometer => {
            let pots = &reference.potentiometers;
            let mut entries = tagged(&pots.audio_log.values, Some(Subtype::Taper(Taper::A)));
            entries.extend(tagged(&pots.linear.values, Some(Subtype::Taper(Taper::B))));
            entries.extend(tagged(&pots.trimmers.values, Some(Subtype::Taper(Taper::Trim))));
            entries
        }
        Family::Other => Vec::new(),
    }
}

/// Observed values first, then missing reference values, deduplicated
pub fn register(
    discovered: &[RawComponent],
    reference: &ReferenceCatalog,
    family: Family,
) -> Vec<CanonicalValue> {
    let mut registry = CanonicalRegistry::new(family);

    for raw in discovered.iter().filter(|r| r.is_candidate_for(family)) {
        registry.add_discovered(raw);
    }
    let observed = registry.len();

    for (entry, subtype) in reference_entries(reference, family) {
        registry.add_expected(entry, subtype);
    }

    debug!(
        "{}: {} observed, {} from reference",
        family,
        observed,
        registry.len() - observed
    );
    registry.into_values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reference::ReferenceList;

    fn list(values: &[&str]) -> ReferenceList {
        ReferenceList {
            values: values.iter().map(|v| ReferenceEntry::new(*v)).collect(),
        }
    }

    fn displays(values: &[CanonicalValue]) -> Vec<&str> {
        values.iter().map(|v| v.display.as_str()).collect()
    }

    #[test]
    fn test_observed_values_in_first_seen_order() {
        let parts = vec![
            RawComponent::new("10K Resistor", "Passives", 100.0),
            RawComponent::new("4.7K Resistor", "Passives", 50.0),
            RawComponent::new("100R Resistor", "Passives", 20.0),
            RawComponent::new("10K Resistor 1%", "Passives", 10.0),
            RawComponent::new("Mystery Resistor", "Passives", 1.0),
        ];
        let values = register(&parts, &ReferenceCatalog::default(), Family::Resistor);
        assert_eq!(displays(&values), vec!["10K", "4.7K", "100R"]);
        // discovered wins over later duplicates
        assert_eq!(values[0].source.stock, 100.0);
    }

    #[test]
    fn test_reference_values_fill_gaps_with_zero_stock() {
        let parts = vec![RawComponent::new("10K Resistor", "Passives", 100.0)];
        let reference = ReferenceCatalog {
            resistors: list(&["10K", "100R", "1M"]),
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Resistor);
        assert_eq!(displays(&values), vec!["10K", "100R", "1M"]);
        assert_eq!(values[1].source.stock, 0.0);
        assert_eq!(values[1].source.name, "100R Resistor");
    }

    #[test]
    fn test_resistor_presence_ignores_ohm_marks() {
        let mut registry = CanonicalRegistry::new(Family::Resistor);
        registry.add_discovered(&RawComponent::new("100R Resistor", "", 5.0));
        assert!(!registry.add_expected(&ReferenceEntry::new("100"), None));
        assert!(!registry.add_expected(&ReferenceEntry::new("100Ω"), None));
    }

    #[test]
    fn test_resistor_presence_is_containment() {
        let parts = vec![RawComponent::new("100K Resistor", "Passives", 5.0)];
        let reference = ReferenceCatalog {
            resistors: list(&["100R", "47K"]),
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Resistor);
        assert_eq!(displays(&values), vec!["100K", "47K"]);
    }

    #[test]
    fn test_capacitor_presence_spans_dielectrics() {
        let parts = vec![RawComponent::new("100nF Ceramic Capacitor", "Passives", 30.0)];
        let reference = ReferenceCatalog {
            capacitors: crate::entities::reference::CapacitorReference {
                ceramic: list(&["100nF"]),
                film: list(&["100nF", "0.1uF", "47nF"]),
                electrolytic: list(&["10uF"]),
            },
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Capacitor);
        let keys: Vec<_> = values
            .iter()
            .map(|v| (v.display.as_str(), v.dielectric()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("100nF", Some(Dielectric::Ceramic)),
                ("47nF", Some(Dielectric::Film)),
                ("10uF", Some(Dielectric::Electrolytic)),
            ]
        );
        assert_eq!(values[1].source.name, "47nF Film Capacitor");
    }

    #[test]
    fn test_text_family_containment() {
        let parts = vec![
            RawComponent::new("1N4148 Diode", "Active/Diodes", 100.0),
            RawComponent::new("Red LED", "Active/Diodes", 10.0),
        ];
        let reference = ReferenceCatalog {
            diodes: list(&["1N4148", "1N34A Germanium Diode", "Blue LED"]),
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Diode);
        assert_eq!(displays(&values), vec!["1N4148", "1N34A"]);
    }

    #[test]
    fn test_transistor_reference_takes_section_polarity() {
        let parts = vec![RawComponent::new("J201", "Active/Transistors/JFET", 5.0)];
        let reference = ReferenceCatalog {
            transistors: crate::entities::reference::TransistorReference {
                npn: list(&["2N3904 NPN"]),
                jfet: list(&["J201"]),
                ..Default::default()
            },
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Transistor);
        assert_eq!(displays(&values), vec!["J201", "2N3904"]);
        assert_eq!(values[1].polarity(), Some(Polarity::Npn));
    }

    #[test]
    fn test_pot_references_strip_taper() {
        let parts = vec![
            RawComponent::new("A100K Pot", "Pots", 3.0),
            RawComponent::new("Pot Knob Black", "Hardware", 40.0),
        ];
        let reference = ReferenceCatalog {
            potentiometers: crate::entities::reference::PotentiometerReference {
                audio_log: list(&["A100K", "A500K"]),
                linear: list(&["B100K"]),
                trimmers: list(&["10K"]),
            },
            ..Default::default()
        };
        let values = register(&parts, &reference, Family::Potentiometer);
        assert_eq!(displays(&values), vec!["100K", "500K", "100K", "10K"]);
        assert_eq!(values[2].subtype, Some(Subtype::Taper(Taper::B)));
        assert_eq!(values[3].source.name, "10K Trimpot");
    }

    #[test]
    fn test_displays_unique_per_subtype() {
        let reference = ReferenceCatalog::embedded().unwrap();
        for family in Family::all() {
            let values = register(&[], &reference, *family);
            let mut keys = HashSet::new();
            for value in &values {
                assert!(keys.insert(value.dedup_key()), "duplicate {:?}", value);
            }
        }
    }
}
