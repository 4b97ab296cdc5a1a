//! Component to storage location mapping

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::entities::label::Unit;

/// One compartment holding a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub unit: Unit,
    pub drawer: String,
    /// 1..=4
    pub compartment: u32,
}

impl LocationEntry {
    pub fn new(unit: Unit, drawer: impl Into<String>, compartment: u32) -> Self {
        Self {
            unit,
            drawer: drawer.into(),
            compartment,
        }
    }

    /// Short form used on picking sheets, e.g. "U1-S5-2"
    pub fn short_code(&self) -> String {
        format!("{}-{}-{}", self.unit, self.drawer, self.compartment)
    }

    /// Inventory path under `root`, e.g. "Workshop/Unit 1 (U1)/S5/Compartment 2"
    pub fn path(&self, root: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            root,
            self.unit.location_name(),
            self.drawer,
            compartment_name(self.compartment)
        )
    }
}

pub fn compartment_name(index: u32) -> String {
    format!("Compartment {}", index)
}

impl fmt::Display for LocationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// Canonical display value -> every compartment it was printed in.
///
/// Keys keep the order in which they were first seen and the first entry of
/// each list is the component's default location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationMap {
    order: Vec<String>,
    entries: HashMap<String, Vec<LocationEntry>>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, component: &str, entry: LocationEntry) {
        match self.entries.get_mut(component) {
            Some(list) => list.push(entry),
            None => {
                self.order.push(component.to_string());
                self.entries.insert(component.to_string(), vec![entry]);
            }
        }
    }

    pub fn get(&self, component: &str) -> Option<&[LocationEntry]> {
        self.entries.get(component).map(|v| v.as_slice())
    }

    /// The authoritative location: first occurrence
    pub fn default_location(&self, component: &str) -> Option<&LocationEntry> {
        self.entries.get(component).and_then(|v| v.first())
    }

    /// Components in first-seen order with all their locations
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LocationEntry])> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.as_str(), v.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for LocationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (key, locations) in self.iter() {
            map.serialize_entry(key, locations)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocationMapVisitor;

        impl<'de> Visitor<'de> for LocationMapVisitor {
            type Value = LocationMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of component names to location lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = LocationMap::new();
                while let Some((key, locations)) =
                    access.next_entry::<String, Vec<LocationEntry>>()?
                {
                    for location in locations {
                        map.push(&key, location);
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(LocationMapVisitor)
    }
}
