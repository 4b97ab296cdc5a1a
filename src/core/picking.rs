//! Picking sheets - an assembly's bill of materials ordered by drawer

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::catalog::{CatalogError, PartRecord, PartsCatalog};
use crate::entities::label::parse_drawer_id;
use crate::entities::location::LocationMap;

pub const LOCATION_NOT_SET: &str = "Location Not Set";

const UNKNOWN_SORT_KEY: (u32, u32, u32) = (999, 999, 999);

/// One BOM line to pick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickLine {
    pub reference: String,
    pub part_id: u64,
    pub name: String,
    pub quantity: f64,
    pub available: f64,
    pub location: String,
}

impl PickLine {
    pub fn in_stock(&self) -> bool {
        self.available >= self.quantity
    }

    /// Units still to order, zero when in stock
    pub fn shortfall(&self) -> f64 {
        (self.quantity - self.available).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationGroup {
    pub location: String,
    pub lines: Vec<PickLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickingSheet {
    pub assembly: String,
    pub groups: Vec<LocationGroup>,
}

impl PickingSheet {
    pub fn build(
        catalog: &dyn PartsCatalog,
        assembly: &PartRecord,
        map: &LocationMap,
    ) -> Result<Self, CatalogError> {
        let bom = catalog.list_bom(assembly.id)?;
        debug!("{} BOM lines for {}", bom.len(), assembly.name);

        let mut paths: HashMap<u64, String> = HashMap::new();
        let mut groups: Vec<LocationGroup> = Vec::new();

        for line in bom {
            let part = catalog.get_part(line.sub_part)?;
            let location = match part.default_location {
                Some(id) => match paths.get(&id) {
                    Some(path) => path.clone(),
                    None => {
                        let path = catalog.location_path(id)?;
                        paths.insert(id, path.clone());
                        path
                    }
                },
                None => mapped_location(&part.name, map),
            };

            let pick = PickLine {
                reference: line.reference,
                part_id: part.id,
                name: part.name,
                quantity: line.quantity,
                available: part.total_in_stock,
                location: location.clone(),
            };
            match groups.iter_mut().find(|g| g.location == location) {
                Some(group) => group.lines.push(pick),
                None => groups.push(LocationGroup {
                    location,
                    lines: vec![pick],
                }),
            }
        }

        groups.sort_by(|a, b| {
            location_sort_key(&a.location)
                .cmp(&location_sort_key(&b.location))
                .then_with(|| a.location.cmp(&b.location))
        });

        Ok(Self {
            assembly: assembly.name.clone(),
            groups,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &PickLine> {
        self.groups.iter().flat_map(|g| g.lines.iter())
    }

    pub fn total_lines(&self) -> usize {
        self.groups.iter().map(|g| g.lines.len()).sum()
    }

    pub fn unique_locations(&self) -> usize {
        self.groups.len()
    }

    pub fn in_stock(&self) -> usize {
        self.lines().filter(|l| l.in_stock()).count()
    }

    pub fn shortages(&self) -> Vec<&PickLine> {
        self.lines().filter(|l| !l.in_stock()).collect()
    }
}

/// Location-map fallback in the short "U1-S5-2" form
fn mapped_location(part_name: &str, map: &LocationMap) -> String {
    map.iter()
        .filter(|(component, _)| !component.is_empty())
        .find(|(component, _)| part_name.contains(component) || component.contains(part_name))
        .and_then(|(_, locations)| locations.first())
        .map(|entry| entry.short_code())
        .unwrap_or_else(|| LOCATION_NOT_SET.to_string())
}

/// `(unit, drawer number, compartment)` from either "U1-S5-2" or
/// "Workshop/Unit 1 (U1)/S5/Compartment 2". Anything else sorts last.
pub fn location_sort_key(location: &str) -> (u32, u32, u32) {
    let parts: Vec<&str> = if location.contains('/') {
        location.split('/').collect()
    } else {
        location.split('-').collect()
    };
    if parts.len() < 3 {
        return UNKNOWN_SORT_KEY;
    }
    let tail = &parts[parts.len() - 3..];

    let unit = if tail[0].contains("U1") {
        1
    } else if tail[0].contains("U2") {
        2
    } else {
        return UNKNOWN_SORT_KEY;
    };
    let Some((_, drawer)) = parse_drawer_id(tail[1].trim()) else {
        return UNKNOWN_SORT_KEY;
    };
    let compartment = tail[2]
        .trim()
        .trim_start_matches("Compartment")
        .trim()
        .parse()
        .unwrap_or(0);
    (unit, drawer, compartment)
}

/// Parts in the assembly category, matched on the last category segment
pub fn find_assemblies(
    catalog: &dyn PartsCatalog,
    category: &str,
) -> Result<Vec<PartRecord>, CatalogError> {
    let wanted = category.to_lowercase();
    Ok(catalog
        .list_parts()?
        .into_iter()
        .filter(|p| {
            let path = p.category_path.to_lowercase();
            path == wanted || path.rsplit('/').next() == Some(wanted.as_str())
        })
        .collect())
}

/// First assembly whose name contains `query`, case-insensitively
pub fn find_assembly<'a>(assemblies: &'a [PartRecord], query: &str) -> Option<&'a PartRecord> {
    let query = query.to_lowercase();
    assemblies
        .iter()
        .find(|p| p.name.to_lowercase().contains(&query))
}
