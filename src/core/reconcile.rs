//! Reconciliation - point inventory parts at their labelled compartments

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use crate::core::catalog::{CatalogError, PartRecord, PartsCatalog};
use crate::core::resolver::{IdentityResolver, MatchKind};
use crate::entities::label::{compartment_position, parse_drawer_id, Unit};
use crate::entities::location::{compartment_name, LocationEntry, LocationMap};

const ROOT_DESCRIPTION: &str = "Main workshop storage";

/// Stock locations created or found during one run
pub struct LocationTree {
    units: HashMap<Unit, u64>,
    drawers: HashMap<(Unit, String), u64>,
    compartments: HashMap<(u64, u32), u64>,
}

impl LocationTree {
    /// Ensure `<root>/Unit 1 (U1)` and `<root>/Unit 2 (U2)` exist
    pub fn ensure(catalog: &mut dyn PartsCatalog, root: &str) -> Result<Self, CatalogError> {
        let root_location = catalog.get_or_create_location(root, None, ROOT_DESCRIPTION)?;
        let mut units = HashMap::new();
        for unit in [Unit::U1, Unit::U2] {
            let location = catalog.get_or_create_location(
                unit.location_name(),
                Some(root_location.id),
                unit.description(),
            )?;
            units.insert(unit, location.id);
        }
        Ok(Self {
            units,
            drawers: HashMap::new(),
            compartments: HashMap::new(),
        })
    }

    /// Location id of a compartment, creating the drawer and compartment
    /// on first use
    pub fn compartment(
        &mut self,
        catalog: &mut dyn PartsCatalog,
        entry: &LocationEntry,
    ) -> Result<u64, CatalogError> {
        let drawer_key = (entry.unit, entry.drawer.clone());
        let drawer = match self.drawers.get(&drawer_key) {
            Some(id) => *id,
            None => {
                let unit_id = self.units[&entry.unit];
                let description = match parse_drawer_id(&entry.drawer) {
                    Some((kind, _)) => kind.describe(&entry.drawer),
                    None => format!("Drawer {}", entry.drawer),
                };
                let id = catalog
                    .get_or_create_location(&entry.drawer, Some(unit_id), &description)?
                    .id;
                self.drawers.insert(drawer_key, id);
                id
            }
        };

        if let Some(id) = self.compartments.get(&(drawer, entry.compartment)) {
            return Ok(*id);
        }
        let id = catalog
            .get_or_create_location(
                &compartment_name(entry.compartment),
                Some(drawer),
                &compartment_position(entry.compartment),
            )?
            .id;
        self.compartments.insert((drawer, entry.compartment), id);
        Ok(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Resolve and report without writing to the catalog
    pub dry_run: bool,
    /// Also consider parts that already have a default location
    pub all_parts: bool,
    /// Top-level location name
    pub root: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMatch {
    pub component: String,
    pub part_id: u64,
    pub part_name: String,
    pub strategy: MatchKind,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileFailure {
    pub component: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub dry_run: bool,
    /// Size of the candidate pool at the start of the run
    pub candidates: usize,
    pub matched: Vec<ComponentMatch>,
    /// Parts whose default location was written
    pub updated: usize,
    pub strategies: BTreeMap<MatchKind, usize>,
    pub unmatched: Vec<String>,
    pub errors: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    /// First `limit` unmatched component names
    pub fn unmatched_preview(&self, limit: usize) -> &[String] {
        &self.unmatched[..self.unmatched.len().min(limit)]
    }
}

pub struct Reconciler<'a> {
    catalog: &'a mut dyn PartsCatalog,
    resolver: IdentityResolver,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a mut dyn PartsCatalog, options: ReconcileOptions) -> Self {
        Self {
            catalog,
            resolver: IdentityResolver::new(),
            options,
        }
    }

    /// Resolve every mapped component and set its part's default location.
    /// Only listing parts and creating the unit hierarchy are fatal.
    pub fn run(&mut self, map: &LocationMap) -> Result<ReconcileReport, CatalogError> {
        let mut pool: Vec<PartRecord> = self
            .catalog
            .list_parts()?
            .into_iter()
            .filter(|p| self.options.all_parts || p.default_location.is_none())
            .collect();
        info!("{} candidate parts", pool.len());

        let mut tree = if self.options.dry_run {
            None
        } else {
            Some(LocationTree::ensure(&mut *self.catalog, &self.options.root)?)
        };

        let mut report = ReconcileReport {
            dry_run: self.options.dry_run,
            candidates: pool.len(),
            ..Default::default()
        };

        for (component, locations) in map.iter() {
            let Some(entry) = locations.first() else {
                continue;
            };
            let Some(resolution) = self.resolver.resolve(component, &pool) else {
                debug!("no match for {}", component);
                report.unmatched.push(component.to_string());
                continue;
            };
            let strategy = resolution.strategy;
            // a part is claimed by at most one component
            let part = pool.remove(resolution.index);

            if let Some(tree) = tree.as_mut() {
                let result = tree
                    .compartment(&mut *self.catalog, entry)
                    .and_then(|id| self.catalog.set_default_location(part.id, id));
                if let Err(e) = result {
                    warn!("{}: {}", component, e);
                    report.errors.push(ReconcileFailure {
                        component: component.to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
                report.updated += 1;
            }

            *report.strategies.entry(strategy).or_insert(0) += 1;
            report.matched.push(ComponentMatch {
                component: component.to_string(),
                part_id: part.id,
                part_name: part.name,
                strategy,
                location: entry.path(&self.options.root),
            });
        }

        self.catalog.flush()?;
        Ok(report)
    }
}
