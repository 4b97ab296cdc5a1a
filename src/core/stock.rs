//! Stock move pass - put physical stock where the labels say it lives

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::core::catalog::{CatalogError, PartsCatalog};

pub const NO_LOCATION: &str = "No Location";
const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMove {
    pub part: String,
    pub stock_id: u64,
    pub quantity: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveFailure {
    pub part: String,
    pub stock_id: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MoveReport {
    pub dry_run: bool,
    /// Parts that have a default location
    pub parts: usize,
    pub moved: Vec<StockMove>,
    pub already_correct: usize,
    pub errors: Vec<MoveFailure>,
}

/// Location paths looked up at most once per run
struct PathCache<'c> {
    catalog: &'c dyn PartsCatalog,
    paths: HashMap<u64, String>,
}

impl<'c> PathCache<'c> {
    fn path(&mut self, id: Option<u64>) -> String {
        let Some(id) = id else {
            return NO_LOCATION.to_string();
        };
        if let Some(path) = self.paths.get(&id) {
            return path.clone();
        }
        let path = self
            .catalog
            .location_path(id)
            .unwrap_or_else(|_| UNKNOWN_LOCATION.to_string());
        self.paths.insert(id, path.clone());
        path
    }
}

/// Move every stock item of every located part to that part's default
/// location. Items already there are counted, not touched.
pub fn move_stock_to_defaults(
    catalog: &mut dyn PartsCatalog,
    dry_run: bool,
) -> Result<MoveReport, CatalogError> {
    let parts: Vec<_> = catalog
        .list_parts()?
        .into_iter()
        .filter(|p| p.default_location.is_some())
        .collect();
    debug!("{} parts with a default location", parts.len());

    let mut report = MoveReport {
        dry_run,
        parts: parts.len(),
        ..Default::default()
    };
    let mut planned = Vec::new();

    {
        let mut cache = PathCache {
            catalog: &*catalog,
            paths: HashMap::new(),
        };
        for part in &parts {
            let target = part.default_location;
            let items = match cache.catalog.list_stock_items(part.id) {
                Ok(items) => items,
                Err(e) => {
                    warn!("{}: {}", part.name, e);
                    report.errors.push(MoveFailure {
                        part: part.name.clone(),
                        stock_id: 0,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            for item in items {
                if item.location == target {
                    report.already_correct += 1;
                    continue;
                }
                planned.push((
                    target.unwrap_or_default(),
                    StockMove {
                        part: part.name.clone(),
                        stock_id: item.id,
                        quantity: item.quantity,
                        from: cache.path(item.location),
                        to: cache.path(target),
                    },
                ));
            }
        }
    }

    for (location, planned_move) in planned {
        if !dry_run {
            if let Err(e) = catalog.move_stock_item(planned_move.stock_id, location) {
                warn!("{}: {}", planned_move.part, e);
                report.errors.push(MoveFailure {
                    part: planned_move.part,
                    stock_id: planned_move.stock_id,
                    message: e.to_string(),
                });
                continue;
            }
        }
        report.moved.push(planned_move);
    }

    if !dry_run {
        catalog.flush()?;
    }
    Ok(report)
}
