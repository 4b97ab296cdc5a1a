//! Shared utilities for CLI commands

use miette::Result;
use std::path::Path;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::core::catalog::{CatalogError, InvenTreeClient, PartsCatalog, SnapshotCatalog};
use crate::core::Config;
use crate::entities::location::LocationMap;
use crate::entities::reference::ReferenceCatalog;

/// The catalog selected by `--catalog`, or the server from flags/config
pub fn open_catalog(global: &GlobalOpts, config: &Config) -> Result<Box<dyn PartsCatalog>> {
    if let Some(path) = &global.catalog {
        debug!("using catalog snapshot {}", path.display());
        return Ok(Box::new(SnapshotCatalog::load(path)?));
    }

    let server = global.server.clone().or_else(|| config.server.clone());
    let token = global.token.clone().or_else(|| config.token.clone());
    match (server, token) {
        (Some(server), Some(token)) => {
            debug!("connecting to {}", server);
            Ok(Box::new(InvenTreeClient::connect(&server, &token)?))
        }
        _ => Err(CatalogError::NotConfigured.into()),
    }
}

/// Reference catalog from config, or the embedded one
pub fn load_reference(config: &Config) -> Result<ReferenceCatalog> {
    let reference = match &config.reference {
        Some(path) => ReferenceCatalog::load(path)?,
        None => ReferenceCatalog::embedded()?,
    };
    Ok(reference)
}

/// Location map written by `pdk locations`
pub fn load_location_map(path: &Path) -> Result<LocationMap> {
    if !path.exists() {
        return Err(miette::miette!(
            help = "Run `pdk locations` to build it from the label sheet",
            "Location map '{}' not found",
            path.display()
        ));
    }
    Ok(LocationMap::load(path)?)
}
