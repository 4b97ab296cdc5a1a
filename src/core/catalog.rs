//! Parts catalog providers - the inventory the drawers are reconciled with
//!
//! [`InvenTreeClient`] talks to an InvenTree server over its REST API.
//! [`SnapshotCatalog`] serves the same data from a JSON file, which is how
//! runs work offline.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::core::resolver::Named;
use crate::entities::component::RawComponent;

/// Page size used when listing collections
const PAGE_SIZE: usize = 500;

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("No catalog configured")]
    #[diagnostic(
        code(pdk::catalog::not_configured),
        help("Pass --catalog <snapshot.json>, or --server and --token (or set PDK_URL / PDK_TOKEN)")
    )]
    NotConfigured,

    #[error("HTTP error: {0}")]
    #[diagnostic(code(pdk::catalog::http))]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    #[diagnostic(code(pdk::catalog::status))]
    Status { status: u16, url: String, body: String },

    #[error("Part {0} not found")]
    #[diagnostic(code(pdk::catalog::part_not_found))]
    PartNotFound(u64),

    #[error("Stock location {0} not found")]
    #[diagnostic(code(pdk::catalog::location_not_found))]
    LocationNotFound(u64),

    #[error("Stock item {0} not found")]
    #[diagnostic(code(pdk::catalog::stock_not_found))]
    StockItemNotFound(u64),

    #[error("Snapshot JSON error: {0}")]
    #[diagnostic(code(pdk::catalog::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(pdk::catalog::io))]
    Io(#[from] std::io::Error),
}

/// A part as stored in the inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(alias = "pk")]
    pub id: u64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,

    /// Category path such as "Passives/Resistors"
    #[serde(default)]
    pub category_path: String,

    #[serde(default)]
    pub total_in_stock: f64,

    #[serde(default)]
    pub default_location: Option<u64>,
}

impl PartRecord {
    pub fn to_raw(&self) -> RawComponent {
        RawComponent {
            id: Some(self.id),
            name: self.name.clone(),
            category_path: self.category_path.clone(),
            stock_quantity: self.total_in_stock.max(0.0),
        }
    }
}

impl Named for PartRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockLocation {
    #[serde(alias = "pk")]
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parent: Option<u64>,

    /// Full path, e.g. "Workshop/Unit 1 (U1)/S5/Compartment 2"
    #[serde(default)]
    pub pathstring: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(alias = "pk")]
    pub id: u64,

    pub part: u64,

    #[serde(default)]
    pub location: Option<u64>,

    #[serde(default)]
    pub quantity: f64,
}

/// One line of an assembly's bill of materials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    /// The assembly this line belongs to
    pub part: u64,

    pub sub_part: u64,

    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub quantity: f64,
}

/// Blocking access to an inventory of parts and stock locations
pub trait PartsCatalog {
    fn list_parts(&self) -> Result<Vec<PartRecord>, CatalogError>;

    fn get_part(&self, id: u64) -> Result<PartRecord, CatalogError>;

    fn set_default_location(&mut self, part: u64, location: u64) -> Result<(), CatalogError>;

    fn list_locations(&self) -> Result<Vec<StockLocation>, CatalogError>;

    /// Location called `name` directly under `parent` (None = top level)
    fn find_location(
        &self,
        name: &str,
        parent: Option<u64>,
    ) -> Result<Option<StockLocation>, CatalogError> {
        Ok(self
            .list_locations()?
            .into_iter()
            .find(|l| l.name == name && l.parent == parent))
    }

    fn create_location(
        &mut self,
        name: &str,
        parent: Option<u64>,
        description: &str,
    ) -> Result<StockLocation, CatalogError>;

    /// Same name and parent always yield the same location
    fn get_or_create_location(
        &mut self,
        name: &str,
        parent: Option<u64>,
        description: &str,
    ) -> Result<StockLocation, CatalogError> {
        if let Some(existing) = self.find_location(name, parent)? {
            return Ok(existing);
        }
        debug!("creating location '{}' under {:?}", name, parent);
        self.create_location(name, parent, description)
    }

    fn location_path(&self, id: u64) -> Result<String, CatalogError>;

    fn list_stock_items(&self, part: u64) -> Result<Vec<StockItem>, CatalogError>;

    fn move_stock_item(&mut self, stock: u64, location: u64) -> Result<(), CatalogError>;

    fn list_bom(&self, part: u64) -> Result<Vec<BomLine>, CatalogError>;

    /// Persist pending changes; a no-op for live servers
    fn flush(&mut self) -> Result<(), CatalogError> {
        Ok(())
    }
}

/// Collection payloads come either bare or wrapped in a page
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Page {
        results: Vec<T>,
        #[serde(default)]
        next: Option<String>,
    },
}

#[derive(Deserialize)]
struct CategoryRecord {
    #[serde(alias = "pk")]
    id: u64,
    #[serde(default)]
    pathstring: String,
}

/// InvenTree REST API client
pub struct InvenTreeClient {
    base_url: String,
    token: String,
    http: Client,
    categories: HashMap<u64, String>,
}

impl InvenTreeClient {
    /// Connect and load the part category table
    pub fn connect(base_url: &str, token: &str) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let mut client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
            categories: HashMap::new(),
        };
        client.categories = client
            .list::<CategoryRecord>("part/category/", &[])?
            .into_iter()
            .map(|c| (c.id, c.pathstring))
            .collect();
        debug!("loaded {} part categories", client.categories.len());
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn auth(&self) -> String {
        format!("Token {}", self.token)
    }

    fn check(response: Response) -> Result<Response, CatalogError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().unwrap_or_default();
        Err(CatalogError::Status { status, url, body })
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .query(query)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    /// Every item of a collection, following pages until `next` is empty
    fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let mut items = Vec::new();
        let mut offset = 0;
        loop {
            let mut params = query.to_vec();
            params.push(("limit", PAGE_SIZE.to_string()));
            params.push(("offset", offset.to_string()));

            match self.get::<Listing<T>>(path, &params)? {
                Listing::Bare(all) => {
                    items.extend(all);
                    return Ok(items);
                }
                Listing::Page { results, next } => {
                    let fetched = results.len();
                    items.extend(results);
                    if next.is_none() || fetched == 0 {
                        return Ok(items);
                    }
                    offset += fetched;
                }
            }
        }
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, CatalogError> {
        let response = self
            .http
            .request(method, self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(body)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn with_category_path(&self, mut part: PartRecord) -> PartRecord {
        if let Some(path) = part.category.and_then(|c| self.categories.get(&c)) {
            part.category_path = path.clone();
        }
        part
    }
}

impl PartsCatalog for InvenTreeClient {
    fn list_parts(&self) -> Result<Vec<PartRecord>, CatalogError> {
        let parts = self.list::<PartRecord>("part/", &[("active", "true".to_string())])?;
        Ok(parts
            .into_iter()
            .map(|p| self.with_category_path(p))
            .collect())
    }

    fn get_part(&self, id: u64) -> Result<PartRecord, CatalogError> {
        let part = self.get::<PartRecord>(&format!("part/{}/", id), &[])?;
        Ok(self.with_category_path(part))
    }

    fn set_default_location(&mut self, part: u64, location: u64) -> Result<(), CatalogError> {
        let body = serde_json::json!({ "default_location": location });
        self.send_json::<serde_json::Value>(reqwest::Method::PATCH, &format!("part/{}/", part), &body)?;
        Ok(())
    }

    fn list_locations(&self) -> Result<Vec<StockLocation>, CatalogError> {
        self.list("stock/location/", &[])
    }

    fn find_location(
        &self,
        name: &str,
        parent: Option<u64>,
    ) -> Result<Option<StockLocation>, CatalogError> {
        let mut query = vec![("name", name.to_string())];
        match parent {
            Some(p) => query.push(("parent", p.to_string())),
            None => query.push(("top_level", "true".to_string())),
        }
        // the server's name filter is advisory on older versions
        Ok(self
            .list::<StockLocation>("stock/location/", &query)?
            .into_iter()
            .find(|l| l.name == name && l.parent == parent))
    }

    fn create_location(
        &mut self,
        name: &str,
        parent: Option<u64>,
        description: &str,
    ) -> Result<StockLocation, CatalogError> {
        let mut body = serde_json::json!({ "name": name, "description": description });
        if let Some(p) = parent {
            body["parent"] = serde_json::json!(p);
        }
        self.send_json(reqwest::Method::POST, "stock/location/", &body)
    }

    fn location_path(&self, id: u64) -> Result<String, CatalogError> {
        let location = self.get::<StockLocation>(&format!("stock/location/{}/", id), &[])?;
        Ok(location.pathstring)
    }

    fn list_stock_items(&self, part: u64) -> Result<Vec<StockItem>, CatalogError> {
        self.list("stock/", &[("part", part.to_string())])
    }

    fn move_stock_item(&mut self, stock: u64, location: u64) -> Result<(), CatalogError> {
        let body = serde_json::json!({ "location": location });
        self.send_json::<serde_json::Value>(reqwest::Method::PATCH, &format!("stock/{}/", stock), &body)?;
        Ok(())
    }

    fn list_bom(&self, part: u64) -> Result<Vec<BomLine>, CatalogError> {
        self.list("bom/", &[("part", part.to_string())])
    }
}

/// On-disk catalog contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub parts: Vec<PartRecord>,

    #[serde(default)]
    pub locations: Vec<StockLocation>,

    #[serde(default)]
    pub stock: Vec<StockItem>,

    #[serde(default)]
    pub bom: Vec<BomLine>,
}

impl Snapshot {
    /// Capture everything a run needs from another catalog
    pub fn export(catalog: &dyn PartsCatalog) -> Result<Self, CatalogError> {
        let parts = catalog.list_parts()?;
        let mut stock = Vec::new();
        let mut bom = Vec::new();
        for part in &parts {
            stock.extend(catalog.list_stock_items(part.id)?);
            bom.extend(catalog.list_bom(part.id)?);
        }
        Ok(Self {
            exported_at: Some(Utc::now()),
            parts,
            locations: catalog.list_locations()?,
            stock,
            bom,
        })
    }
}

/// Catalog backed by a JSON snapshot file
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    path: Option<PathBuf>,
    data: Snapshot,
    dirty: bool,
}

impl SnapshotCatalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let data: Snapshot = serde_json::from_str(&contents)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
            dirty: false,
        })
    }

    /// In-memory catalog that is never written back
    pub fn from_snapshot(data: Snapshot) -> Self {
        Self {
            path: None,
            data,
            dirty: false,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    fn location(&self, id: u64) -> Result<&StockLocation, CatalogError> {
        self.data
            .locations
            .iter()
            .find(|l| l.id == id)
            .ok_or(CatalogError::LocationNotFound(id))
    }
}

impl PartsCatalog for SnapshotCatalog {
    fn list_parts(&self) -> Result<Vec<PartRecord>, CatalogError> {
        Ok(self.data.parts.clone())
    }

    fn get_part(&self, id: u64) -> Result<PartRecord, CatalogError> {
        self.data
            .parts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::PartNotFound(id))
    }

    fn set_default_location(&mut self, part: u64, location: u64) -> Result<(), CatalogError> {
        self.location(location)?;
        let record = self
            .data
            .parts
            .iter_mut()
            .find(|p| p.id == part)
            .ok_or(CatalogError::PartNotFound(part))?;
        record.default_location = Some(location);
        self.dirty = true;
        Ok(())
    }

    fn list_locations(&self) -> Result<Vec<StockLocation>, CatalogError> {
        Ok(self.data.locations.clone())
    }

    fn create_location(
        &mut self,
        name: &str,
        parent: Option<u64>,
        description: &str,
    ) -> Result<StockLocation, CatalogError> {
        let pathstring = match parent {
            Some(p) => format!("{}/{}", self.location(p)?.pathstring, name),
            None => name.to_string(),
        };
        let id = self.data.locations.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let location = StockLocation {
            id,
            name: name.to_string(),
            description: description.to_string(),
            parent,
            pathstring,
        };
        self.data.locations.push(location.clone());
        self.dirty = true;
        Ok(location)
    }

    fn location_path(&self, id: u64) -> Result<String, CatalogError> {
        Ok(self.location(id)?.pathstring.clone())
    }

    fn list_stock_items(&self, part: u64) -> Result<Vec<StockItem>, CatalogError> {
        Ok(self
            .data
            .stock
            .iter()
            .filter(|s| s.part == part)
            .cloned()
            .collect())
    }

    fn move_stock_item(&mut self, stock: u64, location: u64) -> Result<(), CatalogError> {
        self.location(location)?;
        let item = self
            .data
            .stock
            .iter_mut()
            .find(|s| s.id == stock)
            .ok_or(CatalogError::StockItemNotFound(stock))?;
        item.location = Some(location);
        self.dirty = true;
        Ok(())
    }

    fn list_bom(&self, part: u64) -> Result<Vec<BomLine>, CatalogError> {
        Ok(self
            .data
            .bom
            .iter()
            .filter(|b| b.part == part)
            .cloned()
            .collect())
    }

    fn flush(&mut self) -> Result<(), CatalogError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(path) = self.path.clone() {
            self.save(&path)?;
        }
        self.dirty = false;
        Ok(())
    }
}
