//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "pdk.yaml";

/// PDK configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inventory server base URL
    pub server: Option<String>,

    /// API token for the inventory server
    pub token: Option<String>,

    /// Reference catalog YAML (embedded catalog when unset)
    pub reference: Option<PathBuf>,

    /// Label sheet CSV path
    pub labels_file: Option<PathBuf>,

    /// Component location map JSON path
    pub location_map_file: Option<PathBuf>,

    /// Top-level stock location name
    pub root_location: Option<String>,

    /// Part category holding buildable assemblies
    pub assembly_category: Option<String>,

    /// How many unmatched components to list after a reconcile
    pub preview_limit: Option<usize>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/pdk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_layer(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./pdk.yaml)
        if let Some(project) = Self::read_layer(Path::new(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }

        // 4. Environment variables
        if let Ok(server) = std::env::var("PDK_URL") {
            config.server = Some(server);
        }
        if let Ok(token) = std::env::var("PDK_TOKEN") {
            config.token = Some(token);
        }
        if let Ok(reference) = std::env::var("PDK_REFERENCE") {
            config.reference = Some(PathBuf::from(reference));
        }

        config
    }

    /// Unreadable or invalid layers are skipped
    fn read_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(layer) => Some(layer),
            Err(e) => {
                tracing::warn!("ignoring config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pdk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.reference.is_some() {
            self.reference = other.reference;
        }
        if other.labels_file.is_some() {
            self.labels_file = other.labels_file;
        }
        if other.location_map_file.is_some() {
            self.location_map_file = other.location_map_file;
        }
        if other.root_location.is_some() {
            self.root_location = other.root_location;
        }
        if other.assembly_category.is_some() {
            self.assembly_category = other.assembly_category;
        }
        if other.preview_limit.is_some() {
            self.preview_limit = other.preview_limit;
        }
    }

    pub fn labels_file(&self) -> PathBuf {
        self.labels_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("labels.csv"))
    }

    pub fn location_map_file(&self) -> PathBuf {
        self.location_map_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("component_locations.json"))
    }

    pub fn root_location(&self) -> String {
        self.root_location
            .clone()
            .unwrap_or_else(|| "Workshop".to_string())
    }

    pub fn assembly_category(&self) -> String {
        self.assembly_category
            .clone()
            .unwrap_or_else(|| "Guitar Pedals".to_string())
    }

    pub fn preview_limit(&self) -> usize {
        self.preview_limit.unwrap_or(10)
    }
}
