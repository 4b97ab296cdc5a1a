//! Core module - value parsing, layout, reconciliation and catalog access

pub mod allocator;
pub mod catalog;
pub mod config;
pub mod grouping;
pub mod labels;
pub mod layout;
pub mod parser;
pub mod picking;
pub mod reconcile;
pub mod registry;
pub mod resolver;
pub mod stock;

pub use allocator::{CapacityWarning, DrawerAllocator, DrawerPair, DrawerUsage};
pub use catalog::{CatalogError, InvenTreeClient, PartRecord, PartsCatalog, Snapshot, SnapshotCatalog};
pub use config::Config;
pub use labels::{LabelSheet, LayoutError};
pub use layout::{Layout, LayoutBuilder, LayoutReport};
pub use picking::PickingSheet;
pub use reconcile::{ReconcileOptions, ReconcileReport, Reconciler};
pub use registry::CanonicalRegistry;
pub use resolver::{IdentityResolver, MatchKind};
pub use stock::{move_stock_to_defaults, MoveReport};
