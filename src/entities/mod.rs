//! Entity type definitions
//!
//! - [`RawComponent`] / [`CanonicalValue`] - catalog parts and their parsed values
//! - [`LabelRecord`] - one printed label pair on a drawer stack
//! - [`LocationMap`] - where each component value lives
//! - [`ReferenceCatalog`] - expected stock per family plus the section layout

pub mod component;
pub mod label;
pub mod location;
pub mod reference;

pub use component::{CanonicalValue, Dielectric, Family, Polarity, RawComponent, Subtype, Taper};
pub use label::{DrawerKind, LabelRecord, Unit};
pub use location::{LocationEntry, LocationMap};
pub use reference::{ReferenceCatalog, ReferenceError, Section};
