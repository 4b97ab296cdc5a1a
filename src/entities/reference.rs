//! Reference catalog - the values every drawer layout is expected to hold
//!
//! The reference catalog lists components that should get a drawer even when
//! none are in stock yet. It is a YAML file; a default copy is embedded in
//! the binary.

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::entities::component::{Dielectric, Family, Polarity};
use crate::entities::label::DrawerKind;
use crate::yaml::{YamlError, YamlSyntaxError};

#[derive(Embed)]
#[folder = "assets/"]
struct EmbeddedAssets;

const EMBEDDED_REFERENCE: &str = "reference.yaml";

/// One expected value ("10K", "A100K") or part type ("1N4148")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(alias = "type")]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReferenceEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceList {
    #[serde(default)]
    pub values: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitorReference {
    #[serde(default)]
    pub ceramic: ReferenceList,
    #[serde(default)]
    pub film: ReferenceList,
    #[serde(default)]
    pub electrolytic: ReferenceList,
}

impl CapacitorReference {
    pub fn get(&self, dielectric: Dielectric) -> &[ReferenceEntry] {
        match dielectric {
            Dielectric::Ceramic => &self.ceramic.values,
            Dielectric::Film => &self.film.values,
            Dielectric::Electrolytic => &self.electrolytic.values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransistorReference {
    #[serde(default)]
    pub jfet: ReferenceList,
    #[serde(default)]
    pub npn: ReferenceList,
    #[serde(default)]
    pub pnp: ReferenceList,
    #[serde(default)]
    pub mosfet: ReferenceList,
}

impl TransistorReference {
    pub fn get(&self, polarity: Polarity) -> &[ReferenceEntry] {
        match polarity {
            Polarity::Jfet => &self.jfet.values,
            Polarity::Npn => &self.npn.values,
            Polarity::Pnp => &self.pnp.values,
            Polarity::Mosfet => &self.mosfet.values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentiometerReference {
    #[serde(default)]
    pub audio_log: ReferenceList,
    #[serde(default)]
    pub linear: ReferenceList,
    #[serde(default)]
    pub trimmers: ReferenceList,
}

fn default_per_drawer() -> usize {
    4
}

fn default_separator() -> String {
    "  |  ".to_string()
}

/// One block of the label sheet, emitted in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// All drawers of a component family
    Family { family: Family },

    /// A single label with literal texts
    Fixed {
        drawer: DrawerKind,
        top: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bottom: Option<String>,
    },

    /// Literal items chunked into drawers under one prefix
    List {
        drawer: DrawerKind,
        prefix: String,
        items: Vec<String>,
        #[serde(default = "default_per_drawer")]
        per_drawer: usize,
        #[serde(default = "default_separator")]
        separator: String,
    },
}

impl Section {
    fn fixed(drawer: DrawerKind, top: &str, bottom: Option<&str>) -> Self {
        Section::Fixed {
            drawer,
            top: top.to_string(),
            bottom: bottom.map(str::to_string),
        }
    }

    /// The standard workshop layout
    pub fn default_layout() -> Vec<Section> {
        vec![
            Section::Family {
                family: Family::Resistor,
            },
            Section::Family {
                family: Family::Capacitor,
            },
            Section::Family {
                family: Family::Diode,
            },
            Section::Family {
                family: Family::Transistor,
            },
            Section::Family { family: Family::Ic },
            Section::fixed(
                DrawerKind::Medium,
                "IC Socket: 8-pin  |  14-pin  |  16-pin",
                None,
            ),
            Section::Family {
                family: Family::Potentiometer,
            },
            Section::fixed(
                DrawerKind::Small,
                "LEDs 3mm: Red  |  Blue  |  Green  |  Orange",
                Some("LEDs 5mm: Red  |  Blue  |  Green  |  Orange"),
            ),
            Section::fixed(DrawerKind::Small, "LED Bezels: 3mm  |  5mm  |  Spacers", None),
            Section::fixed(
                DrawerKind::Small,
                "1/4\" Jacks: Mono | Stereo",
                Some("DC Jacks: 2.1PNL  |  2.5PNL  | 2.1PCB  | 2.5PCB"),
            ),
            Section::fixed(DrawerKind::Small, "Switches: 3PDT  |  SPDT", None),
            Section::List {
                drawer: DrawerKind::Small,
                prefix: "H-shrink-4x".to_string(),
                items: ["3/32\"", "1/8\"", "3/16\"", "1/4\"", "3/8\"", "1/2\"", "3/4\""]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                per_drawer: 2,
                separator: " | ".to_string(),
            },
            Section::fixed(DrawerKind::Large, "PCBs", Some("Enclosures")),
        ]
    }
}

/// Errors loading a reference catalog
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ReferenceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Embedded reference catalog is missing")]
    #[diagnostic(code(pdk::reference::missing))]
    Missing,
}

/// Expected components per family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub resistors: ReferenceList,

    #[serde(default)]
    pub capacitors: CapacitorReference,

    #[serde(default)]
    pub diodes: ReferenceList,

    #[serde(default)]
    pub transistors: TransistorReference,

    #[serde(default)]
    pub ics: ReferenceList,

    #[serde(default)]
    pub potentiometers: PotentiometerReference,

    /// Label sheet layout, defaults to [`Section::default_layout`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

impl ReferenceCatalog {
    /// Parse YAML text, reporting syntax errors against `filename`
    pub fn from_yaml(source: &str, filename: &str) -> Result<Self, ReferenceError> {
        serde_yml::from_str(source).map_err(|e| {
            ReferenceError::Yaml(YamlError::Syntax(YamlSyntaxError::from_serde_error(
                &e, source, filename,
            )))
        })
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let source = std::fs::read_to_string(path).map_err(YamlError::from)?;
        Self::from_yaml(&source, &path.display().to_string())
    }

    /// The catalog shipped with the binary
    pub fn embedded() -> Result<Self, ReferenceError> {
        let file = EmbeddedAssets::get(EMBEDDED_REFERENCE).ok_or(ReferenceError::Missing)?;
        let source = String::from_utf8_lossy(&file.data);
        Self::from_yaml(&source, EMBEDDED_REFERENCE)
    }

    pub fn sections(&self) -> Vec<Section> {
        self.sections.clone().unwrap_or_else(Section::default_layout)
    }
}
