//! Component types - raw catalog parts and their canonical values

use serde::{Deserialize, Serialize};

/// Top-level component category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Resistor,
    Capacitor,
    Diode,
    Transistor,
    Ic,
    Potentiometer,
    Other,
}

impl Family {
    /// Families that get drawers assigned from catalog data
    pub fn all() -> &'static [Family] {
        &[
            Family::Resistor,
            Family::Capacitor,
            Family::Diode,
            Family::Transistor,
            Family::Ic,
            Family::Potentiometer,
        ]
    }

    /// Families whose canonical value carries a physical quantity
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Family::Resistor | Family::Capacitor | Family::Potentiometer
        )
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Resistor => write!(f, "resistor"),
            Family::Capacitor => write!(f, "capacitor"),
            Family::Diode => write!(f, "diode"),
            Family::Transistor => write!(f, "transistor"),
            Family::Ic => write!(f, "ic"),
            Family::Potentiometer => write!(f, "potentiometer"),
            Family::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resistor" | "r" => Ok(Family::Resistor),
            "capacitor" | "cap" | "c" => Ok(Family::Capacitor),
            "diode" | "d" => Ok(Family::Diode),
            "transistor" | "q" => Ok(Family::Transistor),
            "ic" => Ok(Family::Ic),
            "potentiometer" | "pot" => Ok(Family::Potentiometer),
            "other" => Ok(Family::Other),
            _ => Err(format!(
                "Invalid family: {}. Use resistor, capacitor, diode, transistor, ic, potentiometer, or other",
                s
            )),
        }
    }
}

/// Capacitor dielectric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dielectric {
    Ceramic,
    Film,
    Electrolytic,
}

impl Dielectric {
    /// Label sections are always emitted in this order
    pub fn all() -> &'static [Dielectric] {
        &[Dielectric::Ceramic, Dielectric::Film, Dielectric::Electrolytic]
    }

    /// Classify from a part name ("film" wins over "electrolytic")
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("film") {
            Dielectric::Film
        } else if lower.contains("electrolytic") || lower.contains("elec") {
            Dielectric::Electrolytic
        } else {
            Dielectric::Ceramic
        }
    }

    pub fn label_prefix(&self) -> &'static str {
        match self {
            Dielectric::Ceramic => "Caps Cer",
            Dielectric::Film => "Caps Film",
            Dielectric::Electrolytic => "Caps Elect",
        }
    }

    /// Title-cased name used for synthesized part names
    pub fn title(&self) -> &'static str {
        match self {
            Dielectric::Ceramic => "Ceramic",
            Dielectric::Film => "Film",
            Dielectric::Electrolytic => "Electrolytic",
        }
    }
}

impl std::fmt::Display for Dielectric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dielectric::Ceramic => write!(f, "ceramic"),
            Dielectric::Film => write!(f, "film"),
            Dielectric::Electrolytic => write!(f, "electrolytic"),
        }
    }
}

/// Transistor polarity / technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    Jfet,
    Npn,
    Pnp,
    Mosfet,
}

impl Polarity {
    pub fn all() -> &'static [Polarity] {
        &[Polarity::Jfet, Polarity::Npn, Polarity::Pnp, Polarity::Mosfet]
    }

    /// Classify from a category path, checked jfet, npn, pnp, mosfet
    pub fn from_category_path(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| lower.contains(&p.to_string().to_lowercase()))
    }

    pub fn label_prefix(&self) -> String {
        format!("Q {}", self)
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Jfet => write!(f, "JFET"),
            Polarity::Npn => write!(f, "NPN"),
            Polarity::Pnp => write!(f, "PNP"),
            Polarity::Mosfet => write!(f, "MOSFET"),
        }
    }
}

/// Potentiometer taper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Taper {
    /// Audio / logarithmic
    A,
    /// Linear
    B,
    /// Reverse log
    C,
    W,
    Trim,
}

impl Taper {
    /// Grouping key the taper is filed under
    pub fn group_key(&self) -> &'static str {
        match self {
            Taper::A | Taper::C | Taper::W => "Pots A",
            Taper::B => "Pots B",
            Taper::Trim => "Trim Pots",
        }
    }
}

impl std::fmt::Display for Taper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Taper::A => write!(f, "A"),
            Taper::B => write!(f, "B"),
            Taper::C => write!(f, "C"),
            Taper::W => write!(f, "W"),
            Taper::Trim => write!(f, "trim"),
        }
    }
}

/// Secondary classification within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Dielectric(Dielectric),
    Polarity(Polarity),
    Taper(Taper),
}

impl std::fmt::Display for Subtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subtype::Dielectric(d) => write!(f, "{}", d),
            Subtype::Polarity(p) => write!(f, "{}", p),
            Subtype::Taper(t) => write!(f, "{}", t),
        }
    }
}

/// A part as read from the catalog provider or the reference catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    /// Catalog primary key (None for reference entries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub name: String,

    /// Category path such as "Active/Transistors/NPN"
    #[serde(default)]
    pub category_path: String,

    #[serde(default)]
    pub stock_quantity: f64,
}

impl RawComponent {
    pub fn new(name: impl Into<String>, category_path: impl Into<String>, stock: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category_path: category_path.into(),
            stock_quantity: stock,
        }
    }

    /// Whether this part should be offered to the parser for `family`.
    ///
    /// A part may be a candidate for several families ("Pot Dust Cap"
    /// looks like both a pot and a capacitor); the parser rejects the
    /// ones that don't fit.
    pub fn is_candidate_for(&self, family: Family) -> bool {
        let name = self.name.to_lowercase();
        let path = self.category_path.to_lowercase();
        match family {
            Family::Resistor => name.contains("resistor"),
            Family::Capacitor => name.contains("capacitor") || name.contains("cap"),
            Family::Diode => path.contains("diode") && !name.contains("led"),
            Family::Transistor => path.contains("transistor"),
            Family::Ic => {
                self.category_path.starts_with("ICs")
                    || self.category_path.starts_with("Active/ICs")
            }
            Family::Potentiometer => name.contains("pot"),
            Family::Other => false,
        }
    }

    /// First family this part is a candidate for
    pub fn family_hint(&self) -> Family {
        Family::all()
            .iter()
            .copied()
            .find(|f| self.is_candidate_for(*f))
            .unwrap_or(Family::Other)
    }
}

/// Back-reference to the record a canonical value came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub stock: f64,
}

/// A parsed, canonicalized component value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalValue {
    /// Physical quantity in the family's base unit (ohms, picofarads);
    /// 0 for families without one
    pub numeric_value: f64,

    /// Human-readable canonical form printed on labels
    pub display: String,

    pub family: Family,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,

    pub source: SourceRecord,
}

impl CanonicalValue {
    pub fn new(
        numeric_value: f64,
        display: impl Into<String>,
        family: Family,
        subtype: Option<Subtype>,
    ) -> Self {
        Self {
            numeric_value,
            display: display.into(),
            family,
            subtype,
            source: SourceRecord::default(),
        }
    }

    pub fn with_source(mut self, name: impl Into<String>, stock: f64) -> Self {
        self.source = SourceRecord {
            name: name.into(),
            stock,
        };
        self
    }

    /// Uniqueness key within a family
    pub fn dedup_key(&self) -> (String, Option<Subtype>) {
        (self.display.clone(), self.subtype)
    }

    pub fn dielectric(&self) -> Option<Dielectric> {
        match self.subtype {
            Some(Subtype::Dielectric(d)) => Some(d),
            _ => None,
        }
    }

    pub fn polarity(&self) -> Option<Polarity> {
        match self.subtype {
            Some(Subtype::Polarity(p)) => Some(p),
            _ => None,
        }
    }
}
