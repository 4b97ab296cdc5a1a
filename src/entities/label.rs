//! Drawer and label types

use serde::{Deserialize, Serialize};

/// Physical storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    /// Small drawers with 4x compartments
    U1,
    /// Mixed unit: large, tall and medium drawers
    U2,
}

impl Unit {
    /// Location name used in the inventory hierarchy
    pub fn location_name(&self) -> &'static str {
        match self {
            Unit::U1 => "Unit 1 (U1)",
            Unit::U2 => "Unit 2 (U2)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Unit::U1 => "Small drawer unit - 4x compartment drawers",
            Unit::U2 => "Mixed drawer unit - Large/Tall/Medium",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::U1 => write!(f, "U1"),
            Unit::U2 => write!(f, "U2"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "U1" => Ok(Unit::U1),
            "U2" => Ok(Unit::U2),
            _ => Err(format!("Invalid unit: '{}'. Use U1 or U2", s)),
        }
    }
}

/// Physical drawer size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerKind {
    /// S1.. in U1, no fixed limit
    Small,
    /// L1-L3 in U2
    Large,
    /// T1-T4 in U2
    Tall,
    /// M1-M16 in U2
    Medium,
}

impl DrawerKind {
    pub fn prefix(&self) -> char {
        match self {
            DrawerKind::Small => 'S',
            DrawerKind::Large => 'L',
            DrawerKind::Tall => 'T',
            DrawerKind::Medium => 'M',
        }
    }

    /// Number of physical drawers of this kind, None when unbounded
    pub fn capacity(&self) -> Option<u32> {
        match self {
            DrawerKind::Small => None,
            DrawerKind::Large => Some(3),
            DrawerKind::Tall => Some(4),
            DrawerKind::Medium => Some(16),
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            DrawerKind::Small => Unit::U1,
            _ => Unit::U2,
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'S' => Some(DrawerKind::Small),
            'L' => Some(DrawerKind::Large),
            'T' => Some(DrawerKind::Tall),
            'M' => Some(DrawerKind::Medium),
            _ => None,
        }
    }

    /// Drawer location description for the inventory hierarchy
    pub fn describe(&self, drawer_id: &str) -> String {
        match self {
            DrawerKind::Small => format!("Small drawer {} - 4x compartments", drawer_id),
            DrawerKind::Large => format!("Large drawer {}", drawer_id),
            DrawerKind::Tall => format!("Tall drawer {}", drawer_id),
            DrawerKind::Medium => format!("Medium drawer {}", drawer_id),
        }
    }
}

impl std::fmt::Display for DrawerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawerKind::Small => write!(f, "small"),
            DrawerKind::Large => write!(f, "large"),
            DrawerKind::Tall => write!(f, "tall"),
            DrawerKind::Medium => write!(f, "medium"),
        }
    }
}

/// Split a drawer id like "M12" into its kind and number
pub fn parse_drawer_id(id: &str) -> Option<(DrawerKind, u32)> {
    let mut chars = id.chars();
    let kind = DrawerKind::from_prefix(chars.next()?)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (kind, n))
}

/// Number of compartments in every drawer
pub const COMPARTMENTS_PER_DRAWER: usize = 4;

/// Compartment position name (1-based, front row first)
pub fn compartment_position(index: u32) -> String {
    match index {
        1 => "Front-Left".to_string(),
        2 => "Front-Right".to_string(),
        3 => "Back-Left".to_string(),
        4 => "Back-Right".to_string(),
        n => format!("Position {}", n),
    }
}

/// One printed label covering a top and a bottom drawer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    #[serde(rename = "Unit")]
    pub unit: String,

    #[serde(rename = "Bin_Top")]
    pub bin_top: String,

    /// Empty when the bottom drawer is unused
    #[serde(rename = "Bin_Bottom")]
    pub bin_bottom: String,

    #[serde(rename = "Label_Top")]
    pub label_top: String,

    #[serde(rename = "Label_Bottom")]
    pub label_bottom: String,
}

impl LabelRecord {
    pub fn new(
        unit: Unit,
        bin_top: impl Into<String>,
        bin_bottom: impl Into<String>,
        label_top: impl Into<String>,
        label_bottom: impl Into<String>,
    ) -> Self {
        Self {
            unit: unit.to_string(),
            bin_top: bin_top.into(),
            bin_bottom: bin_bottom.into(),
            label_top: label_top.into(),
            label_bottom: label_bottom.into(),
        }
    }

    /// (drawer, label) halves that carry a drawer id and label text
    pub fn halves(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (self.bin_top.as_str(), self.label_top.as_str()),
            (self.bin_bottom.as_str(), self.label_bottom.as_str()),
        ]
        .into_iter()
        .filter(|(bin, label)| !bin.is_empty() && !label.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drawer_id() {
        assert_eq!(parse_drawer_id("S12"), Some((DrawerKind::Small, 12)));
        assert_eq!(parse_drawer_id("M1"), Some((DrawerKind::Medium, 1)));
        assert_eq!(parse_drawer_id("X1"), None);
        assert_eq!(parse_drawer_id("S"), None);
        assert_eq!(parse_drawer_id("S1a"), None);
        assert_eq!(parse_drawer_id(""), None);
    }

    #[test]
    fn test_drawer_kind_units() {
        assert_eq!(DrawerKind::Small.unit(), Unit::U1);
        assert_eq!(DrawerKind::Medium.unit(), Unit::U2);
        assert_eq!(DrawerKind::Small.capacity(), None);
        assert_eq!(DrawerKind::Large.capacity(), Some(3));
        assert_eq!(DrawerKind::Tall.capacity(), Some(4));
        assert_eq!(DrawerKind::Medium.capacity(), Some(16));
    }

    #[test]
    fn test_unit_roundtrip() {
        assert_eq!("u2".parse::<Unit>().unwrap(), Unit::U2);
        assert_eq!(Unit::U1.to_string(), "U1");
        assert!("U3".parse::<Unit>().is_err());
    }

    #[test]
    fn test_halves_skip_empty_bottom() {
        let record = LabelRecord::new(Unit::U1, "S1", "", "R: 10R", "");
        let halves: Vec<_> = record.halves().collect();
        assert_eq!(halves, vec![("S1", "R: 10R")]);
    }
}
