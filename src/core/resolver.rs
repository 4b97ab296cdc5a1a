//! Identity resolver - label values back to catalog records
//!
//! A component name from a label ("A100K", "4.7uF") rarely equals the part
//! name in the inventory ("A100K Pot", "4.7uF Electrolytic Capacitor"). The
//! resolver runs a fixed cascade of strategies and stops at the first one
//! that finds a candidate.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Trailing family words dropped before comparing names
const NORMALIZE_SUFFIXES: &[&str] = &[
    " capacitor",
    " resistor",
    " pot",
    " potentiometer",
    " ceramic",
    " film",
    " electrolytic",
    " axial",
    " npn",
    " pnp",
    " jfet",
    " mosfet",
    " diode",
    " schottky",
    " germanium",
    " silicon",
    " zener",
    " rectifier",
    " switch",
    " jack",
    " footswitch",
];

/// Ratio a fuzzy match must exceed
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

static POT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)\s*([km]?)").expect("pot token pattern"));

/// Which tier of the cascade produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Normalized,
    PotValue,
    Similarity,
    Containment,
}

impl MatchKind {
    pub fn all() -> &'static [MatchKind] {
        &[
            MatchKind::Exact,
            MatchKind::Normalized,
            MatchKind::PotValue,
            MatchKind::Similarity,
            MatchKind::Containment,
        ]
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Normalized => write!(f, "normalized"),
            MatchKind::PotValue => write!(f, "pot value"),
            MatchKind::Similarity => write!(f, "similarity"),
            MatchKind::Containment => write!(f, "containment"),
        }
    }
}

/// Anything the resolver can match by name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// One tier of the cascade
pub trait MatchStrategy {
    fn kind(&self) -> MatchKind;

    /// Index of the matching candidate name, if this strategy has an opinion
    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize>;
}

/// Lowercase, then strip each known family suffix once, in order
pub fn normalize_name(name: &str) -> String {
    let mut name = name.to_lowercase().trim().to_string();
    for suffix in NORMALIZE_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim().to_string();
        }
    }
    name
}

/// Resistance token of a pot name: "A100K Pot" and "100K Trimmer" -> "100k"
pub fn extract_pot_value(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    let tapered = matches!(chars.next(), Some('a' | 'b' | 'c'))
        && chars.next().is_some_and(|c| c.is_ascii_digit());

    let source = if tapered {
        &lower[1..]
    } else if lower.contains("trimpot") || lower.contains("trimmer") {
        lower.as_str()
    } else {
        return None;
    };

    let caps = POT_TOKEN.captures(source)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

/// `2M / T` over both strings, 1.0 for identical strings
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    f64::from(similar::TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

pub struct Exact;

impl MatchStrategy for Exact {
    fn kind(&self) -> MatchKind {
        MatchKind::Exact
    }

    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize> {
        let wanted = component.to_lowercase();
        candidates.iter().position(|c| c.to_lowercase() == wanted)
    }
}

pub struct Normalized;

impl MatchStrategy for Normalized {
    fn kind(&self) -> MatchKind {
        MatchKind::Normalized
    }

    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize> {
        let wanted = normalize_name(component);
        candidates.iter().position(|c| normalize_name(c) == wanted)
    }
}

pub struct PotValue;

impl MatchStrategy for PotValue {
    fn kind(&self) -> MatchKind {
        MatchKind::PotValue
    }

    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize> {
        let wanted = extract_pot_value(component)?;
        candidates
            .iter()
            .position(|c| extract_pot_value(c).as_deref() == Some(wanted.as_str()))
    }
}

pub struct Similarity {
    pub threshold: f64,
}

impl Default for Similarity {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
        }
    }
}

impl MatchStrategy for Similarity {
    fn kind(&self) -> MatchKind {
        MatchKind::Similarity
    }

    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = similarity(component, candidate);
            let floor = best.map_or(self.threshold, |(_, s)| s);
            // strictly greater keeps the first of equal scores
            if score > floor {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }
}

pub struct Containment;

impl MatchStrategy for Containment {
    fn kind(&self) -> MatchKind {
        MatchKind::Containment
    }

    fn find(&self, component: &str, candidates: &[&str]) -> Option<usize> {
        let wanted = normalize_name(component);
        if wanted.is_empty() {
            return None;
        }
        candidates.iter().position(|c| {
            let name = normalize_name(c);
            !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
        })
    }
}

/// A matched record and the tier that found it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a, T> {
    pub record: &'a T,
    pub index: usize,
    pub strategy: MatchKind,
}

/// Ordered strategy cascade
pub struct IdentityResolver {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(Exact),
                Box::new(Normalized),
                Box::new(PotValue),
                Box::new(Similarity::default()),
                Box::new(Containment),
            ],
        }
    }

    /// Build from a custom strategy list, run in the given order
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Best candidate for `component`, None when every tier declines
    pub fn resolve<'a, T: Named>(
        &self,
        component: &str,
        candidates: &'a [T],
    ) -> Option<Resolution<'a, T>> {
        let names: Vec<&str> = candidates.iter().map(Named::name).collect();
        self.strategies.iter().find_map(|strategy| {
            let index = strategy.find(component, &names)?;
            Some(Resolution {
                record: &candidates[index],
                index,
                strategy: strategy.kind(),
            })
        })
    }
}
