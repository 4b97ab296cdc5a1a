//! Value parser - free-text component names to canonical values
//!
//! Every parser returns `None` for names it cannot make sense of; callers
//! drop those components from the layout rather than failing the run.
//!
//! Displays are fixed points: feeding a value's `display` back through the
//! same parser yields the same value. Potentiometers are the exception since
//! the taper letter is not part of the display; re-attaching it restores the
//! fixed point.

use regex::Regex;
use std::sync::LazyLock;

use crate::entities::component::{
    CanonicalValue, Dielectric, Family, Polarity, RawComponent, Subtype, Taper,
};

static RESISTOR_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)\s*([KMR]?)").expect("resistor pattern"));

static CAPACITOR_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+\.?\d*)\s*(pF|nF|uF|µF|μF)").expect("capacitor pattern")
});

static POT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)\s*([KM]?)").expect("pot pattern"));

/// Words that mark pot hardware rather than pots
const POT_ACCESSORIES: &[&str] = &["nut", "washer", "dust", "seal", "knob", "cap", "shaft"];

/// Longer suffixes precede the shorter ones they contain
const DIODE_SUFFIXES: &[&str] = &[
    " Zener Diode",
    " Germanium Diode",
    " Rectifier",
    " Germanium",
    " Silicon",
    " Schottky",
    " Zener",
    " Diode",
];

const TRANSISTOR_SUFFIXES: &[&str] = &[" MOSFET", " JFET", " NPN", " PNP"];

const IC_SUFFIXES: &[&str] = &[
    " Dual Op-Amp",
    " Quad Op-Amp",
    " Single Op-Amp",
    " Op-Amp",
    " Charge Pump",
    " Regulator",
    " Audio Amp",
    " Hex Inverter",
    " Delay",
    " EEPROM",
    " DSP",
    " IC",
];

/// Parse a catalog part as a member of `family`
pub fn parse(raw: &RawComponent, family: Family) -> Option<CanonicalValue> {
    let value = match family {
        Family::Resistor => parse_resistor(&raw.name),
        Family::Capacitor => parse_capacitor(&raw.name),
        Family::Potentiometer => parse_potentiometer(&raw.name),
        Family::Diode => parse_diode(&raw.name),
        Family::Transistor => parse_transistor(&raw.name, &raw.category_path),
        Family::Ic => parse_ic(&raw.name),
        Family::Other => None,
    }?;
    Some(value.with_source(raw.name.clone(), raw.stock_quantity))
}

/// `(numeric_ohms, display)` e.g. "4.7K Resistor" -> (4700, "4.7K")
pub fn parse_resistor(name: &str) -> Option<CanonicalValue> {
    let upper = name.to_uppercase().replace("OHM", "");
    let caps = RESISTOR_VALUE.captures(upper.trim())?;
    let mantissa_text = caps.get(1)?.as_str();
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    let mantissa: f64 = mantissa_text.parse().ok()?;

    let multiplier = match suffix {
        "K" => 1e3,
        "M" => 1e6,
        _ => 1.0,
    };
    let numeric = round_value(mantissa * multiplier);
    if numeric <= 0.0 {
        return None;
    }

    let display = if numeric < 1000.0 {
        format!("{}R", format_number(numeric))
    } else if suffix == "K" || suffix == "M" {
        format!("{}{}", mantissa_text, suffix)
    } else {
        mantissa_text.to_string()
    };

    Some(CanonicalValue::new(numeric, display, Family::Resistor, None))
}

/// Value in picofarads plus dielectric, e.g. "100nF Film Cap" -> 100000 pF film
pub fn parse_capacitor(name: &str) -> Option<CanonicalValue> {
    let dielectric = Dielectric::classify(name);
    let caps = CAPACITOR_VALUE.captures(name)?;
    let mantissa_text = caps.get(1)?.as_str();
    // micro sign (U+00B5) and Greek mu (U+03BC) both mean micro
    let unit = caps.get(2)?.as_str().to_lowercase().replace(['µ', 'μ'], "u");
    let mantissa: f64 = mantissa_text.parse().ok()?;

    let scale = match unit.as_str() {
        "pf" => 1.0,
        "nf" => 1e3,
        "uf" => 1e6,
        _ => return None,
    };
    let numeric = round_value(mantissa * scale);
    if numeric <= 0.0 {
        return None;
    }

    let (band_unit, band_scale) = if numeric < 1e3 {
        ("pf", 1.0)
    } else if numeric < 1e6 {
        ("nf", 1e3)
    } else {
        ("uf", 1e6)
    };

    // The written mantissa is kept unless it was written in another unit
    let mantissa_display = if band_unit != "pf" && unit == band_unit {
        mantissa_text.to_string()
    } else {
        format_number(round_value(numeric / band_scale))
    };
    let display = match band_unit {
        "pf" => format!("{}pF", mantissa_display),
        "nf" => format!("{}nF", mantissa_display),
        _ => format!("{}uF", mantissa_display),
    };

    Some(CanonicalValue::new(
        numeric,
        display,
        Family::Capacitor,
        Some(Subtype::Dielectric(dielectric)),
    ))
}

/// Taper of a pot name, None for non-pots and pot hardware
pub fn pot_taper(name: &str) -> Option<Taper> {
    let lower = name.to_lowercase();
    if POT_ACCESSORIES.iter().any(|k| lower.contains(k)) {
        return None;
    }
    if lower.contains("trim") {
        return Some(Taper::Trim);
    }
    match name.chars().next()? {
        'A' => Some(Taper::A),
        'B' => Some(Taper::B),
        'C' => Some(Taper::C),
        'W' => Some(Taper::W),
        _ => None,
    }
}

/// "A100K Pot" -> "100K" (taper A), "10K Trimpot" -> "10K" (trim)
pub fn parse_potentiometer(name: &str) -> Option<CanonicalValue> {
    let taper = pot_taper(name)?;
    let rest = match taper {
        Taper::Trim => name,
        _ => &name[1..],
    };
    parse_potentiometer_value(rest, taper)
}

/// Parse the value part of a pot whose taper is already known
pub fn parse_potentiometer_value(text: &str, taper: Taper) -> Option<CanonicalValue> {
    let upper = text.to_uppercase();
    let caps = POT_VALUE.captures(&upper)?;
    let mantissa_text = caps.get(1)?.as_str();
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    let mantissa: f64 = mantissa_text.parse().ok()?;

    let multiplier = match suffix {
        "K" => 1e3,
        "M" => 1e6,
        _ => 1.0,
    };
    let numeric = round_value(mantissa * multiplier);
    if numeric <= 0.0 {
        return None;
    }

    Some(CanonicalValue::new(
        numeric,
        format!("{}{}", mantissa_text, suffix),
        Family::Potentiometer,
        Some(Subtype::Taper(taper)),
    ))
}

pub fn parse_diode(name: &str) -> Option<CanonicalValue> {
    if name.to_lowercase().contains("led") {
        return None;
    }
    text_value(clean_diode_name(name), Family::Diode, None)
}

/// Polarity comes from the category path, falling back to the name
pub fn parse_transistor(name: &str, category_path: &str) -> Option<CanonicalValue> {
    let polarity =
        Polarity::from_category_path(category_path).or_else(|| Polarity::from_category_path(name))?;
    text_value(
        clean_transistor_name(name),
        Family::Transistor,
        Some(Subtype::Polarity(polarity)),
    )
}

pub fn parse_ic(name: &str) -> Option<CanonicalValue> {
    text_value(clean_ic_name(name), Family::Ic, None)
}

fn text_value(display: String, family: Family, subtype: Option<Subtype>) -> Option<CanonicalValue> {
    if display.is_empty() {
        return None;
    }
    Some(CanonicalValue::new(0.0, display, family, subtype))
}

pub fn clean_diode_name(name: &str) -> String {
    strip_suffixes(name, DIODE_SUFFIXES)
}

pub fn clean_transistor_name(name: &str) -> String {
    strip_suffixes(name, TRANSISTOR_SUFFIXES)
}

pub fn clean_ic_name(name: &str) -> String {
    strip_suffixes(name, IC_SUFFIXES)
}

/// Strip the first matching suffix, repeating until none applies
fn strip_suffixes(name: &str, suffixes: &[&str]) -> String {
    let mut current = name.trim();
    while let Some(stripped) = suffixes.iter().find_map(|s| current.strip_suffix(s)) {
        current = stripped.trim_end();
    }
    current.to_string()
}

/// Integer when whole, shortest decimal form otherwise
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Drop floating point noise from unit conversions (0.47 * 1000)
fn round_value(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
