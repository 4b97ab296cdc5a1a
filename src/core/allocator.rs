//! Drawer allocator - sequential drawer ids per drawer kind
//!
//! Each drawer kind keeps its own counter starting at 1. A label covers two
//! drawers: the top id is always issued, the bottom id only while the kind
//! still has a physical drawer left for it. Small drawers are unbounded.

use serde::Serialize;

use crate::entities::label::{DrawerKind, Unit};

/// Counter state of one drawer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DrawerCounter {
    kind: DrawerKind,
    /// Next number to issue
    next: u32,
}

impl DrawerCounter {
    fn new(kind: DrawerKind) -> Self {
        Self { kind, next: 1 }
    }

    fn fits(&self, number: u32) -> bool {
        self.kind.capacity().map_or(true, |cap| number <= cap)
    }

    fn issued(&self) -> u32 {
        self.next - 1
    }
}

/// Drawer ids for one printed label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerPair {
    pub unit: Unit,
    pub top: String,
    /// None when the kind ran out of drawers for the bottom half
    pub bottom: Option<String>,
}

/// A bounded drawer kind was allocated past its physical drawers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityWarning {
    pub kind: DrawerKind,
    /// Highest number issued
    pub used: u32,
    pub capacity: u32,
}

impl std::fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} drawers exhausted: issued up to {}{} but only {} exist",
            self.kind,
            self.kind.prefix(),
            self.used,
            self.capacity
        )
    }
}

/// Drawers issued for one kind, for end-of-run summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerUsage {
    pub kind: DrawerKind,
    pub used: u32,
}

impl std::fmt::Display for DrawerUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.used {
            0 => write!(f, "none"),
            1 => write!(f, "{}1", self.kind.prefix()),
            n => write!(f, "{p}1-{p}{n}", p = self.kind.prefix()),
        }
    }
}

/// Owns the four drawer counters for one run
#[derive(Debug, Clone)]
pub struct DrawerAllocator {
    counters: [DrawerCounter; 4],
}

impl Default for DrawerAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawerAllocator {
    pub fn new() -> Self {
        Self {
            counters: [
                DrawerCounter::new(DrawerKind::Small),
                DrawerCounter::new(DrawerKind::Large),
                DrawerCounter::new(DrawerKind::Tall),
                DrawerCounter::new(DrawerKind::Medium),
            ],
        }
    }

    fn counter(&self, kind: DrawerKind) -> &DrawerCounter {
        &self.counters[Self::slot(kind)]
    }

    fn slot(kind: DrawerKind) -> usize {
        match kind {
            DrawerKind::Small => 0,
            DrawerKind::Large => 1,
            DrawerKind::Tall => 2,
            DrawerKind::Medium => 3,
        }
    }

    /// Issue the next id of `kind`; the flag is false past the kind's capacity
    pub fn advance(&mut self, kind: DrawerKind) -> (String, bool) {
        let counter = &mut self.counters[Self::slot(kind)];
        let number = counter.next;
        counter.next += 1;
        (format!("{}{}", kind.prefix(), number), counter.fits(number))
    }

    /// Top id unconditionally, bottom id only if it still fits
    pub fn next_pair(&mut self, kind: DrawerKind) -> DrawerPair {
        let (top, _) = self.advance(kind);
        let bottom = if self.counter(kind).fits(self.counter(kind).next) {
            Some(self.advance(kind).0)
        } else {
            None
        };
        DrawerPair {
            unit: kind.unit(),
            top,
            bottom,
        }
    }

    /// Bounded kinds whose issued ids went past their capacity
    pub fn warnings(&self) -> Vec<CapacityWarning> {
        self.counters
            .iter()
            .filter_map(|c| {
                let capacity = c.kind.capacity()?;
                (c.issued() > capacity).then(|| CapacityWarning {
                    kind: c.kind,
                    used: c.issued(),
                    capacity,
                })
            })
            .collect()
    }

    pub fn usage(&self) -> Vec<DrawerUsage> {
        self.counters
            .iter()
            .map(|c| DrawerUsage {
                kind: c.kind,
                used: c.issued(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(top: &str, bottom: Option<&str>, unit: Unit) -> DrawerPair {
        DrawerPair {
            unit,
            top: top.to_string(),
            bottom: bottom.map(str::to_string),
        }
    }

    #[test]
    fn test_small_is_unbounded() {
        let mut alloc = DrawerAllocator::new();
        for _ in 0..50 {
            alloc.next_pair(DrawerKind::Small);
        }
        assert_eq!(
            alloc.next_pair(DrawerKind::Small),
            pair("S101", Some("S102"), Unit::U1)
        );
        assert!(alloc.warnings().is_empty());
    }

    #[test]
    fn test_medium_pairs_until_capacity() {
        let mut alloc = DrawerAllocator::new();
        let pairs: Vec<_> = (0..8).map(|_| alloc.next_pair(DrawerKind::Medium)).collect();
        assert_eq!(pairs[0], pair("M1", Some("M2"), Unit::U2));
        assert_eq!(pairs[4], pair("M9", Some("M10"), Unit::U2));
        assert_eq!(pairs[7], pair("M15", Some("M16"), Unit::U2));
        assert!(alloc.warnings().is_empty());

        // allocation continues past the last drawer, bottom left unused
        assert_eq!(
            alloc.next_pair(DrawerKind::Medium),
            pair("M17", None, Unit::U2)
        );
        assert_eq!(
            alloc.warnings(),
            vec![CapacityWarning {
                kind: DrawerKind::Medium,
                used: 17,
                capacity: 16
            }]
        );
    }

    #[test]
    fn test_large_leaves_bottom_unused() {
        let mut alloc = DrawerAllocator::new();
        assert_eq!(alloc.next_pair(DrawerKind::Large), pair("L1", Some("L2"), Unit::U2));
        assert_eq!(alloc.next_pair(DrawerKind::Large), pair("L3", None, Unit::U2));
        assert!(alloc.warnings().is_empty());
        assert_eq!(alloc.next_pair(DrawerKind::Large), pair("L4", None, Unit::U2));
        assert_eq!(alloc.warnings().len(), 1);
    }

    #[test]
    fn test_tall_capacity() {
        let mut alloc = DrawerAllocator::new();
        alloc.next_pair(DrawerKind::Tall);
        assert_eq!(alloc.next_pair(DrawerKind::Tall), pair("T3", Some("T4"), Unit::U2));
        assert!(alloc.warnings().is_empty());
    }

    #[test]
    fn test_advance_reports_capacity() {
        let mut alloc = DrawerAllocator::new();
        for n in 1..=3 {
            assert_eq!(alloc.advance(DrawerKind::Large), (format!("L{}", n), true));
        }
        assert_eq!(alloc.advance(DrawerKind::Large), ("L4".to_string(), false));
    }

    #[test]
    fn test_counters_are_independent() {
        let mut alloc = DrawerAllocator::new();
        alloc.next_pair(DrawerKind::Small);
        alloc.next_pair(DrawerKind::Medium);
        assert_eq!(alloc.next_pair(DrawerKind::Small).top, "S3");
        assert_eq!(alloc.next_pair(DrawerKind::Large).top, "L1");

        let usage: Vec<String> = alloc.usage().iter().map(|u| u.to_string()).collect();
        assert_eq!(usage, vec!["S1-S4", "L1-L2", "none", "M1-M2"]);
    }
}
