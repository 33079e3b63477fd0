#![forbid(unsafe_code)]

//! Responsive breakpoints and per-breakpoint value tables.
//!
//! A [`Breakpoint`] is a named container-width tier. The active breakpoint
//! is the largest tier whose minimum width does not exceed the measured
//! container width, so resolution is monotonic: a wider container never
//! resolves to a smaller tier.
//!
//! [`Responsive<T>`] stores one value per breakpoint with inheritance from
//! the nearest smaller tier: a table holding only an `md` entry answers `md`
//! for `lg` and `xl` lookups as well. This keeps sparse per-breakpoint
//! configuration (constraints, placements, grid tables) well-defined at
//! every tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named container-width tier, ordered smallest to largest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    /// All breakpoints, smallest first.
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// The next smaller tier, if any.
    #[must_use]
    pub fn down(self) -> Option<Breakpoint> {
        let idx = Self::ALL.iter().position(|bp| *bp == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Short lowercase name (`"xs"`, `"sm"`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "xxl",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum container widths (px) for each breakpoint tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub xs: f32,
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub xl: f32,
    pub xxl: f32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            xs: 0.0,
            sm: 576.0,
            md: 768.0,
            lg: 992.0,
            xl: 1200.0,
            xxl: 1400.0,
        }
    }
}

impl Breakpoints {
    /// Minimum width threshold for a tier.
    #[must_use]
    pub const fn threshold(&self, bp: Breakpoint) -> f32 {
        match bp {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
            Breakpoint::Xxl => self.xxl,
        }
    }

    /// Resolve the active breakpoint for a container width.
    ///
    /// Descending scan: the largest tier whose threshold does not exceed
    /// `container_width` wins. Widths below every threshold resolve to
    /// [`Breakpoint::Xs`].
    #[must_use]
    pub fn resolve(&self, container_width: f32) -> Breakpoint {
        for bp in Breakpoint::ALL.iter().rev() {
            if container_width >= self.threshold(*bp) {
                return *bp;
            }
        }
        Breakpoint::Xs
    }
}

/// A per-breakpoint value table with nearest-smaller inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responsive<T> {
    entries: BTreeMap<Breakpoint, T>,
}

impl<T> Default for Responsive<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Responsive<T> {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with one value at every tier's floor ([`Breakpoint::Xs`]), so
    /// every lookup inherits it.
    #[must_use]
    pub fn uniform(value: T) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(Breakpoint::Xs, value);
        Self { entries }
    }

    /// Set the value for one tier.
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        self.entries.insert(bp, value);
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Remove the value for one tier, if present.
    pub fn remove(&mut self, bp: Breakpoint) -> Option<T> {
        self.entries.remove(&bp)
    }

    /// Exact entry for a tier (no inheritance).
    #[must_use]
    pub fn get_exact(&self, bp: Breakpoint) -> Option<&T> {
        self.entries.get(&bp)
    }

    /// Resolve the value for a tier.
    ///
    /// Falls back to the nearest smaller tier with an entry; when none is
    /// smaller, the smallest present entry is used. Returns `None` only for
    /// an empty table.
    #[must_use]
    pub fn get(&self, bp: Breakpoint) -> Option<&T> {
        self.entries
            .range(..=bp)
            .next_back()
            .map(|(_, v)| v)
            .or_else(|| self.entries.values().next())
    }

    /// Mutable resolve at exactly `bp`, inserting an inherited clone first
    /// when the tier has no entry of its own.
    pub fn get_or_inherit_mut(&mut self, bp: Breakpoint) -> Option<&mut T>
    where
        T: Clone,
    {
        if !self.entries.contains_key(&bp) {
            let inherited = self.get(bp)?.clone();
            self.entries.insert(bp, inherited);
        }
        self.entries.get_mut(&bp)
    }

    /// True when no tier has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the tiers that carry their own entry.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        self.entries.iter().map(|(bp, v)| (*bp, v))
    }
}

#[cfg(test)]
mod tests {
    use super::{Breakpoint, Breakpoints, Responsive};

    // --- Resolution ---

    #[test]
    fn resolve_matches_threshold_table() {
        let bps = Breakpoints::default();
        assert_eq!(bps.resolve(0.0), Breakpoint::Xs);
        assert_eq!(bps.resolve(575.0), Breakpoint::Xs);
        assert_eq!(bps.resolve(576.0), Breakpoint::Sm);
        assert_eq!(bps.resolve(800.0), Breakpoint::Md);
        assert_eq!(bps.resolve(1199.9), Breakpoint::Lg);
        assert_eq!(bps.resolve(1200.0), Breakpoint::Xl);
        assert_eq!(bps.resolve(2560.0), Breakpoint::Xxl);
    }

    #[test]
    fn resolve_is_monotonic() {
        let bps = Breakpoints::default();
        assert!(bps.resolve(600.0) <= bps.resolve(1300.0));

        let mut last = Breakpoint::Xs;
        for width in (0..2000).step_by(25) {
            let bp = bps.resolve(width as f32);
            assert!(bp >= last, "width {width} resolved below previous tier");
            last = bp;
        }
    }

    #[test]
    fn breakpoint_down_walks_the_ladder() {
        assert_eq!(Breakpoint::Xxl.down(), Some(Breakpoint::Xl));
        assert_eq!(Breakpoint::Sm.down(), Some(Breakpoint::Xs));
        assert_eq!(Breakpoint::Xs.down(), None);
    }

    // --- Responsive inheritance ---

    #[test]
    fn responsive_inherits_from_nearest_smaller() {
        let table = Responsive::new()
            .with(Breakpoint::Sm, 2)
            .with(Breakpoint::Lg, 4);
        assert_eq!(table.get(Breakpoint::Sm), Some(&2));
        assert_eq!(table.get(Breakpoint::Md), Some(&2));
        assert_eq!(table.get(Breakpoint::Lg), Some(&4));
        assert_eq!(table.get(Breakpoint::Xxl), Some(&4));
    }

    #[test]
    fn responsive_falls_back_to_smallest_present() {
        let table = Responsive::new().with(Breakpoint::Lg, 7);
        assert_eq!(table.get(Breakpoint::Xs), Some(&7));
    }

    #[test]
    fn responsive_empty_resolves_to_none() {
        let table: Responsive<u16> = Responsive::new();
        assert_eq!(table.get(Breakpoint::Md), None);
    }

    #[test]
    fn get_or_inherit_mut_materializes_the_tier() {
        let mut table = Responsive::uniform(1);
        *table.get_or_inherit_mut(Breakpoint::Lg).unwrap() = 9;
        // The smaller tier keeps its own value.
        assert_eq!(table.get(Breakpoint::Md), Some(&1));
        assert_eq!(table.get(Breakpoint::Lg), Some(&9));
        assert_eq!(table.get(Breakpoint::Xxl), Some(&9));
    }

    #[test]
    fn breakpoint_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Breakpoint::Xxl).unwrap(),
            "\"xxl\"".to_string()
        );
    }
}
