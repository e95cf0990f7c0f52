//! Breakpoint-scoped property values.
//!
//! Every responsive property in the builder (column span, offset, padding,
//! gap, min-height, ...) is stored as a map from breakpoint to value. The
//! resolver is two-level: the exact breakpoint if set, otherwise `base`,
//! otherwise the caller's fallback. A value set at `md` is NOT inherited when
//! resolving `lg` — downstream property editors write per-exact-breakpoint
//! and read back through this same resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named responsive size bucket, ordered narrow to wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Base,
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    /// All breakpoints, narrow to wide.
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Base,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];
}

/// A property value scoped per breakpoint.
///
/// `base` is the canonical fallback bucket; well-formed documents always set
/// it, but resolution tolerates its absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsiveValue<T> {
    values: BTreeMap<Breakpoint, T>,
}

impl<T> ResponsiveValue<T> {
    /// Empty value set (resolution always yields the fallback).
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Value set at `base` only.
    pub fn of(base: T) -> Self {
        let mut values = BTreeMap::new();
        values.insert(Breakpoint::Base, base);
        Self { values }
    }

    /// Builder-style insertion at a breakpoint.
    pub fn with(mut self, breakpoint: Breakpoint, value: T) -> Self {
        self.values.insert(breakpoint, value);
        self
    }

    pub fn set(&mut self, breakpoint: Breakpoint, value: T) {
        self.values.insert(breakpoint, value);
    }

    pub fn unset(&mut self, breakpoint: Breakpoint) -> Option<T> {
        self.values.remove(&breakpoint)
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&T> {
        self.values.get(&breakpoint)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Two-level resolution: exact breakpoint, else `base`, else `fallback`.
    ///
    /// No cascading through intermediate breakpoints.
    pub fn resolve<'a>(&'a self, breakpoint: Breakpoint, fallback: &'a T) -> &'a T {
        self.values
            .get(&breakpoint)
            .or_else(|| self.values.get(&Breakpoint::Base))
            .unwrap_or(fallback)
    }
}

impl<T: Clone> ResponsiveValue<T> {
    /// Owned variant of [`ResponsiveValue::resolve`].
    pub fn resolve_or(&self, breakpoint: Breakpoint, fallback: T) -> T {
        self.resolve(breakpoint, &fallback).clone()
    }
}

impl<T> Default for ResponsiveValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Named responsive properties for a Section or Column (padding, gap,
/// min-height, ...). Values are kept as JSON so the model does not enumerate
/// every property the style editors invent.
pub type ResponsiveSettings = BTreeMap<String, ResponsiveValue<serde_json::Value>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_breakpoint() {
        let v = ResponsiveValue::of(1).with(Breakpoint::Md, 2);
        assert_eq!(*v.resolve(Breakpoint::Md, &0), 2);
    }

    #[test]
    fn test_resolve_falls_back_to_base() {
        let v = ResponsiveValue::of(1).with(Breakpoint::Md, 2);
        assert_eq!(*v.resolve(Breakpoint::Sm, &0), 1);
        assert_eq!(*v.resolve(Breakpoint::Xxl, &0), 1);
    }

    #[test]
    fn test_resolve_does_not_cascade() {
        // Value set only at md must NOT be returned when resolving lg.
        let mut v = ResponsiveValue::new();
        v.set(Breakpoint::Md, 7);
        assert_eq!(*v.resolve(Breakpoint::Lg, &0), 0);
        assert_eq!(*v.resolve(Breakpoint::Md, &0), 7);
    }

    #[test]
    fn test_resolve_empty_yields_fallback() {
        let v: ResponsiveValue<u8> = ResponsiveValue::new();
        assert_eq!(*v.resolve(Breakpoint::Base, &9), 9);
        assert_eq!(*v.resolve(Breakpoint::Xl, &9), 9);
    }

    #[test]
    fn test_breakpoint_serialization() {
        assert_eq!(serde_json::to_string(&Breakpoint::Xxl).unwrap(), "\"2xl\"");
        assert_eq!(
            serde_json::from_str::<Breakpoint>("\"base\"").unwrap(),
            Breakpoint::Base
        );
    }

    #[test]
    fn test_responsive_value_serializes_as_map() {
        let v = ResponsiveValue::of(12).with(Breakpoint::Lg, 6);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({ "base": 12, "lg": 6 }));
    }
}
