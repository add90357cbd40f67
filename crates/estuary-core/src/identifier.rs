//! Identifier management using string interning for efficient storage and comparison.
//!
//! This module provides the [`Id`] type used for node, subdivision, and
//! aggregate-link identity throughout Estuary.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient identifier type using string interning.
///
/// Datasets refer to nodes and subdivisions by string ids; interning makes
/// those ids `Copy` and cheap to compare, which matters because aggregation
/// and render-sync key every element by id on every pass.
///
/// # Examples
///
/// ```
/// use estuary_core::identifier::Id;
///
/// let coal = Id::new("coal");
/// let electricity = Id::new("electricity");
/// assert_ne!(coal, electricity);
/// assert_eq!(coal, "coal");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from `&str`.
    ///
    /// # Examples
    ///
    /// ```
    /// use estuary_core::identifier::Id;
    ///
    /// let node_id = Id::new("primary_energy");
    /// let sub_id = Id::new("solar");
    /// ```
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// The empty identifier, used by the whole-node subdivision span.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Returns true if this is the empty identifier.
    pub fn is_empty(&self) -> bool {
        *self == ""
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice.
    ///
    /// This is a convenience implementation that calls `Id::new`.
    ///
    /// # Examples
    ///
    /// ```
    /// use estuary_core::identifier::Id;
    ///
    /// let id: Id = "farm_waste".into();
    /// assert_eq!(id, "farm_waste");
    /// ```
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

// Datasets carry string ids on the wire; serialize through the interner.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("electricity");
        let id2 = Id::new("electricity");
        let id3 = Id::new("heat");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "electricity");
    }

    #[test]
    fn test_empty() {
        let empty = Id::empty();
        assert!(empty.is_empty());
        assert_eq!(empty, "");
        assert!(!Id::new("solar").is_empty());
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("district_heat");
        assert_eq!(format!("{}", id), "district_heat");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "losses".into();
        let id2 = Id::new("losses");

        assert_eq!(id1, id2);
        assert_eq!(id1, "losses");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_copy_trait() {
        let id1 = Id::new("copy_test");
        let id2 = id1;
        let id3 = id1;

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1, "copy_test");
    }

    #[test]
    fn test_serde_round_trip() {
        let id = Id::new("biomass");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"biomass\"");
        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
