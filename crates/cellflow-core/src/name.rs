//! Cell names
//!
//! A cell name is one or more ASCII letters followed by one or more ASCII
//! digits (`A1`, `xy42`, `Total2024`). Names are accepted in any case and
//! always stored uppercased, so `a1` and `A1` denote the same cell.

use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Normalize a name for storage and comparison.
///
/// Every crate that keys anything by name goes through this function, so
/// case folding happens identically everywhere.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Check whether `name` is letters followed by digits, ignoring case
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let letters = bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if letters == 0 {
        return false;
    }
    let digits = bytes[letters..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    digits > 0 && letters + digits == bytes.len()
}

/// A validated, uppercased cell name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellName(String);

impl CellName {
    /// Parse and normalize a cell name
    ///
    /// # Examples
    /// ```
    /// use cellflow_core::CellName;
    ///
    /// assert_eq!(CellName::parse("b7").unwrap().as_str(), "B7");
    /// assert!(CellName::parse("B").is_err());
    /// assert!(CellName::parse("7").is_err());
    /// assert!(CellName::parse("B7C").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if is_valid_name(name) {
            Ok(Self(normalize_name(name)))
        } else {
            Err(Error::InvalidName(name.to_string()))
        }
    }

    /// The normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the normalized string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CellName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CellName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl AsRef<str> for CellName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CellName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CellName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CellName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CellName::parse(&raw).map_err(serde::de::Error::custom)
    }
}
