//! Cyclone identifiers in the ATCF `BBSSYYYY` form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CycloneError;

/// A validated cyclone identifier such as `WP012026`.
///
/// Two basin letters, a two digit storm number and a four digit season year.
/// Input is case-insensitive and surrounding whitespace is ignored; the
/// canonical form is uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycloneId {
    code: String,
}

impl CycloneId {
    /// Parse an identifier, returning an error for anything that is not
    /// exactly `BBSSYYYY`.
    pub fn parse(s: &str) -> Result<Self, CycloneError> {
        let code = s.trim().to_ascii_uppercase();
        let bytes = code.as_bytes();

        let valid = bytes.len() == 8
            && bytes[..2].iter().all(u8::is_ascii_alphabetic)
            && bytes[2..].iter().all(u8::is_ascii_digit);

        if !valid {
            return Err(CycloneError::InvalidCycloneId(s.to_string()));
        }

        Ok(Self { code })
    }

    /// Uppercase basin code, e.g. `WP`.
    pub fn basin(&self) -> &str {
        &self.code[..2]
    }

    /// Two digit storm number, e.g. `01`.
    pub fn storm(&self) -> &str {
        &self.code[2..4]
    }

    /// Four digit season year, e.g. `2026`.
    pub fn year(&self) -> &str {
        &self.code[4..]
    }

    /// Last two digits of the season year, e.g. `26`.
    pub fn short_year(&self) -> &str {
        &self.code[6..]
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for CycloneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for CycloneId {
    type Err = CycloneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CycloneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

impl<'de> Deserialize<'de> for CycloneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CycloneId::parse(&s).map_err(serde::de::Error::custom)
    }
}
