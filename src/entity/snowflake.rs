//! Snowflake Module
//!
//! Process-wide unique identifiers shared by every cached entity.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// == Snowflake ==
/// A 64-bit entity identifier. Zero is the empty identifier.
///
/// Serialized as a decimal string, deserialized from either a string or an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// Creates a snowflake from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns true for the zero identifier, which never names an entity.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw integer value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Snowflake {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    /// A blank string parses as the empty snowflake.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.parse::<u64>().map(Self)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a decimal string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Snowflake(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Snowflake)
            .map_err(|_| E::custom(format!("negative snowflake: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snowflake() {
        assert!(Snowflake::default().is_empty());
        assert!(!Snowflake::new(42).is_empty());
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Snowflake::new(175928847299117063)).unwrap();
        assert_eq!(json, r#""175928847299117063""#);
    }

    #[test]
    fn test_deserialize_from_string_and_number() {
        let from_str: Snowflake = serde_json::from_str(r#""80351110224678912""#).unwrap();
        let from_num: Snowflake = serde_json::from_str("80351110224678912").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(from_str.get(), 80351110224678912);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Snowflake>(r#""not-a-number""#).is_err());
        assert!(serde_json::from_str::<Snowflake>("-5").is_err());
    }

    #[test]
    fn test_parse_from_path_segment() {
        assert_eq!("123".parse::<Snowflake>().unwrap(), Snowflake::new(123));
        assert!("abc".parse::<Snowflake>().is_err());
    }

    #[test]
    fn test_blank_parses_as_empty_everywhere() {
        assert_eq!("".parse::<Snowflake>().unwrap(), Snowflake::default());
        assert_eq!("  ".parse::<Snowflake>().unwrap(), Snowflake::default());
        let from_json: Snowflake = serde_json::from_str(r#""""#).unwrap();
        assert!(from_json.is_empty());
    }
}
