//! Serde helpers for 64-bit integers.
//!
//! The native client writes `int64` values as decimal strings so they survive
//! JSON consumers limited to doubles. Older builds and hand-written messages
//! use plain numbers, so both are accepted; values are always written as
//! strings.
//!
//! ```rust,ignore
//! #[derive(Deserialize, Serialize)]
//! struct Chat {
//!     #[serde(with = "crate::types::int64")]
//!     id: i64,
//! }
//! ```

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(Int64Visitor)
}

struct Int64Visitor;

impl<'de> Visitor<'de> for Int64Visitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-bit integer as a number or decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("{} does not fit in i64", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.parse()
            .map_err(|_| E::custom(format!("invalid int64 string: {:?}", v)))
    }
}
