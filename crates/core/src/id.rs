// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! 128-bit object identifiers rendered as lowercase hex.
//!
//! `Oid` is a fixed-capacity, `Copy` buffer rather than a `String`, so passing
//! an id around (into a `HashMap` key, across a channel) costs no heap
//! allocation.

use std::fmt;
use std::str::FromStr;

/// Length in bytes of the hex-encoded 128-bit id.
pub const OID_HEX_LEN: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oid {
    buf: [u8; OID_HEX_LEN],
}

#[derive(Debug, thiserror::Error)]
#[error("invalid oid {0:?}: expected {OID_HEX_LEN} lowercase hex characters")]
pub struct InvalidOid(pub String);

impl Oid {
    /// Generate a new random oid (128 bits of randomness via UUIDv4).
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        Self::from_u128(uuid.as_u128())
    }

    pub fn from_u128(v: u128) -> Self {
        let mut buf = [0u8; OID_HEX_LEN];
        let hex = format!("{v:032x}");
        buf.copy_from_slice(hex.as_bytes());
        Self { buf }
    }

    pub fn as_str(&self) -> &str {
        // Invariant: only ever constructed from validated lowercase hex.
        std::str::from_utf8(&self.buf).unwrap_or("")
    }
}

impl Default for Oid {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Oid {
    type Err = InvalidOid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != OID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
            return Err(InvalidOid(s.to_string()));
        }
        let mut buf = [0u8; OID_HEX_LEN];
        buf.copy_from_slice(s.as_bytes());
        Ok(Self { buf })
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Oid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Oid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Oid::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl std::borrow::Borrow<str> for Oid {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}
