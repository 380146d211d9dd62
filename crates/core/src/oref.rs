// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ORef` — the universal addressing primitive for objects.

use crate::id::Oid;
use crate::otype::Otype;
use std::fmt;
use std::str::FromStr;

/// An object reference: `{otype, oid}`, with canonical string form `otype:oid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ORef {
    pub otype: Otype,
    pub oid: Oid,
}

impl ORef {
    pub fn new(otype: Otype, oid: Oid) -> Self {
        Self { otype, oid }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ORefParseError {
    #[error("oref {0:?} is missing the ':' separator")]
    MissingSeparator(String),
    #[error("oref {0:?} has an empty otype or oid part")]
    EmptyPart(String),
    #[error(transparent)]
    UnknownOtype(#[from] crate::otype::UnknownOtype),
    #[error(transparent)]
    InvalidOid(#[from] crate::id::InvalidOid),
}

impl FromStr for ORef {
    type Err = ORefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (otype_s, oid_s) =
            s.split_once(':').ok_or_else(|| ORefParseError::MissingSeparator(s.to_string()))?;
        if otype_s.is_empty() || oid_s.is_empty() {
            return Err(ORefParseError::EmptyPart(s.to_string()));
        }
        let otype: Otype = otype_s.parse()?;
        let oid: Oid = oid_s.parse()?;
        Ok(ORef { otype, oid })
    }
}

impl fmt::Display for ORef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.otype, self.oid)
    }
}

impl serde::Serialize for ORef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ORef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ORef::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        let oref = ORef::new(Otype::Tab, Oid::new());
        let parsed: ORef = oref.to_string().parse().unwrap();
        assert_eq!(oref, parsed);
    }

    #[test]
    fn parse_requires_both_parts_nonempty() {
        assert!(":abc".parse::<ORef>().is_err());
        assert!("tab:".parse::<ORef>().is_err());
        assert!("tab-no-colon".parse::<ORef>().is_err());
    }

    #[test]
    fn parse_splits_on_first_colon_only() {
        // oid portion here is invalid hex, but the split itself must only
        // happen once so an otype-like prefix doesn't get confused with a
        // colon embedded further in a (hypothetical) oid.
        let err = "tab:aa:bb".parse::<ORef>().unwrap_err();
        assert!(matches!(err, ORefParseError::InvalidOid(_)));
    }
}
