//! Account address parsing and formatting.
//!
//! This module is the canonical source for address handling in the workspace.
//! An account address is a workchain id plus a 32-byte account hash, but it
//! travels in several textual forms:
//! - Raw form: "0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8"
//! - User-friendly form: 48 base64 characters (standard or URL-safe alphabet)
//!   wrapping flags, the workchain, the hash and a checksum.
//!
//! Parsing and rendering go through `tycho-types`' [`StdAddr`]. Two addresses
//! are equal when workchain and hash match. The bounceable and test-only
//! flags of the user-friendly form are presentation details and are not part
//! of the identity.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tycho_types::models::{StdAddr, StdAddrFormat};
use tycho_types::prelude::HashBytes;

/// Internal account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl Address {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    pub fn to_std(&self) -> StdAddr {
        StdAddr::new(self.workchain, HashBytes(self.hash))
    }

    /// Raw form, `"<workchain>:<hex hash>"`.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Bounceable URL-safe user-friendly form.
    pub fn to_user_friendly(&self) -> String {
        self.to_std().display_base64_url(true).to_string()
    }
}

impl From<&StdAddr> for Address {
    fn from(addr: &StdAddr) -> Self {
        Self::new(addr.workchain, addr.address.0)
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    /// Accepts the raw form and both user-friendly alphabets.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (addr, _flags) = StdAddr::from_str_ext(s, StdAddrFormat::any())
            .map_err(|e| anyhow!("invalid address '{}': {}", s, e))?;
        Ok(Self::from(&addr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_friendly())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_raw())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_user_friendly())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
