//! Static ABI descriptors.
//!
//! Descriptors are plain comparable values: a recorded execution is only
//! reusable if the descriptor it ran with is equal, field by field, to the
//! one requested now.

use std::fmt;

use serde::{Deserialize, Serialize};

/// VM stack type of a get-method argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackType {
    Int,
    Slice,
    Cell,
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackType::Int => "int",
            StackType::Slice => "slice",
            StackType::Cell => "cell",
        })
    }
}

/// Format hint that refines how a stack value maps to a native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Integer passed as its big-endian magnitude bytes.
    Bytes,
    /// Slice holding a message address.
    Addr,
    /// Cell holding token/NFT metadata.
    Content,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Bytes => "bytes",
            Format::Addr => "addr",
            Format::Content => "content",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VmValueDesc {
    pub name: String,
    pub stack_type: StackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl VmValueDesc {
    pub fn new(name: impl Into<String>, stack_type: StackType, format: Option<Format>) -> Self {
        Self {
            name: name.into(),
            stack_type,
            format,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, StackType::Int, None)
    }

    pub fn int_bytes(name: impl Into<String>) -> Self {
        Self::new(name, StackType::Int, Some(Format::Bytes))
    }

    pub fn addr(name: impl Into<String>) -> Self {
        Self::new(name, StackType::Slice, Some(Format::Addr))
    }

    pub fn cell(name: impl Into<String>) -> Self {
        Self::new(name, StackType::Cell, None)
    }

    pub fn content(name: impl Into<String>) -> Self {
        Self::new(name, StackType::Cell, Some(Format::Content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GetMethodDesc {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<VmValueDesc>,
    #[serde(default)]
    pub return_values: Vec<VmValueDesc>,
}

/// Name of a contract interface, e.g. `nft_item` or `jetton_wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractName(pub String);

impl ContractName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A contract interface matched to an account by the external matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInterface {
    pub name: ContractName,
    #[serde(default)]
    pub get_methods: Vec<GetMethodDesc>,
}

impl ContractInterface {
    pub fn get_method(&self, name: &str) -> Option<&GetMethodDesc> {
        self.get_methods.iter().find(|d| d.name == name)
    }
}
