//! Typed VM stack values.
//!
//! The concrete shape of a get-method result depends on the descriptor it was
//! requested with, so values are a closed variant rather than a dynamic
//! "any". [`crate::codec`] checks a value against its descriptor.

use std::str::FromStr;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tvm_introspect_types::cell::{decode_base64, encode_base64};
use tvm_introspect_types::{Address, Cell};

use crate::desc::VmValueDesc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StackValueRepr", try_from = "StackValueRepr")]
pub enum StackValue {
    /// Arbitrary-precision integer (257-bit on the VM side).
    Int(BigInt),
    /// Message address; `None` is `addr_none`.
    Address(Option<Address>),
    Cell(Cell),
    /// Metadata decoded from a content cell.
    Content(Content),
}

impl StackValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StackValue::Int(_) => "int",
            StackValue::Address(_) => "address",
            StackValue::Cell(_) => "cell",
            StackValue::Content(_) => "content",
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            StackValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Outer `None`: not an address value. Inner `None`: `addr_none`.
    pub fn as_address(&self) -> Option<Option<&Address>> {
        match self {
            StackValue::Address(a) => Some(a.as_ref()),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&Cell> {
        match self {
            StackValue::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_content(&self) -> Option<&Content> {
        match self {
            StackValue::Content(c) => Some(c),
            _ => None,
        }
    }
}

impl From<BigInt> for StackValue {
    fn from(v: BigInt) -> Self {
        StackValue::Int(v)
    }
}

impl From<Address> for StackValue {
    fn from(a: Address) -> Self {
        StackValue::Address(Some(a))
    }
}

impl From<Cell> for StackValue {
    fn from(c: Cell) -> Self {
        StackValue::Cell(c)
    }
}

impl From<Content> for StackValue {
    fn from(c: Content) -> Self {
        StackValue::Content(c)
    }
}

/// Stored shape of a [`StackValue`]: integers as decimal strings so values
/// wider than 64 bits survive JSON, cells as base64 bag of cells.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum StackValueRepr {
    Int(String),
    Address(Option<Address>),
    Cell(String),
    Content(Content),
}

impl From<StackValue> for StackValueRepr {
    fn from(v: StackValue) -> Self {
        match v {
            StackValue::Int(v) => StackValueRepr::Int(v.to_string()),
            StackValue::Address(a) => StackValueRepr::Address(a),
            StackValue::Cell(c) => StackValueRepr::Cell(encode_base64(&c)),
            StackValue::Content(c) => StackValueRepr::Content(c),
        }
    }
}

impl TryFrom<StackValueRepr> for StackValue {
    type Error = String;

    fn try_from(repr: StackValueRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            StackValueRepr::Int(s) => StackValue::Int(
                BigInt::from_str(&s).map_err(|e| format!("invalid integer '{}': {}", s, e))?,
            ),
            StackValueRepr::Address(a) => StackValue::Address(a),
            StackValueRepr::Cell(s) => {
                StackValue::Cell(decode_base64(&s).map_err(|e| format!("{:#}", e))?)
            }
            StackValueRepr::Content(c) => StackValue::Content(c),
        })
    }
}

/// A stack value paired with the descriptor it is passed under.
#[derive(Debug, Clone, PartialEq)]
pub struct VmValue {
    pub desc: VmValueDesc,
    pub payload: StackValue,
}

/// Token and NFT metadata layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Content {
    /// Metadata lives at an external URI.
    Offchain { uri: String },
    /// Metadata is stored on chain.
    Onchain(ContentMeta),
    /// On-chain fields plus an external URI for the rest.
    Semichain {
        uri: String,
        #[serde(flatten)]
        meta: ContentMeta,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
}

/// Serde helpers storing an optional integer as a decimal string.
pub mod option_bigint_decimal {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<BigInt>, serializer: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigInt>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| BigInt::from_str(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
