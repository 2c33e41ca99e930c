//! Account snapshot handled by one resolution pass.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tvm_introspect_types::Address;

use crate::cache::ExecutedGetMethods;

/// Frozen state of one account at a given block, plus the fields derived
/// from its get-methods.
///
/// Code, data and libraries are serialized bag-of-cells bytes exactly as the
/// emulator consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Address,
    pub workchain: i32,
    pub shard: i64,
    pub block_seq_no: u32,

    #[serde(default)]
    pub code: Vec<u8>,
    #[serde(default)]
    pub data: Vec<u8>,
    #[serde(default)]
    pub libraries: Vec<u8>,

    #[serde(default)]
    pub owner_address: Option<Address>,
    #[serde(default)]
    pub minter_address: Option<Address>,

    #[serde(default)]
    pub content_uri: Option<String>,
    #[serde(default)]
    pub content_name: Option<String>,
    #[serde(default)]
    pub content_description: Option<String>,
    #[serde(default)]
    pub content_image: Option<String>,
    #[serde(default)]
    pub content_image_data: Option<Vec<u8>>,

    #[serde(
        default,
        with = "tvm_introspect_abi::value::option_bigint_decimal"
    )]
    pub jetton_balance: Option<BigInt>,

    /// Set while the account's claim to belong to its minter is unconfirmed,
    /// and left set when the claim did not hold.
    #[serde(default)]
    pub fake: bool,

    #[serde(default)]
    pub executed_get_methods: ExecutedGetMethods,
}

impl AccountState {
    /// Empty snapshot for `address` at block `block_seq_no`.
    pub fn new(address: Address, shard: i64, block_seq_no: u32) -> Self {
        Self {
            address,
            workchain: i32::from(address.workchain),
            shard,
            block_seq_no,
            code: Vec::new(),
            data: Vec::new(),
            libraries: Vec::new(),
            owner_address: None,
            minter_address: None,
            content_uri: None,
            content_name: None,
            content_description: None,
            content_image: None,
            content_image_data: None,
            jetton_balance: None,
            fake: false,
            executed_get_methods: ExecutedGetMethods::default(),
        }
    }

    pub fn with_code_and_data(mut self, code: Vec<u8>, data: Vec<u8>) -> Self {
        self.code = code;
        self.data = data;
        self
    }

    /// Get-methods can only run on an account with both code and data.
    pub fn has_code_and_data(&self) -> bool {
        !self.code.is_empty() && !self.data.is_empty()
    }
}
