//! Deterministic fixtures.
//!
//! Addresses are built from a single repeated byte so test output stays
//! readable: `address(0xC0)` is `0:c0c0...c0`.

use std::sync::Arc;

use num_bigint::BigInt;
use tvm_introspect::abi::{Content, ContentMeta, StackValue};
use tvm_introspect::types::{cell_from_bytes, Address, Cell};
use tvm_introspect::{AccountState, GetMethodResolver, MockEmulator, ResolverConfig};

pub fn address(byte: u8) -> Address {
    Address::new(0, [byte; 32])
}

/// Initialized account at block 1000.
pub fn account(byte: u8) -> AccountState {
    AccountState::new(address(byte), i64::MIN, 1000)
        .with_code_and_data(vec![0xc0, byte], vec![0xda, byte])
}

pub fn int(v: i64) -> StackValue {
    StackValue::Int(BigInt::from(v))
}

pub fn addr(a: Address) -> StackValue {
    StackValue::Address(Some(a))
}

pub fn cell(bytes: &[u8]) -> Cell {
    cell_from_bytes(bytes).expect("fixture cell fits")
}

pub fn offchain(uri: &str) -> StackValue {
    StackValue::Content(Content::Offchain {
        uri: uri.to_string(),
    })
}

pub fn semichain(uri: &str, name: &str) -> StackValue {
    StackValue::Content(Content::Semichain {
        uri: uri.to_string(),
        meta: ContentMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
    })
}

/// `get_collection_data` stack: `(next_item_index, content, owner)`.
pub fn collection_data(count: i64, content: StackValue, owner: Address) -> Vec<StackValue> {
    vec![int(count), content, addr(owner)]
}

/// `get_nft_data` stack: `(init, index, collection, owner, individual_content)`.
pub fn nft_data(index: i64, collection: Address, owner: Address, content: Cell) -> Vec<StackValue> {
    vec![
        int(-1),
        int(index),
        addr(collection),
        addr(owner),
        StackValue::Cell(content),
    ]
}

/// `get_wallet_data` stack: `(balance, owner, jetton, wallet_code)`.
pub fn wallet_data(balance: i64, owner: Address, minter: Address) -> Vec<StackValue> {
    vec![
        int(balance),
        addr(owner),
        addr(minter),
        StackValue::Cell(cell(b"wallet code")),
    ]
}

pub fn resolver(emulator: MockEmulator) -> (GetMethodResolver, Arc<MockEmulator>) {
    resolver_with(emulator, ResolverConfig::default())
}

pub fn resolver_with(
    emulator: MockEmulator,
    config: ResolverConfig,
) -> (GetMethodResolver, Arc<MockEmulator>) {
    let emulator = Arc::new(emulator);
    (GetMethodResolver::new(emulator.clone(), config), emulator)
}
