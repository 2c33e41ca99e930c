//! Well-known contract interfaces, get-method names and descriptors.
//!
//! The descriptors used for dependent calls are built once and shared. Their
//! exact shape matters: history recorded with a different descriptor is
//! treated as stale.

use std::sync::LazyLock;

use tvm_introspect_abi::{ContractInterface, ContractName, GetMethodDesc, VmValueDesc};

/// Interface names assigned by the contract matcher.
pub mod contract {
    pub const NFT_COLLECTION: &str = "nft_collection";
    pub const NFT_ITEM: &str = "nft_item";
    pub const JETTON_MINTER: &str = "jetton_minter";
    pub const JETTON_WALLET: &str = "jetton_wallet";
}

/// Get-method names.
pub mod method {
    pub const GET_COLLECTION_DATA: &str = "get_collection_data";
    pub const GET_NFT_DATA: &str = "get_nft_data";
    pub const GET_JETTON_DATA: &str = "get_jetton_data";
    pub const GET_WALLET_DATA: &str = "get_wallet_data";

    pub const GET_NFT_CONTENT: &str = "get_nft_content";
    pub const GET_NFT_ADDRESS_BY_INDEX: &str = "get_nft_address_by_index";
    pub const GET_WALLET_ADDRESS: &str = "get_wallet_address";

    pub const GET_TELEMINT_AUCTION_STATE: &str = "get_telemint_auction_state";
}

/// Known VM exit codes.
pub mod exit_code {
    /// `get_telemint_auction_state` on an item with no running auction.
    pub const TELEMINT_NO_AUCTION: i32 = 219;
}

/// `get_nft_content(index, individual_content) -> full_content`, run on a
/// collection.
pub static GET_NFT_CONTENT: LazyLock<GetMethodDesc> = LazyLock::new(|| GetMethodDesc {
    name: method::GET_NFT_CONTENT.to_string(),
    arguments: vec![
        VmValueDesc::int_bytes("index"),
        VmValueDesc::cell("individual_content"),
    ],
    return_values: vec![VmValueDesc::content("full_content")],
});

/// `get_nft_address_by_index(index) -> address`, run on a collection.
pub static GET_NFT_ADDRESS_BY_INDEX: LazyLock<GetMethodDesc> = LazyLock::new(|| GetMethodDesc {
    name: method::GET_NFT_ADDRESS_BY_INDEX.to_string(),
    arguments: vec![VmValueDesc::int_bytes("index")],
    return_values: vec![VmValueDesc::addr("address")],
});

/// `get_wallet_address(owner_address) -> wallet_address`, run on a jetton
/// minter.
pub static GET_WALLET_ADDRESS: LazyLock<GetMethodDesc> = LazyLock::new(|| GetMethodDesc {
    name: method::GET_WALLET_ADDRESS.to_string(),
    arguments: vec![VmValueDesc::addr("owner_address")],
    return_values: vec![VmValueDesc::addr("wallet_address")],
});

/// Standard interface definitions for the four contract kinds the resolver
/// interprets.
pub mod interfaces {
    use super::*;

    pub fn nft_collection() -> ContractInterface {
        ContractInterface {
            name: ContractName::new(contract::NFT_COLLECTION),
            get_methods: vec![
                GetMethodDesc {
                    name: method::GET_COLLECTION_DATA.to_string(),
                    arguments: vec![],
                    return_values: vec![
                        VmValueDesc::int("next_item_index"),
                        VmValueDesc::content("collection_content"),
                        VmValueDesc::addr("owner_address"),
                    ],
                },
                GET_NFT_ADDRESS_BY_INDEX.clone(),
                GET_NFT_CONTENT.clone(),
            ],
        }
    }

    pub fn nft_item() -> ContractInterface {
        ContractInterface {
            name: ContractName::new(contract::NFT_ITEM),
            get_methods: vec![GetMethodDesc {
                name: method::GET_NFT_DATA.to_string(),
                arguments: vec![],
                return_values: vec![
                    VmValueDesc::int("init"),
                    VmValueDesc::int("index"),
                    VmValueDesc::addr("collection_address"),
                    VmValueDesc::addr("owner_address"),
                    VmValueDesc::cell("individual_content"),
                ],
            }],
        }
    }

    pub fn jetton_minter() -> ContractInterface {
        ContractInterface {
            name: ContractName::new(contract::JETTON_MINTER),
            get_methods: vec![
                GetMethodDesc {
                    name: method::GET_JETTON_DATA.to_string(),
                    arguments: vec![],
                    return_values: vec![
                        VmValueDesc::int("total_supply"),
                        VmValueDesc::int("mintable"),
                        VmValueDesc::addr("admin_address"),
                        VmValueDesc::content("jetton_content"),
                        VmValueDesc::cell("jetton_wallet_code"),
                    ],
                },
                GET_WALLET_ADDRESS.clone(),
            ],
        }
    }

    pub fn jetton_wallet() -> ContractInterface {
        ContractInterface {
            name: ContractName::new(contract::JETTON_WALLET),
            get_methods: vec![GetMethodDesc {
                name: method::GET_WALLET_DATA.to_string(),
                arguments: vec![],
                return_values: vec![
                    VmValueDesc::int("balance"),
                    VmValueDesc::addr("owner"),
                    VmValueDesc::addr("jetton"),
                    VmValueDesc::cell("jetton_wallet_code"),
                ],
            }],
        }
    }
}
