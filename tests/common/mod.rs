#![allow(dead_code, unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: deterministic addresses, accounts and return stacks
//! - `assertions`: assertion helpers with descriptive messages
//! - `fetchers`: account fetchers that resolve what they fetch

pub mod assertions;
pub mod fetchers;
pub mod fixtures;

pub use assertions::{assert_error_contains, assert_ok, assert_only_methods};
pub use fetchers::ResolvingFetcher;
pub use fixtures::{
    account, address, addr, cell, collection_data, int, nft_data, offchain, resolver,
    resolver_with, semichain, wallet_data,
};
