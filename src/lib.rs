//! TVM Get-Method Introspection
//!
//! Runs the get-methods of indexed accounts, derives owner, minter, metadata
//! and balance fields from their results, and cross-checks NFT items and
//! jetton wallets against their minters.
//!
//! - **ABI**: descriptors, typed stack values and the argument codec
//!   ([`abi`])
//! - **Orchestration**: execution history, emulator gateway and dependent
//!   calls ([`GetMethodResolver`])
//! - **Snapshots**: on-disk account states with their history
//!   ([`snapshot`])
//!
//! The emulator is an external component; plug one in by implementing
//! [`Emulator`].

pub mod snapshot;

pub use tvm_introspect_abi as abi;
pub use tvm_introspect_types as types;

pub use snapshot::SnapshotStore;
pub use tvm_introspect_core::{
    known, AccountFetcher, AccountState, Emulator, EmulatorRequest, ExecutedGetMethods,
    GetMethodResolver, MockEmulator, MockFetcher, NoopFetcher, ResolveContext, ResolveError,
    ResolveStats, ResolverConfig, VmError,
};
