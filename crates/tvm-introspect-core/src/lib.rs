//! Get-method introspection for indexed TVM accounts.
//!
//! Given an account snapshot and the contract interfaces it was matched to,
//! [`GetMethodResolver`] runs the interfaces' get-methods through an
//! [`Emulator`], keeps a reusable history of executions on the account, and
//! derives owner, minter, metadata and balance fields from the results.
//! Items and wallets are cross-checked against their minter, and accounts
//! the minter does not derive are marked fake.
//!
//! # Modules
//!
//! - [`account`]: the account snapshot and derived fields
//! - [`cache`]: per-account execution history
//! - [`emulator`]: the emulator boundary and a mock for tests
//! - [`gateway`]: descriptor-level calls on top of the emulator
//! - [`fetcher`]: dependent account fetch
//! - [`resolver`]: orchestration
//! - [`known`]: well-known interfaces and descriptors

pub mod account;
pub mod cache;
pub mod config;
pub mod context;
pub mod emulator;
pub mod errors;
pub mod fetcher;
pub mod gateway;
pub mod known;
pub mod resolver;

pub use account::AccountState;
pub use cache::{ExecutedGetMethods, Lookup};
pub use config::ResolverConfig;
pub use context::ResolveContext;
pub use emulator::{Emulator, EmulatorCall, EmulatorRequest, MockEmulator, VmError};
pub use errors::{GatewayError, ResolveError};
pub use fetcher::{AccountFetcher, MockFetcher, NoopFetcher};
pub use gateway::EmulatorGateway;
pub use resolver::{map_content, GetMethodResolver, ResolveStats};
