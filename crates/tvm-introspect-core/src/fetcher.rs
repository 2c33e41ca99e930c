//! Dependent account fetch abstraction.
//!
//! While resolving one account the resolver sometimes needs the state of
//! another (an item's collection, a wallet's minter) to run confirmation
//! get-methods against. [`AccountFetcher`] supplies it. Sources vary:
//! - the indexer's in-memory view of the current block
//! - a database of earlier snapshots
//! - mock data for testing

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::Mutex;
use tvm_introspect_types::Address;

use crate::account::AccountState;
use crate::context::ResolveContext;

/// Source of account states for dependent get-method calls.
///
/// The returned state should be at or near the block of the account being
/// resolved. Implementations that resolve the fetched account themselves
/// must pass `ctx` on to [`crate::GetMethodResolver::resolve`] so nested
/// resolution inherits cancellation and the dependency chain.
#[async_trait::async_trait]
pub trait AccountFetcher: Send + Sync {
    async fn fetch_account(&self, ctx: &ResolveContext, address: &Address) -> Result<AccountState>;
}

/// A fetcher that always returns errors.
///
/// Dependent confirmations then fail and every claim stays unconfirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFetcher;

#[async_trait::async_trait]
impl AccountFetcher for NoopFetcher {
    async fn fetch_account(&self, _ctx: &ResolveContext, address: &Address) -> Result<AccountState> {
        Err(anyhow::anyhow!(
            "NoopFetcher: cannot fetch account {}",
            address
        ))
    }
}

/// A mock fetcher returning pre-loaded account states.
///
/// # Example
/// ```
/// use tvm_introspect_core::{AccountFetcher, AccountState, MockFetcher, ResolveContext};
/// use tvm_introspect_types::Address;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let collection = Address::new(0, [1; 32]);
/// let mut fetcher = MockFetcher::new();
/// fetcher.add_account(AccountState::new(collection, 0, 100));
///
/// let ctx = ResolveContext::default();
/// assert!(fetcher.fetch_account(&ctx, &collection).await.is_ok());
/// assert!(fetcher.fetch_account(&ctx, &Address::new(0, [2; 32])).await.is_err());
/// assert_eq!(fetcher.fetch_count(), 2);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    accounts: HashMap<Address, AccountState>,
    /// If set, all fetch calls will return this error
    force_error: Option<String>,
    /// Every requested address with the chain depth it was requested at.
    fetches: Mutex<Vec<(Address, usize)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, keyed by its own address.
    pub fn add_account(&mut self, state: AccountState) -> &mut Self {
        self.accounts.insert(state.address, state);
        self
    }

    /// Force all subsequent fetch calls to return the given error.
    pub fn set_error(&mut self, error: &str) -> &mut Self {
        self.force_error = Some(error.to_string());
        self
    }

    pub fn clear_error(&mut self) -> &mut Self {
        self.force_error = None;
        self
    }

    pub fn fetches(&self) -> Vec<(Address, usize)> {
        self.fetches.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }
}

#[async_trait::async_trait]
impl AccountFetcher for MockFetcher {
    async fn fetch_account(&self, ctx: &ResolveContext, address: &Address) -> Result<AccountState> {
        self.fetches.lock().push((*address, ctx.depth()));

        if let Some(ref error) = self.force_error {
            return Err(anyhow::anyhow!("{}", error));
        }

        self.accounts
            .get(address)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockFetcher: account not found: {}", address))
    }
}
