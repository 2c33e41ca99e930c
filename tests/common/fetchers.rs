//! Fetchers for dependency-chain tests.

use anyhow::Result;
use tvm_introspect::abi::ContractInterface;
use tvm_introspect::types::Address;
use tvm_introspect::{AccountFetcher, AccountState, GetMethodResolver, MockFetcher, ResolveContext};

/// Fetches from a [`MockFetcher`] and resolves each fetched account before
/// returning it, the way an indexer backed by the same pipeline would.
pub struct ResolvingFetcher<'a> {
    pub resolver: &'a GetMethodResolver,
    pub states: MockFetcher,
    pub interfaces: Vec<ContractInterface>,
}

#[async_trait::async_trait]
impl<'a> AccountFetcher for ResolvingFetcher<'a> {
    async fn fetch_account(&self, ctx: &ResolveContext, address: &Address) -> Result<AccountState> {
        let mut state = self.states.fetch_account(ctx, address).await?;
        self.resolver
            .resolve(ctx, &mut state, &self.interfaces, self)
            .await?;
        Ok(state)
    }
}
