//! Per-pass resolution context.

use tokio_util::sync::CancellationToken;
use tvm_introspect_types::Address;

/// Cancellation signal plus the chain of accounts whose resolution led to
/// the current one.
///
/// Contexts are cheap to clone and every nested fetch gets a
/// [`child`](Self::child), so a fetcher that resolves the account it
/// fetched inherits both the signal and the dependency chain.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub cancel: CancellationToken,
    depth: usize,
    visited: Vec<Address>,
}

impl ResolveContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            depth: 0,
            visited: Vec::new(),
        }
    }

    /// Number of accounts above this one in the dependency chain.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn visited(&self) -> &[Address] {
        &self.visited
    }

    pub fn has_visited(&self, address: &Address) -> bool {
        self.visited.contains(address)
    }

    /// Context for a fetch issued while resolving `parent`.
    pub fn child(&self, parent: Address) -> Self {
        let mut visited = self.visited.clone();
        visited.push(parent);
        Self {
            cancel: self.cancel.clone(),
            depth: self.depth + 1,
            visited,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
