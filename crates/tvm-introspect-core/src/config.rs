//! Resolver configuration.

use std::sync::Arc;

use anyhow::Result;
use tvm_introspect_types::env_utils::{env_file_bytes, env_var_or};

pub const ENV_MAX_DEPENDENCY_DEPTH: &str = "TVM_INTROSPECT_MAX_DEPENDENCY_DEPTH";
pub const ENV_CONCURRENCY: &str = "TVM_INTROSPECT_CONCURRENCY";
/// Path to a serialized blockchain configuration passed to the emulator.
pub const ENV_BLOCKCHAIN_CONFIG: &str = "TVM_INTROSPECT_BLOCKCHAIN_CONFIG";

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// How many accounts deep a chain of dependent fetches may go.
    ///
    /// Depth 0 disables dependent calls altogether. The default of 2 allows
    /// an item to confirm against its collection, and that collection's
    /// resolution to fetch one more account.
    pub max_dependency_depth: usize,

    /// Accounts resolved concurrently by `resolve_many` (default: 8).
    pub concurrency: usize,

    /// Blockchain configuration handed to every emulator call (default: none,
    /// the emulator's built-in config).
    pub blockchain_config: Option<Arc<Vec<u8>>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_dependency_depth: 2,
            concurrency: 8,
            blockchain_config: None,
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by the `TVM_INTROSPECT_*` environment variables.
    ///
    /// Unparsable numbers fall back to the default; an unreadable blockchain
    /// config file is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_dependency_depth: env_var_or(
                ENV_MAX_DEPENDENCY_DEPTH,
                defaults.max_dependency_depth,
            ),
            concurrency: env_var_or(ENV_CONCURRENCY, defaults.concurrency).max(1),
            blockchain_config: env_file_bytes(ENV_BLOCKCHAIN_CONFIG)?.map(Arc::new),
        })
    }

    pub fn with_max_dependency_depth(mut self, depth: usize) -> Self {
        self.max_dependency_depth = depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_blockchain_config(mut self, config: Vec<u8>) -> Self {
        self.blockchain_config = Some(Arc::new(config));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_dependency_depth, 2);
        assert_eq!(config.concurrency, 8);
        assert!(config.blockchain_config.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ResolverConfig::default()
            .with_max_dependency_depth(0)
            .with_concurrency(0)
            .with_blockchain_config(vec![1, 2, 3]);
        assert_eq!(config.max_dependency_depth, 0);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.blockchain_config.as_deref(), Some(&vec![1, 2, 3]));
    }

    // All env manipulation lives in one test so parallel tests never observe
    // each other's variables.
    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_MAX_DEPENDENCY_DEPTH, "5");
        std::env::set_var(ENV_CONCURRENCY, "not-a-number");
        std::env::remove_var(ENV_BLOCKCHAIN_CONFIG);

        let config = ResolverConfig::from_env().unwrap();
        assert_eq!(config.max_dependency_depth, 5);
        assert_eq!(config.concurrency, 8);
        assert!(config.blockchain_config.is_none());

        std::env::set_var(ENV_BLOCKCHAIN_CONFIG, "/nonexistent/tvm-introspect/config.boc");
        assert!(ResolverConfig::from_env().is_err());

        std::env::remove_var(ENV_MAX_DEPENDENCY_DEPTH);
        std::env::remove_var(ENV_CONCURRENCY);
        std::env::remove_var(ENV_BLOCKCHAIN_CONFIG);
    }
}
