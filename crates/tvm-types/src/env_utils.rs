//! Environment variable helpers used by configuration loading.
//!
//! ```
//! use tvm_introspect_types::env_utils::{env_var, env_var_or};
//!
//! let depth: usize = env_var_or("TVM_INTROSPECT_DOC_DEPTH", 4);
//! let custom: Option<u64> = env_var("TVM_INTROSPECT_DOC_UNSET");
//! assert_eq!(depth, 4);
//! assert!(custom.is_none());
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Parse an environment variable into any `FromStr` type.
///
/// Returns `None` if the variable is unset or does not parse.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a non-empty path from the environment.
pub fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load the file named by an environment variable.
///
/// Returns `Ok(None)` if the variable is unset; a set variable pointing at an
/// unreadable file is an error.
pub fn env_file_bytes(key: &str) -> Result<Option<Vec<u8>>> {
    let Some(path) = env_path(key) else {
        return Ok(None);
    };
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read {} from {}", key, path.display()))?;
    Ok(Some(bytes))
}
