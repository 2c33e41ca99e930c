//! On-disk account snapshots.
//!
//! Each account is one JSON file named after its raw address, holding the
//! full [`AccountState`] including execution history. The store doubles as
//! an [`AccountFetcher`], so dependent calls can run against minter states
//! saved by an earlier pass.
//!
//! # Usage
//!
//! ```ignore
//! let store = SnapshotStore::new(".snapshots")?;
//! store.save(&account)?;
//!
//! if let Some(previous) = store.load(&account.address)? {
//!     // previous.executed_get_methods can be reused by the resolver
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use tvm_introspect_core::{AccountFetcher, AccountState, ResolveContext};
use tvm_introspect_types::Address;

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create snapshot dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, address: &Address) -> PathBuf {
        self.dir.join(format!("{}.json", address.to_raw().replace(':', "_")))
    }

    pub fn load(&self, address: &Address) -> Result<Option<AccountState>> {
        let path = self.path_for(address);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let state: AccountState = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot {}", path.display()))?;
        if state.address != *address {
            return Err(anyhow!(
                "snapshot {} holds account {}, expected {}",
                path.display(),
                state.address.to_raw(),
                address.to_raw()
            ));
        }
        Ok(Some(state))
    }

    /// Write `state`, replacing any earlier snapshot of the same account.
    pub fn save(&self, state: &AccountState) -> Result<PathBuf> {
        let path = self.path_for(&state.address);
        let json = serde_json::to_vec_pretty(state)?;
        fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        debug!(
            address = %state.address,
            block_seq_no = state.block_seq_no,
            path = %path.display(),
            "saved account snapshot"
        );
        Ok(path)
    }
}

#[async_trait::async_trait]
impl AccountFetcher for SnapshotStore {
    async fn fetch_account(&self, _ctx: &ResolveContext, address: &Address) -> Result<AccountState> {
        self.load(address)?
            .ok_or_else(|| anyhow!("no snapshot for account {}", address.to_raw()))
    }
}
