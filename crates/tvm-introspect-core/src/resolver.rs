//! Get-method orchestration.
//!
//! For every matched interface the resolver runs each argument-less
//! get-method (reusing history when it is still valid), then interprets the
//! well-known ones:
//!
//! | get-method            | fields                                   | dependent calls on minter                          |
//! |-----------------------|------------------------------------------|----------------------------------------------------|
//! | `get_collection_data` | owner, content                           | none                                               |
//! | `get_nft_data`        | minter (collection), owner               | `get_nft_content`, `get_nft_address_by_index`      |
//! | `get_jetton_data`     | content                                  | none                                               |
//! | `get_wallet_data`     | balance, owner, minter                   | `get_wallet_address`                               |
//!
//! A dependent address call confirms that the minter really derives this
//! account. The account is marked fake before the call and cleared only if
//! the derived address equals its own.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use num_bigint::BigInt;
use tracing::{debug, error, instrument, warn};
use tvm_introspect_abi::{
    Content, ContractInterface, ContractName, GetMethodDesc, GetMethodExecution, StackValue,
};
use tvm_introspect_types::{Address, Cell};

use crate::account::AccountState;
use crate::cache::Lookup;
use crate::config::ResolverConfig;
use crate::context::ResolveContext;
use crate::emulator::Emulator;
use crate::errors::{GatewayError, ResolveError};
use crate::fetcher::AccountFetcher;
use crate::gateway::EmulatorGateway;
use crate::known::{contract, method, GET_NFT_ADDRESS_BY_INDEX, GET_NFT_CONTENT, GET_WALLET_ADDRESS};

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Get-methods sent to the emulator.
    pub executed: usize,
    /// Get-methods answered from history.
    pub cached: usize,
    /// Dependent get-methods attempted against a minter, fresh or cached.
    pub dependent_calls: usize,
}

pub struct GetMethodResolver {
    gateway: EmulatorGateway,
    config: ResolverConfig,
}

impl GetMethodResolver {
    pub fn new(emulator: Arc<dyn Emulator>, config: ResolverConfig) -> Self {
        Self {
            gateway: EmulatorGateway::new(emulator, config.blockchain_config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Run and interpret the get-methods of `interfaces` on `acc`.
    ///
    /// `acc` is updated in place: its history, the derived owner, minter,
    /// content and balance fields, and the fake flag. `others` supplies
    /// minter accounts for dependent calls.
    ///
    /// Only interface defects and cancellation stop the pass. After a
    /// cancellation, no execution started by the cancelled call is recorded.
    #[instrument(
        level = "debug",
        skip_all,
        fields(address = %acc.address, block_seq_no = acc.block_seq_no)
    )]
    pub async fn resolve(
        &self,
        ctx: &ResolveContext,
        acc: &mut AccountState,
        interfaces: &[ContractInterface],
        others: &dyn AccountFetcher,
    ) -> Result<ResolveStats, ResolveError> {
        let mut stats = ResolveStats::default();
        if ctx.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        if !acc.has_code_and_data() {
            debug!(
                address = %acc.address,
                "account has no code or data, skipping get-methods"
            );
            return Ok(stats);
        }

        for interface in interfaces {
            for desc in &interface.get_methods {
                if !desc.arguments.is_empty() {
                    continue;
                }
                let exec = self
                    .run_get_method_with_stats(ctx, acc, interface, &desc.name, &mut stats)
                    .await?;
                let Some(exec) = exec else {
                    continue;
                };
                if !exec.is_success() {
                    continue;
                }
                self.interpret(ctx, &interface.name, &exec, acc, others, &mut stats)
                    .await?;
            }
        }

        Ok(stats)
    }

    /// Run the argument-less get-method `method_name` of `interface` on
    /// `acc`, reusing history when valid, without interpreting the result.
    ///
    /// A method missing from `interface` or described with arguments is an
    /// interface defect. Returns `None` if `acc` has no code or data.
    pub async fn run_get_method(
        &self,
        ctx: &ResolveContext,
        acc: &mut AccountState,
        interface: &ContractInterface,
        method_name: &str,
    ) -> Result<Option<GetMethodExecution>, ResolveError> {
        let mut stats = ResolveStats::default();
        self.run_get_method_with_stats(ctx, acc, interface, method_name, &mut stats)
            .await
    }

    async fn run_get_method_with_stats(
        &self,
        ctx: &ResolveContext,
        acc: &mut AccountState,
        interface: &ContractInterface,
        method_name: &str,
        stats: &mut ResolveStats,
    ) -> Result<Option<GetMethodExecution>, ResolveError> {
        let desc = interface.get_method(method_name).ok_or_else(|| {
            ResolveError::defect(&interface.name, method_name, "get-method is not described")
        })?;
        if !desc.arguments.is_empty() {
            return Err(ResolveError::defect(
                &interface.name,
                method_name,
                "get-method is described with arguments",
            ));
        }
        self.execute(ctx, &interface.name, desc, acc, None, &[], stats)
            .await
    }

    /// Resolve many accounts, up to `config.concurrency` at a time.
    ///
    /// Each account is resolved independently; results come back in
    /// completion order, each paired with its account.
    pub async fn resolve_many(
        &self,
        ctx: &ResolveContext,
        items: Vec<(AccountState, Vec<ContractInterface>)>,
        others: &dyn AccountFetcher,
    ) -> Vec<(AccountState, Result<ResolveStats, ResolveError>)> {
        stream::iter(items)
            .map(move |(mut acc, interfaces)| async move {
                let result = self.resolve(ctx, &mut acc, &interfaces, others).await;
                (acc, result)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await
    }

    /// Run `desc` for `subject`, or against `target` when given, reusing
    /// `subject`'s history when valid.
    ///
    /// Returns `None` if the call could not be issued because the account
    /// it runs on has no code or data.
    #[allow(clippy::too_many_arguments)]
    async fn execute(
        &self,
        ctx: &ResolveContext,
        contract_name: &ContractName,
        desc: &GetMethodDesc,
        subject: &mut AccountState,
        target: Option<&AccountState>,
        args: &[StackValue],
        stats: &mut ResolveStats,
    ) -> Result<Option<GetMethodExecution>, ResolveError> {
        let target_address = target.map(|t| t.address);
        let lookup = subject.executed_get_methods.lookup(
            contract_name,
            desc,
            target_address.as_ref(),
            args,
        );

        if let Lookup::Valid(index) = lookup {
            if let Some(exec) = subject.executed_get_methods.execution(contract_name, index) {
                stats.cached += 1;
                debug!(
                    get_method = %desc.name,
                    contract_name = %contract_name,
                    address = %subject.address,
                    "reusing recorded get-method execution"
                );
                return Ok(Some(exec.clone()));
            }
        }

        let run_on: &AccountState = target.unwrap_or(subject);
        let result = self
            .gateway
            .call_get_method(&ctx.cancel, desc, run_on, args)
            .await;

        let mut exec = match result {
            Ok(exec) => exec,
            Err(GatewayError::NoCodeOrData { address }) => {
                error!(
                    get_method = %desc.name,
                    contract_name = %contract_name,
                    address = %subject.address,
                    minter_address = %address,
                    "cannot run get-method: account has no code or data"
                );
                return Ok(None);
            }
            Err(e) => return Err(ResolveError::from_gateway(contract_name, &desc.name, e)),
        };
        exec.address = target_address;
        stats.executed += 1;
        subject
            .executed_get_methods
            .replace(contract_name, lookup, exec.clone());
        Ok(Some(exec))
    }

    async fn interpret(
        &self,
        ctx: &ResolveContext,
        contract_name: &ContractName,
        exec: &GetMethodExecution,
        acc: &mut AccountState,
        others: &dyn AccountFetcher,
        stats: &mut ResolveStats,
    ) -> Result<(), ResolveError> {
        match exec.name.as_str() {
            method::GET_COLLECTION_DATA => {
                acc.owner_address = returned_address(contract_name, exec, 2)?;
                map_content(acc, returned_content(contract_name, exec, 1)?);
            }
            method::GET_NFT_DATA => {
                self.interpret_nft_data(ctx, contract_name, exec, acc, others, stats)
                    .await?;
            }
            method::GET_JETTON_DATA => {
                map_content(acc, returned_content(contract_name, exec, 3)?);
            }
            method::GET_WALLET_DATA => {
                self.interpret_wallet_data(ctx, contract_name, exec, acc, others, stats)
                    .await?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn interpret_nft_data(
        &self,
        ctx: &ResolveContext,
        contract_name: &ContractName,
        exec: &GetMethodExecution,
        acc: &mut AccountState,
        others: &dyn AccountFetcher,
        stats: &mut ResolveStats,
    ) -> Result<(), ResolveError> {
        let index = returned_int(contract_name, exec, 1)?;
        let collection = returned_address(contract_name, exec, 2)?;
        let owner = returned_address(contract_name, exec, 3)?;
        let individual_content = returned_cell(contract_name, exec, 4)?;

        acc.minter_address = collection;
        acc.owner_address = owner;

        let Some(collection) = collection else {
            return Ok(());
        };
        let Some(collection) = self.fetch_minter(ctx, acc, &collection, others).await? else {
            return Ok(());
        };

        self.nft_item_content(ctx, acc, &collection, index.clone(), individual_content, stats)
            .await?;
        self.confirm_derived_address(
            ctx,
            &ContractName::new(contract::NFT_COLLECTION),
            &GET_NFT_ADDRESS_BY_INDEX,
            acc,
            &collection,
            vec![StackValue::Int(index)],
            stats,
        )
        .await
    }

    async fn interpret_wallet_data(
        &self,
        ctx: &ResolveContext,
        contract_name: &ContractName,
        exec: &GetMethodExecution,
        acc: &mut AccountState,
        others: &dyn AccountFetcher,
        stats: &mut ResolveStats,
    ) -> Result<(), ResolveError> {
        let balance = returned_int(contract_name, exec, 0)?;
        let owner = returned_address(contract_name, exec, 1)?;
        let minter = returned_address(contract_name, exec, 2)?;

        acc.jetton_balance = Some(balance);
        acc.owner_address = owner;
        acc.minter_address = minter;

        let (Some(owner), Some(minter)) = (owner, minter) else {
            return Ok(());
        };
        let Some(minter) = self.fetch_minter(ctx, acc, &minter, others).await? else {
            return Ok(());
        };

        self.confirm_derived_address(
            ctx,
            &ContractName::new(contract::JETTON_MINTER),
            &GET_WALLET_ADDRESS,
            acc,
            &minter,
            vec![StackValue::Address(Some(owner))],
            stats,
        )
        .await
    }

    /// Fetch the minter of `acc` for dependent calls.
    ///
    /// Returns `None`, after logging, when the minter cannot be fetched or
    /// fetching it would close a cycle or exceed the configured depth.
    async fn fetch_minter(
        &self,
        ctx: &ResolveContext,
        acc: &AccountState,
        minter: &Address,
        others: &dyn AccountFetcher,
    ) -> Result<Option<AccountState>, ResolveError> {
        if *minter == acc.address || ctx.has_visited(minter) {
            warn!(
                address = %acc.address,
                minter_address = %minter,
                "dependency cycle, skipping dependent get-methods"
            );
            return Ok(None);
        }
        if ctx.depth() >= self.config.max_dependency_depth {
            warn!(
                address = %acc.address,
                minter_address = %minter,
                depth = ctx.depth(),
                "dependency chain too deep, skipping dependent get-methods"
            );
            return Ok(None);
        }

        let child = ctx.child(acc.address);
        let fetched = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Err(ResolveError::Cancelled),
            fetched = others.fetch_account(&child, minter) => fetched,
        };
        match fetched {
            Ok(state) => Ok(Some(state)),
            Err(_) if ctx.is_cancelled() => Err(ResolveError::Cancelled),
            Err(e) => {
                error!(
                    address = %acc.address,
                    workchain = acc.workchain,
                    shard = acc.shard,
                    block_seq_no = acc.block_seq_no,
                    minter_address = %minter,
                    error = %e,
                    "cannot fetch minter account"
                );
                Ok(None)
            }
        }
    }

    async fn nft_item_content(
        &self,
        ctx: &ResolveContext,
        acc: &mut AccountState,
        collection: &AccountState,
        index: BigInt,
        individual_content: Cell,
        stats: &mut ResolveStats,
    ) -> Result<(), ResolveError> {
        let contract_name = ContractName::new(contract::NFT_COLLECTION);
        let args = [StackValue::Int(index), StackValue::Cell(individual_content)];

        stats.dependent_calls += 1;
        let exec = self
            .execute(ctx, &contract_name, &GET_NFT_CONTENT, acc, Some(collection), &args, stats)
            .await?;
        let Some(exec) = exec else {
            return Ok(());
        };
        if !exec.is_success() {
            error!(
                get_method = %GET_NFT_CONTENT.name,
                address = %acc.address,
                minter_address = %collection.address,
                error = exec.error.as_deref().unwrap_or_default(),
                "cannot get nft content from collection"
            );
            return Ok(());
        }
        map_content(acc, returned_content(&contract_name, &exec, 0)?);
        Ok(())
    }

    /// Ask `minter` to derive the address for `args` and clear `acc.fake`
    /// only if it equals `acc.address`.
    #[allow(clippy::too_many_arguments)]
    async fn confirm_derived_address(
        &self,
        ctx: &ResolveContext,
        contract_name: &ContractName,
        desc: &GetMethodDesc,
        acc: &mut AccountState,
        minter: &AccountState,
        args: Vec<StackValue>,
        stats: &mut ResolveStats,
    ) -> Result<(), ResolveError> {
        let previous = acc.fake;
        acc.fake = true;

        stats.dependent_calls += 1;
        let exec = match self
            .execute(ctx, contract_name, desc, acc, Some(minter), &args, stats)
            .await
        {
            Ok(Some(exec)) => exec,
            Ok(None) => return Ok(()),
            Err(ResolveError::Cancelled) => {
                acc.fake = previous;
                return Err(ResolveError::Cancelled);
            }
            Err(e) => return Err(e),
        };
        if !exec.is_success() {
            error!(
                get_method = %desc.name,
                address = %acc.address,
                minter_address = %minter.address,
                error = exec.error.as_deref().unwrap_or_default(),
                "cannot confirm derived address, account stays fake"
            );
            return Ok(());
        }

        let derived = returned_address(contract_name, &exec, 0)?;
        if derived == Some(acc.address) {
            acc.fake = false;
        } else {
            warn!(
                get_method = %desc.name,
                address = %acc.address,
                minter_address = %minter.address,
                derived_address = ?derived.map(|a| a.to_raw()),
                "minter derives a different address, account marked fake"
            );
        }
        Ok(())
    }
}

/// Copy decoded metadata onto the account. Fields absent from the layout
/// are left untouched.
pub fn map_content(acc: &mut AccountState, content: &Content) {
    let meta = match content {
        Content::Offchain { uri } => {
            acc.content_uri = Some(uri.clone());
            return;
        }
        Content::Semichain { uri, meta } => {
            acc.content_uri = Some(uri.clone());
            meta
        }
        Content::Onchain(meta) => meta,
    };
    acc.content_name = meta.name.clone();
    acc.content_description = meta.description.clone();
    acc.content_image = meta.image.clone();
    acc.content_image_data = meta.image_data.clone();
}

fn returned<'e>(
    contract_name: &ContractName,
    exec: &'e GetMethodExecution,
    index: usize,
) -> Result<&'e StackValue, ResolveError> {
    exec.returns.get(index).ok_or_else(|| {
        ResolveError::defect(
            contract_name,
            &exec.name,
            format!("missing return value {}", index),
        )
    })
}

fn wrong_type(
    contract_name: &ContractName,
    exec: &GetMethodExecution,
    index: usize,
    expected: &str,
    found: &StackValue,
) -> ResolveError {
    ResolveError::defect(
        contract_name,
        &exec.name,
        format!(
            "return value {}: expected {}, got {}",
            index,
            expected,
            found.kind()
        ),
    )
}

fn returned_address(
    contract_name: &ContractName,
    exec: &GetMethodExecution,
    index: usize,
) -> Result<Option<Address>, ResolveError> {
    let value = returned(contract_name, exec, index)?;
    value
        .as_address()
        .map(|a| a.copied())
        .ok_or_else(|| wrong_type(contract_name, exec, index, "address", value))
}

fn returned_int(
    contract_name: &ContractName,
    exec: &GetMethodExecution,
    index: usize,
) -> Result<BigInt, ResolveError> {
    let value = returned(contract_name, exec, index)?;
    value
        .as_int()
        .cloned()
        .ok_or_else(|| wrong_type(contract_name, exec, index, "int", value))
}

fn returned_cell(
    contract_name: &ContractName,
    exec: &GetMethodExecution,
    index: usize,
) -> Result<Cell, ResolveError> {
    let value = returned(contract_name, exec, index)?;
    value
        .as_cell()
        .cloned()
        .ok_or_else(|| wrong_type(contract_name, exec, index, "cell", value))
}

fn returned_content<'e>(
    contract_name: &ContractName,
    exec: &'e GetMethodExecution,
    index: usize,
) -> Result<&'e Content, ResolveError> {
    let value = returned(contract_name, exec, index)?;
    value
        .as_content()
        .ok_or_else(|| wrong_type(contract_name, exec, index, "content", value))
}
