//! Per-account history of get-method executions.
//!
//! History is grouped by contract interface and kept in insertion order.
//! Only the first entry carrying a given method name is ever consulted, so
//! the group behaves as a one-slot cache per method:
//!
//! - [`Lookup::Valid`]: reuse the entry as is.
//! - [`Lookup::Stale`]: the entry no longer matches and will be replaced.
//! - [`Lookup::Missing`]: nothing recorded yet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tvm_introspect_abi::{arguments_eq, ContractName, GetMethodDesc, GetMethodExecution, StackValue};
use tvm_introspect_types::Address;

/// Result of checking history for a get-method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Valid(usize),
    Stale(usize),
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutedGetMethods(BTreeMap<ContractName, Vec<GetMethodExecution>>);

impl ExecutedGetMethods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded executions for `contract`, oldest first.
    pub fn get(&self, contract: &ContractName) -> &[GetMethodExecution] {
        self.0.get(contract).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn execution(&self, contract: &ContractName, index: usize) -> Option<&GetMethodExecution> {
        self.get(contract).get(index)
    }

    /// First execution of `method` recorded under `contract`.
    pub fn find(&self, contract: &ContractName, method: &str) -> Option<&GetMethodExecution> {
        self.get(contract).iter().find(|e| e.name == method)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decide whether the recorded execution of `desc` can be reused.
    ///
    /// `target` is the account the call runs against when it is not the
    /// account owning this history. An entry is valid when its descriptor
    /// equals `desc`, it ran against the same target, and its recorded
    /// arguments equal `args` (two empty argument lists are equal).
    pub fn lookup(
        &self,
        contract: &ContractName,
        desc: &GetMethodDesc,
        target: Option<&Address>,
        args: &[StackValue],
    ) -> Lookup {
        let Some((index, exec)) = self
            .get(contract)
            .iter()
            .enumerate()
            .find(|(_, e)| e.name == desc.name)
        else {
            return Lookup::Missing;
        };

        if !exec.matches_desc(desc) || exec.address.as_ref() != target {
            return Lookup::Stale(index);
        }
        if args.is_empty() && exec.receives.is_empty() {
            return Lookup::Valid(index);
        }
        if arguments_eq(&desc.arguments, args, &exec.receives) {
            Lookup::Valid(index)
        } else {
            Lookup::Stale(index)
        }
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    pub fn evict(&mut self, contract: &ContractName, index: usize) -> Option<GetMethodExecution> {
        let group = self.0.get_mut(contract)?;
        if index >= group.len() {
            return None;
        }
        Some(group.remove(index))
    }

    pub fn record(&mut self, contract: &ContractName, exec: GetMethodExecution) {
        self.0.entry(contract.clone()).or_default().push(exec);
    }

    /// Commit a fresh execution, dropping the stale entry `lookup` found.
    pub fn replace(&mut self, contract: &ContractName, lookup: Lookup, exec: GetMethodExecution) {
        if let Lookup::Stale(index) = lookup {
            self.evict(contract, index);
        }
        self.record(contract, exec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use tvm_introspect_abi::{encode_argument, VmValueDesc};

    fn nft_content_desc() -> GetMethodDesc {
        GetMethodDesc {
            name: "get_nft_content".to_string(),
            arguments: vec![VmValueDesc::int_bytes("index"), VmValueDesc::cell("individual_content")],
            return_values: vec![VmValueDesc::content("full_content")],
        }
    }

    fn address_by_index_desc() -> GetMethodDesc {
        GetMethodDesc {
            name: "get_nft_address_by_index".to_string(),
            arguments: vec![VmValueDesc::int_bytes("index")],
            return_values: vec![VmValueDesc::addr("address")],
        }
    }

    fn collection_data_desc() -> GetMethodDesc {
        GetMethodDesc {
            name: "get_collection_data".to_string(),
            arguments: vec![],
            return_values: vec![VmValueDesc::int("next_item_index")],
        }
    }

    fn executed(desc: &GetMethodDesc, target: Option<Address>, args: &[StackValue]) -> GetMethodExecution {
        let mut exec = GetMethodExecution::new(desc);
        exec.address = target;
        exec.receives = desc
            .arguments
            .iter()
            .zip(args)
            .map(|(d, v)| encode_argument(d, v).unwrap())
            .collect();
        exec
    }

    fn index(v: u64) -> StackValue {
        StackValue::Int(BigInt::from(v))
    }

    fn item() -> ContractName {
        ContractName::new("nft_item")
    }

    #[test]
    fn test_lookup_missing() {
        let history = ExecutedGetMethods::new();
        assert_eq!(
            history.lookup(&item(), &collection_data_desc(), None, &[]),
            Lookup::Missing
        );
    }

    #[test]
    fn test_lookup_no_args_valid() {
        let desc = collection_data_desc();
        let mut history = ExecutedGetMethods::new();
        history.record(&"nft_collection".into(), executed(&desc, None, &[]));

        assert_eq!(
            history.lookup(&"nft_collection".into(), &desc, None, &[]),
            Lookup::Valid(0)
        );
        // Same method under another interface is a separate slot.
        assert_eq!(history.lookup(&item(), &desc, None, &[]), Lookup::Missing);
    }

    #[test]
    fn test_lookup_detects_changed_descriptor() {
        let desc = collection_data_desc();
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&desc, None, &[]));

        let mut changed = desc.clone();
        changed.return_values.push(VmValueDesc::addr("owner_address"));
        assert_eq!(history.lookup(&item(), &changed, None, &[]), Lookup::Stale(0));
    }

    #[test]
    fn test_lookup_argument_sensitive() {
        let desc = address_by_index_desc();
        let minter = Address::new(0, [9; 32]);
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&desc, Some(minter), &[index(5)]));

        assert_eq!(
            history.lookup(&item(), &desc, Some(&minter), &[index(5)]),
            Lookup::Valid(0)
        );
        assert_eq!(
            history.lookup(&item(), &desc, Some(&minter), &[index(6)]),
            Lookup::Stale(0)
        );
    }

    #[test]
    fn test_lookup_target_sensitive() {
        let desc = address_by_index_desc();
        let minter = Address::new(0, [9; 32]);
        let other = Address::new(0, [8; 32]);
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&desc, Some(minter), &[index(5)]));

        assert_eq!(
            history.lookup(&item(), &desc, Some(&other), &[index(5)]),
            Lookup::Stale(0)
        );
        assert_eq!(history.lookup(&item(), &desc, None, &[index(5)]), Lookup::Stale(0));
    }

    #[test]
    fn test_lookup_accepts_number_recorded_by_older_writer() {
        let desc = address_by_index_desc();
        let minter = Address::new(0, [9; 32]);
        let mut exec = GetMethodExecution::new(&desc);
        exec.address = Some(minter);
        exec.receives = vec![serde_json::json!(5.0)];

        let mut history = ExecutedGetMethods::new();
        history.record(&item(), exec);
        assert_eq!(
            history.lookup(&item(), &desc, Some(&minter), &[index(5)]),
            Lookup::Valid(0)
        );
    }

    #[test]
    fn test_only_first_entry_is_consulted() {
        let desc = nft_content_desc();
        let minter = Address::new(0, [9; 32]);
        let cell = StackValue::Cell(tvm_introspect_types::empty_cell());
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&desc, Some(minter), &[index(1), cell.clone()]));
        history.record(&item(), executed(&desc, Some(minter), &[index(2), cell.clone()]));

        assert_eq!(
            history.lookup(&item(), &desc, Some(&minter), &[index(2), cell]),
            Lookup::Stale(0)
        );
    }

    #[test]
    fn test_replace_evicts_stale_and_preserves_order() {
        let a = collection_data_desc();
        let b = address_by_index_desc();
        let c = nft_content_desc();
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&a, None, &[]));
        history.record(&item(), executed(&b, None, &[index(1)]));
        history.record(&item(), executed(&c, None, &[]));

        let lookup = history.lookup(&item(), &b, None, &[index(2)]);
        assert_eq!(lookup, Lookup::Stale(1));
        history.replace(&item(), lookup, executed(&b, None, &[index(2)]));

        let names: Vec<_> = history.get(&item()).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["get_collection_data", "get_nft_content", "get_nft_address_by_index"]
        );
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_evict_out_of_range() {
        let mut history = ExecutedGetMethods::new();
        assert!(history.evict(&item(), 0).is_none());
        history.record(&item(), executed(&collection_data_desc(), None, &[]));
        assert!(history.evict(&item(), 1).is_none());
        assert!(history.evict(&item(), 0).is_some());
        assert!(history.is_empty());
    }

    #[test]
    fn test_history_json_is_keyed_by_contract() {
        let mut history = ExecutedGetMethods::new();
        history.record(&item(), executed(&collection_data_desc(), None, &[]));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json["nft_item"].is_array());

        let back: ExecutedGetMethods = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
