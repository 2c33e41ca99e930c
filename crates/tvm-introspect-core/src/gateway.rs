//! Adapter between descriptor-level get-method calls and the emulator.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tvm_introspect_abi::{check_return, encode_argument, GetMethodDesc, GetMethodExecution, StackValue, VmValue};

use crate::account::AccountState;
use crate::emulator::{Emulator, EmulatorRequest, VmError};
use crate::errors::GatewayError;
use crate::known::{exit_code, method};

/// Runs a get-method described by a [`GetMethodDesc`] against an account
/// and turns the outcome into a [`GetMethodExecution`].
///
/// VM failures and malformed return stacks land in the execution's `error`
/// field. Only conditions that prevent producing a record at all come back
/// as [`GatewayError`].
#[derive(Clone)]
pub struct EmulatorGateway {
    emulator: Arc<dyn Emulator>,
    blockchain_config: Option<Arc<Vec<u8>>>,
}

impl EmulatorGateway {
    pub fn new(emulator: Arc<dyn Emulator>, blockchain_config: Option<Arc<Vec<u8>>>) -> Self {
        Self {
            emulator,
            blockchain_config,
        }
    }

    pub async fn call_get_method(
        &self,
        cancel: &CancellationToken,
        desc: &GetMethodDesc,
        acc: &AccountState,
        args: &[StackValue],
    ) -> Result<GetMethodExecution, GatewayError> {
        if !acc.has_code_and_data() {
            return Err(GatewayError::NoCodeOrData {
                address: acc.address,
            });
        }
        if desc.arguments.len() != args.len() {
            return Err(GatewayError::Defect(format!(
                "{} expects {} arguments, got {}",
                desc.name,
                desc.arguments.len(),
                args.len()
            )));
        }

        let mut exec = GetMethodExecution::new(desc);
        exec.receives = desc
            .arguments
            .iter()
            .zip(args)
            .map(|(d, v)| encode_argument(d, v))
            .collect::<Result<_, _>>()?;

        let stack: Vec<VmValue> = desc
            .arguments
            .iter()
            .zip(args)
            .map(|(d, v)| VmValue {
                desc: d.clone(),
                payload: v.clone(),
            })
            .collect();

        let request = EmulatorRequest {
            address: &acc.address,
            code: &acc.code,
            data: &acc.data,
            libraries: &acc.libraries,
            blockchain_config: self.blockchain_config.as_deref().map(Vec::as_slice),
            method: &desc.name,
            arguments: &stack,
            return_values: &desc.return_values,
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            outcome = self.emulator.run_get_method(cancel, request) => outcome,
        };
        // An emulator may give up on cancellation with an ordinary error;
        // such a result must not be recorded.
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        match outcome.and_then(|returns| validate_returns(desc, returns)) {
            Ok(returns) => exec.returns = returns,
            Err(err) => {
                log_vm_error(desc, acc, &err);
                exec.error = Some(err.to_string());
            }
        }
        Ok(exec)
    }
}

fn validate_returns(desc: &GetMethodDesc, returns: Vec<StackValue>) -> Result<Vec<StackValue>, VmError> {
    if returns.len() != desc.return_values.len() {
        return Err(VmError::other(format!(
            "expected {} return values, got {}",
            desc.return_values.len(),
            returns.len()
        )));
    }
    for (d, v) in desc.return_values.iter().zip(&returns) {
        check_return(d, v).map_err(|e| VmError::other(e.to_string()))?;
    }
    Ok(returns)
}

/// Items that were never auctioned report this on every update.
fn is_benign(method_name: &str, err: &VmError) -> bool {
    method_name == method::GET_TELEMINT_AUCTION_STATE
        && err.exit_code == Some(exit_code::TELEMINT_NO_AUCTION)
}

fn log_vm_error(desc: &GetMethodDesc, acc: &AccountState, err: &VmError) {
    if is_benign(&desc.name, err) {
        debug!(
            get_method = %desc.name,
            address = %acc.address,
            workchain = acc.workchain,
            shard = acc.shard,
            block_seq_no = acc.block_seq_no,
            error = %err,
            "get-method reported no auction"
        );
        return;
    }
    warn!(
        get_method = %desc.name,
        address = %acc.address,
        workchain = acc.workchain,
        shard = acc.shard,
        block_seq_no = acc.block_seq_no,
        error = %err,
        "get-method execution failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use serde_json::json;
    use tvm_introspect_abi::VmValueDesc;
    use tvm_introspect_types::Address;

    use crate::emulator::MockEmulator;
    use crate::known::{GET_NFT_ADDRESS_BY_INDEX, GET_NFT_CONTENT};

    fn collection() -> AccountState {
        AccountState::new(Address::new(0, [1; 32]), 0, 10).with_code_and_data(vec![1], vec![2])
    }

    fn gateway(emulator: MockEmulator) -> (EmulatorGateway, Arc<MockEmulator>) {
        let emulator = Arc::new(emulator);
        (EmulatorGateway::new(emulator.clone(), None), emulator)
    }

    #[tokio::test]
    async fn test_successful_call_records_arguments_and_returns() {
        let acc = collection();
        let item = Address::new(0, [5; 32]);
        let mut mock = MockEmulator::new();
        mock.on(acc.address, "get_nft_address_by_index", Ok(vec![StackValue::Address(Some(item))]));
        let (gw, _) = gateway(mock);

        let exec = gw
            .call_get_method(
                &CancellationToken::new(),
                &GET_NFT_ADDRESS_BY_INDEX,
                &acc,
                &[StackValue::Int(BigInt::from(5))],
            )
            .await
            .unwrap();
        assert!(exec.is_success());
        assert_eq!(exec.receives, vec![json!("BQ==")]);
        assert_eq!(exec.returns, vec![StackValue::Address(Some(item))]);
        assert!(exec.address.is_none());
    }

    #[tokio::test]
    async fn test_vm_failure_is_recorded_not_raised() {
        let acc = collection();
        let mut mock = MockEmulator::new();
        mock.on(acc.address, "get_telemint_auction_state", Err(VmError::exit(219)));
        let (gw, _) = gateway(mock);
        let desc = GetMethodDesc {
            name: "get_telemint_auction_state".to_string(),
            arguments: vec![],
            return_values: vec![VmValueDesc::addr("bidder_address")],
        };

        let exec = gw
            .call_get_method(&CancellationToken::new(), &desc, &acc, &[])
            .await
            .unwrap();
        assert_eq!(exec.error.as_deref(), Some("tvm execution failed with code 219"));
        assert!(exec.returns.is_empty());
        assert!(is_benign(&desc.name, &VmError::exit(219)));
        assert!(!is_benign(&desc.name, &VmError::exit(9)));
        assert!(!is_benign("get_nft_data", &VmError::exit(219)));
    }

    #[tokio::test]
    async fn test_malformed_returns_are_recorded_as_error() {
        let acc = collection();
        let mut mock = MockEmulator::new();
        mock.on(acc.address, "get_nft_address_by_index", Ok(vec![StackValue::Int(BigInt::from(1))]));
        let (gw, _) = gateway(mock);

        let exec = gw
            .call_get_method(
                &CancellationToken::new(),
                &GET_NFT_ADDRESS_BY_INDEX,
                &acc,
                &[StackValue::Int(BigInt::from(5))],
            )
            .await
            .unwrap();
        assert!(exec.error.unwrap().contains("expected slice (addr), got int"));
        assert!(exec.returns.is_empty());
    }

    #[tokio::test]
    async fn test_rejections_do_not_reach_emulator() {
        let (gw, mock) = gateway(MockEmulator::new());
        let cancel = CancellationToken::new();

        let empty = AccountState::new(Address::new(0, [1; 32]), 0, 10);
        let err = gw
            .call_get_method(&cancel, &GET_NFT_ADDRESS_BY_INDEX, &empty, &[StackValue::Int(BigInt::from(5))])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoCodeOrData { .. }));

        let err = gw
            .call_get_method(&cancel, &GET_NFT_CONTENT, &collection(), &[StackValue::Int(BigInt::from(5))])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Defect(_)));

        let err = gw
            .call_get_method(&cancel, &GET_NFT_ADDRESS_BY_INDEX, &collection(), &[StackValue::Address(None)])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Defect(_)));

        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_call_returns_cancelled() {
        let acc = collection();
        let mut mock = MockEmulator::new();
        mock.hang(acc.address, "get_nft_address_by_index");
        let (gw, _) = gateway(mock);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let args = [StackValue::Int(BigInt::from(5))];
        let call = gw.call_get_method(
            &cancel,
            &GET_NFT_ADDRESS_BY_INDEX,
            &acc,
            &args,
        );
        let (out, _) = tokio::join!(call, async move { trigger.cancel() });
        assert_eq!(out.unwrap_err(), GatewayError::Cancelled);
    }
}
