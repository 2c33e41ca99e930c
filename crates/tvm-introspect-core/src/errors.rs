//! Error types for get-method resolution.
//!
//! Two layers:
//! - [`GatewayError`]: a single emulator call could not be issued or completed.
//! - [`ResolveError`]: a resolution pass must halt.
//!
//! VM failures are not errors at either layer. They are data, recorded on
//! the execution's `error` field.

use std::fmt;

use tvm_introspect_abi::{CodecError, ContractName};
use tvm_introspect_types::Address;

/// A get-method call that never produced an execution record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The account has no code or no data to run against.
    NoCodeOrData { address: Address },
    /// The call does not fit its descriptor. This is a defect of the
    /// interface definition, not of the contract.
    Defect(String),
    /// The caller's cancellation signal fired.
    Cancelled,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NoCodeOrData { address } => {
                write!(f, "account {} has no code or data", address)
            }
            GatewayError::Defect(reason) => write!(f, "{}", reason),
            GatewayError::Cancelled => write!(f, "get-method call cancelled"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<CodecError> for GatewayError {
    fn from(e: CodecError) -> Self {
        GatewayError::Defect(e.to_string())
    }
}

/// Halting outcome of a resolution pass.
///
/// Nothing else stops a pass: VM failures, missing dependent accounts and
/// address mismatches are recorded or logged and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A get-method was requested or interpreted in a way its interface
    /// definition does not allow. Fixing it requires changing the interface
    /// definitions, so retrying the account is pointless.
    InterfaceDefect {
        contract: ContractName,
        method: String,
        reason: String,
    },
    Cancelled,
}

impl ResolveError {
    pub(crate) fn defect(
        contract: &ContractName,
        method: &str,
        reason: impl Into<String>,
    ) -> Self {
        ResolveError::InterfaceDefect {
            contract: contract.clone(),
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Map a gateway failure raised while calling `method`.
    ///
    /// `NoCodeOrData` is not a halting condition and has to be handled by
    /// the caller before converting.
    pub(crate) fn from_gateway(contract: &ContractName, method: &str, e: GatewayError) -> Self {
        match e {
            GatewayError::Cancelled => ResolveError::Cancelled,
            other => ResolveError::defect(contract, method, other.to_string()),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InterfaceDefect {
                contract,
                method,
                reason,
            } => write!(
                f,
                "interface defect in {}.{}: {}",
                contract, method, reason
            ),
            ResolveError::Cancelled => write!(f, "resolution cancelled"),
        }
    }
}

impl std::error::Error for ResolveError {}
