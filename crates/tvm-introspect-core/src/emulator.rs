//! The external TVM emulator boundary.
//!
//! The emulator itself (typically a native library) lives outside this
//! workspace. It sees one call at a time: a frozen account, a method name,
//! a typed argument stack and the return shape to decode into.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tvm_introspect_abi::{StackValue, VmValue, VmValueDesc};
use tvm_introspect_types::Address;

/// Everything a single get-method run needs, borrowed from the account and
/// the descriptor.
#[derive(Debug, Clone, Copy)]
pub struct EmulatorRequest<'a> {
    pub address: &'a Address,
    pub code: &'a [u8],
    pub data: &'a [u8],
    pub libraries: &'a [u8],
    pub blockchain_config: Option<&'a [u8]>,
    pub method: &'a str,
    pub arguments: &'a [VmValue],
    pub return_values: &'a [VmValueDesc],
}

/// The VM ran but did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmError {
    pub exit_code: Option<i32>,
    pub message: String,
}

impl VmError {
    /// Non-zero exit code from the VM.
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            message: String::new(),
        }
    }

    /// Failure outside the VM proper (emulator setup, stack decoding).
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "tvm execution failed with code {}", code)?,
            None => write!(f, "tvm execution failed")?,
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for VmError {}

/// Runs get-methods against frozen account state.
///
/// Implementations should stop work promptly once `cancel` fires; the
/// caller stops waiting either way.
#[async_trait::async_trait]
pub trait Emulator: Send + Sync {
    async fn run_get_method(
        &self,
        cancel: &CancellationToken,
        request: EmulatorRequest<'_>,
    ) -> Result<Vec<StackValue>, VmError>;
}

/// One invocation seen by [`MockEmulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmulatorCall {
    pub address: Address,
    pub method: String,
    pub arguments: Vec<StackValue>,
}

type MockResponse = Result<Vec<StackValue>, VmError>;

/// A programmable in-memory emulator for tests.
///
/// Responses are keyed by account address and method. A response registered
/// with [`on_args`](Self::on_args) takes precedence when the arguments
/// match. Unknown methods fail with exit code 11, as the VM does for a
/// missing method id.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use tokio_util::sync::CancellationToken;
/// use tvm_introspect_abi::{StackValue, VmValueDesc};
/// use tvm_introspect_core::{Emulator, EmulatorRequest, MockEmulator};
/// use tvm_introspect_types::Address;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let wallet = Address::new(0, [1; 32]);
/// let mut emulator = MockEmulator::new();
/// emulator.on(wallet, "seqno", Ok(vec![StackValue::Int(BigInt::from(4))]));
///
/// let request = EmulatorRequest {
///     address: &wallet,
///     code: &[1],
///     data: &[1],
///     libraries: &[],
///     blockchain_config: None,
///     method: "seqno",
///     arguments: &[],
///     return_values: &[VmValueDesc::int("seqno")],
/// };
/// let out = emulator.run_get_method(&CancellationToken::new(), request).await;
/// assert_eq!(out.unwrap().len(), 1);
/// assert_eq!(emulator.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockEmulator {
    responses: HashMap<(Address, String), MockResponse>,
    by_args: Vec<(Address, String, Vec<StackValue>, MockResponse)>,
    /// Methods that never complete until cancelled.
    hanging: Vec<(Address, String)>,
    calls: Mutex<Vec<EmulatorCall>>,
}

/// Exit code the VM reports for an unknown method id.
pub const EXIT_METHOD_NOT_FOUND: i32 = 11;

impl MockEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `method` on `address` regardless of arguments.
    pub fn on(&mut self, address: Address, method: &str, response: MockResponse) -> &mut Self {
        self.responses.insert((address, method.to_string()), response);
        self
    }

    /// Respond to `method` on `address` only when called with `arguments`.
    pub fn on_args(
        &mut self,
        address: Address,
        method: &str,
        arguments: Vec<StackValue>,
        response: MockResponse,
    ) -> &mut Self {
        self.by_args
            .push((address, method.to_string(), arguments, response));
        self
    }

    /// Make `method` on `address` block until the call is cancelled.
    pub fn hang(&mut self, address: Address, method: &str) -> &mut Self {
        self.hanging.push((address, method.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<EmulatorCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Invocations against `address`.
    pub fn calls_to(&self, address: &Address) -> Vec<EmulatorCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| &c.address == address)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn response(&self, address: &Address, method: &str, arguments: &[StackValue]) -> MockResponse {
        let keyed = self
            .by_args
            .iter()
            .find(|(a, m, args, _)| a == address && m == method && args.as_slice() == arguments);
        if let Some((_, _, _, response)) = keyed {
            return response.clone();
        }
        self.responses
            .get(&(*address, method.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(VmError::exit(EXIT_METHOD_NOT_FOUND)))
    }
}

#[async_trait::async_trait]
impl Emulator for MockEmulator {
    async fn run_get_method(
        &self,
        cancel: &CancellationToken,
        request: EmulatorRequest<'_>,
    ) -> Result<Vec<StackValue>, VmError> {
        let arguments: Vec<StackValue> = request
            .arguments
            .iter()
            .map(|a| a.payload.clone())
            .collect();
        self.calls.lock().push(EmulatorCall {
            address: *request.address,
            method: request.method.to_string(),
            arguments: arguments.clone(),
        });

        let hangs = self
            .hanging
            .iter()
            .any(|(a, m)| a == request.address && m == request.method);
        if hangs {
            cancel.cancelled().await;
            return Err(VmError::other("cancelled"));
        }

        self.response(request.address, request.method, &arguments)
    }
}
