//! Get-method ABI for the tvm-introspect workspace.
//!
//! - [`desc`]: value and method descriptors, contract interfaces
//! - [`value`]: typed stack values and content layouts
//! - [`codec`]: argument encoding and cross-representation equality
//! - [`execution`]: recorded get-method executions

pub mod codec;
pub mod desc;
pub mod execution;
pub mod value;

pub use codec::{argument_eq, arguments_eq, check_return, encode_argument, CodecError};
pub use desc::{ContractInterface, ContractName, Format, GetMethodDesc, StackType, VmValueDesc};
pub use execution::GetMethodExecution;
pub use value::{Content, ContentMeta, StackValue, VmValue};
