//! Recorded get-method executions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tvm_introspect_types::Address;

use crate::desc::{GetMethodDesc, VmValueDesc};
use crate::value::StackValue;

/// One get-method run against a frozen account snapshot.
///
/// `receives` holds the argument payloads produced by
/// [`crate::codec::encode_argument`]; `returns` holds the typed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMethodExecution {
    pub name: String,
    /// Account the method ran against, set only for cross-account calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub arguments: Vec<VmValueDesc>,
    #[serde(default)]
    pub return_values: Vec<VmValueDesc>,
    #[serde(default)]
    pub receives: Vec<Value>,
    #[serde(default)]
    pub returns: Vec<StackValue>,
    /// Failure description. Stored as an empty string by some writers,
    /// which reads back as success.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub error: Option<String>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|e| !e.is_empty()))
}

impl GetMethodExecution {
    pub fn new(desc: &GetMethodDesc) -> Self {
        Self {
            name: desc.name.clone(),
            address: None,
            arguments: desc.arguments.clone(),
            return_values: desc.return_values.clone(),
            receives: Vec::new(),
            returns: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// True if this execution ran with exactly `desc`.
    pub fn matches_desc(&self, desc: &GetMethodDesc) -> bool {
        self.name == desc.name
            && self.arguments == desc.arguments
            && self.return_values == desc.return_values
    }
}
