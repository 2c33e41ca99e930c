//! Value codec: native stack values to persisted payloads and back.
//!
//! Argument payloads are recorded on each execution as JSON so that history
//! loaded back from storage can be compared against freshly supplied
//! arguments. The same integer may come back in several shapes (decimal
//! string, JSON number, base64 big-endian bytes), so comparisons decode the
//! recorded side per descriptor instead of comparing JSON values directly.
//!
//! | stack type | format    | native             | payload                     |
//! |------------|-----------|--------------------|-----------------------------|
//! | `int`      | none      | `Int`              | decimal string              |
//! | `int`      | `bytes`   | `Int`              | base64 big-endian magnitude |
//! | `slice`    | `addr`    | `Address`          | user-friendly address       |
//! | `cell`     | none      | `Cell`             | base64 bag of cells         |
//!
//! Any failure to decode the recorded side makes the comparison unequal.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::FromPrimitive;
use serde_json::Value;
use tvm_introspect_types::cell::{decode_base64, encode_base64};
use tvm_introspect_types::encoding::{base64_encode, try_base64_decode};
use tvm_introspect_types::Address;

use crate::desc::{Format, StackType, VmValueDesc};
use crate::value::StackValue;

/// A native value does not fit the descriptor it is passed or returned under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    TypeMismatch {
        name: String,
        expected: String,
        found: &'static str,
    },
    UnsupportedDescriptor {
        name: String,
        stack_type: StackType,
        format: Option<Format>,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "value `{}`: expected {}, got {}", name, expected, found),
            CodecError::UnsupportedDescriptor {
                name,
                stack_type,
                format,
            } => match format {
                Some(format) => write!(
                    f,
                    "value `{}`: unsupported descriptor {} with format {}",
                    name, stack_type, format
                ),
                None => write!(f, "value `{}`: unsupported descriptor {}", name, stack_type),
            },
        }
    }
}

impl std::error::Error for CodecError {}

fn mismatch(desc: &VmValueDesc, value: &StackValue) -> CodecError {
    let expected = match desc.format {
        Some(format) => format!("{} ({})", desc.stack_type, format),
        None => desc.stack_type.to_string(),
    };
    CodecError::TypeMismatch {
        name: desc.name.clone(),
        expected,
        found: value.kind(),
    }
}

fn unsupported(desc: &VmValueDesc) -> CodecError {
    CodecError::UnsupportedDescriptor {
        name: desc.name.clone(),
        stack_type: desc.stack_type,
        format: desc.format,
    }
}

/// Encode an argument into the payload recorded on its execution.
pub fn encode_argument(desc: &VmValueDesc, value: &StackValue) -> Result<Value, CodecError> {
    match (desc.stack_type, desc.format) {
        (StackType::Int, None) => {
            let v = value.as_int().ok_or_else(|| mismatch(desc, value))?;
            Ok(Value::String(v.to_string()))
        }
        (StackType::Int, Some(Format::Bytes)) => {
            let v = value.as_int().ok_or_else(|| mismatch(desc, value))?;
            Ok(Value::String(base64_encode(&int_to_bytes(v))))
        }
        (StackType::Slice, Some(Format::Addr)) => {
            let a = value.as_address().ok_or_else(|| mismatch(desc, value))?;
            Ok(match a {
                Some(a) => Value::String(a.to_user_friendly()),
                None => Value::Null,
            })
        }
        (StackType::Cell, None) => {
            let c = value.as_cell().ok_or_else(|| mismatch(desc, value))?;
            Ok(Value::String(encode_base64(c)))
        }
        _ => Err(unsupported(desc)),
    }
}

/// Big-endian magnitude, empty for zero. The sign is not encoded.
pub fn int_to_bytes(v: &BigInt) -> Vec<u8> {
    match v.sign() {
        Sign::NoSign => Vec::new(),
        Sign::Plus | Sign::Minus => v.magnitude().to_bytes_be(),
    }
}

fn number_to_int(n: &serde_json::Number) -> Option<BigInt> {
    if let Some(i) = n.as_i64() {
        return Some(BigInt::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(BigInt::from(u));
    }
    let f = n.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    BigInt::from_f64(f)
}

/// Decode a recorded integer payload.
pub fn decode_recorded_int(format: Option<Format>, recorded: &Value) -> Option<BigInt> {
    match (format, recorded) {
        (_, Value::Number(n)) => number_to_int(n),
        (None, Value::String(s)) => BigInt::from_str(s.trim()).ok(),
        (Some(Format::Bytes), Value::String(s)) => {
            let bytes = try_base64_decode(s)?;
            Some(BigInt::from_bytes_be(Sign::Plus, &bytes))
        }
        _ => None,
    }
}

/// Compare a native argument against its recorded payload.
pub fn argument_eq(desc: &VmValueDesc, value: &StackValue, recorded: &Value) -> bool {
    match (desc.stack_type, desc.format) {
        (StackType::Int, None) => {
            let Some(native) = value.as_int() else {
                return false;
            };
            decode_recorded_int(desc.format, recorded).as_ref() == Some(native)
        }
        (StackType::Int, Some(Format::Bytes)) => {
            let Some(native) = value.as_int() else {
                return false;
            };
            decode_recorded_int(desc.format, recorded)
                .is_some_and(|prev| prev.magnitude() == native.magnitude())
        }
        (StackType::Slice, Some(Format::Addr)) => {
            let Some(native) = value.as_address() else {
                return false;
            };
            match recorded {
                Value::Null => native.is_none(),
                Value::String(s) => match (native, s.parse::<Address>()) {
                    (Some(native), Ok(prev)) => *native == prev,
                    _ => false,
                },
                _ => false,
            }
        }
        (StackType::Cell, None) => {
            let Some(native) = value.as_cell() else {
                return false;
            };
            let Value::String(s) = recorded else {
                return false;
            };
            match decode_base64(s) {
                Ok(prev) => prev.repr_hash() == native.repr_hash(),
                Err(_) => false,
            }
        }
        _ => false,
    }
}

/// Compare an argument list against recorded payloads.
pub fn arguments_eq(descs: &[VmValueDesc], values: &[StackValue], recorded: &[Value]) -> bool {
    if descs.len() != values.len() || values.len() != recorded.len() {
        return false;
    }
    descs
        .iter()
        .zip(values)
        .zip(recorded)
        .all(|((d, v), r)| argument_eq(d, v, r))
}

/// Check that a returned value has the shape its descriptor promises.
pub fn check_return(desc: &VmValueDesc, value: &StackValue) -> Result<(), CodecError> {
    let ok = match (desc.stack_type, desc.format) {
        (StackType::Int, None | Some(Format::Bytes)) => value.as_int().is_some(),
        (StackType::Slice, Some(Format::Addr)) => value.as_address().is_some(),
        (StackType::Slice | StackType::Cell, None) => value.as_cell().is_some(),
        (StackType::Cell, Some(Format::Content)) => value.as_content().is_some(),
        _ => return Err(unsupported(desc)),
    };
    if ok {
        Ok(())
    } else {
        Err(mismatch(desc, value))
    }
}
