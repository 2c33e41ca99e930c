//! Shared types for the tvm-introspect workspace.
//!
//! This crate provides the foundational chain types used by the ABI and core
//! crates:
//!
//! - [`address`]: account addresses in raw and user-friendly forms
//! - [`cell`]: cells and the base64 bag-of-cells codec
//! - [`encoding`]: base64 helpers
//! - [`env_utils`]: environment variable parsing for configuration

pub mod address;
pub mod cell;
pub mod encoding;
pub mod env_utils;

pub use address::Address;
pub use cell::{cell_from_bytes, empty_cell, Cell, CellBuilder};
