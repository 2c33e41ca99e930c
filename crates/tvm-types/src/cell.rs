//! Cells and bag-of-cells serialization.
//!
//! Cells come from `tycho-types`: they compare by representation hash and
//! are cheap to clone. Persisted cells travel as base64 bag-of-cells (BOC)
//! strings, decoded with the same checks the node applies, so a malformed
//! or oversized BOC is an error and never an allocation.
//!
//! # Example
//!
//! ```
//! use tvm_introspect_types::cell::{cell_from_bytes, decode_base64, encode_base64};
//!
//! let cell = cell_from_bytes(b"ipfs://meta").unwrap();
//! let decoded = decode_base64(&encode_base64(&cell)).unwrap();
//! assert_eq!(decoded.repr_hash(), cell.repr_hash());
//! ```

use anyhow::{ensure, Context, Result};

pub use tycho_types::prelude::{Boc, Cell, CellBuilder, CellFamily, HashBytes};

/// Data bytes an ordinary cell can hold (1023 bits, rounded down).
pub const MAX_DATA_BYTES: usize = 127;

pub fn empty_cell() -> Cell {
    Cell::empty_cell()
}

/// Build a leaf cell whose data bits are `bytes`.
pub fn cell_from_bytes(bytes: &[u8]) -> Result<Cell> {
    ensure!(
        bytes.len() <= MAX_DATA_BYTES,
        "{} bytes do not fit in one cell",
        bytes.len()
    );
    let mut builder = CellBuilder::new();
    builder.store_raw(bytes, (bytes.len() * 8) as u16)?;
    Ok(builder.build()?)
}

/// Decode a base64 BOC and return its first root.
pub fn decode_base64(boc: &str) -> Result<Cell> {
    Boc::decode_base64(boc.trim()).context("invalid bag of cells")
}

pub fn encode_base64(cell: &Cell) -> String {
    Boc::encode_base64(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separately_built_cells_are_equal() {
        let a = cell_from_bytes(b"5.json").unwrap();
        let b = cell_from_bytes(b"5.json").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.repr_hash(), b.repr_hash());
        assert_eq!(a.data(), b"5.json");
        assert_ne!(a, cell_from_bytes(b"6.json").unwrap());
    }

    #[test]
    fn test_base64_boc_keeps_identity() {
        let leaf = cell_from_bytes(b"shared").unwrap();
        let mut builder = CellBuilder::new();
        builder.store_u8(0xab).unwrap();
        builder.store_reference(leaf.clone()).unwrap();
        let root = builder.build().unwrap();

        let decoded = decode_base64(&encode_base64(&root)).unwrap();
        assert_eq!(decoded, root);
        assert_eq!(decoded.reference_count(), 1);
        assert_eq!(empty_cell().reference_count(), 0);
    }

    #[test]
    fn test_rejects_oversized_data() {
        assert!(cell_from_bytes(&[0u8; MAX_DATA_BYTES]).is_ok());
        assert!(cell_from_bytes(&[0u8; MAX_DATA_BYTES + 1]).is_err());
    }

    #[test]
    fn test_rejects_malformed_boc() {
        assert!(decode_base64("").is_err());
        assert!(decode_base64("bm90IGEgYm9j").is_err());

        // Header declaring 2^32-1 cells and roots in a 19-byte input.
        let err = decode_base64("te6ccgQB//////////8AAAAAAA==").unwrap_err();
        assert!(err.to_string().contains("invalid bag of cells"));
    }
}
