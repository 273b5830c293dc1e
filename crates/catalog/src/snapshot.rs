//! Snapshot decoding.
//!
//! A snapshot is a complete serialized catalog. Decoding and validation run on
//! a private buffer before the store is touched.

use serde::Deserialize;

use crate::error::LoadError;
use crate::product::Product;

/// Turns snapshot bytes into an ordered list of products.
///
/// Implementations only decode; record validation is applied by the store to
/// every decoder's output.
pub trait SnapshotDecoder: Send + Sync {
    /// Short name of the encoding, used in logs.
    fn format(&self) -> &'static str;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Product>, LoadError>;
}

impl core::fmt::Debug for dyn SnapshotDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapshotDecoder")
            .field("format", &self.format())
            .finish()
    }
}

/// JSON snapshots.
///
/// Accepts either a bare array of products or an object wrapping the array
/// under `"products"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotDecoder;

#[derive(Deserialize)]
struct WrappedSnapshot {
    products: Vec<Product>,
}

impl SnapshotDecoder for JsonSnapshotDecoder {
    fn format(&self) -> &'static str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Product>, LoadError> {
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        let decoded = match first {
            Some(b'{') => serde_json::from_slice::<WrappedSnapshot>(bytes).map(|w| w.products),
            _ => serde_json::from_slice::<Vec<Product>>(bytes),
        };
        decoded.map_err(|e| LoadError::malformed(e.to_string()))
    }
}

/// Validate every record, reporting the first offender.
pub fn validate_products(products: &[Product]) -> Result<(), LoadError> {
    for (index, product) in products.iter().enumerate() {
        product
            .validate()
            .map_err(|e| LoadError::invalid_record(index, product.id().as_str(), e))?;
    }
    Ok(())
}
