//! Product catalog store.
//!
//! An in-memory, concurrently-read collection of products that is replaced as a
//! whole by loading a snapshot. Reads (`list`, `get`, `search`) never block each
//! other; a load only takes exclusive access to swap in the fully validated
//! replacement.

pub mod error;
pub mod product;
pub mod snapshot;
pub mod store;

pub use error::{LoadError, NotFoundError};
pub use product::{Product, ProductId};
pub use snapshot::{JsonSnapshotDecoder, SnapshotDecoder};
pub use store::{Catalog, CatalogInfo, CatalogStore};
