//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

use storefront_core::DomainError;

/// Failure to replace the catalog from a snapshot.
///
/// Both variants are raised before the shared collection is touched, so the
/// previously loaded catalog keeps serving.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The snapshot source could not be read (missing file, permissions, IO fault).
    #[error("failed to read catalog snapshot {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot was read but its content is structurally invalid.
    #[error("malformed catalog snapshot: {0}")]
    MalformedData(String),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedData(msg.into())
    }

    /// A single record failed domain validation.
    pub fn invalid_record(index: usize, id: &str, err: DomainError) -> Self {
        Self::MalformedData(format!("record {index} (id {id:?}): {err}"))
    }
}

/// No product with the requested id exists in the current catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("product not found: {id}")]
pub struct NotFoundError {
    pub id: String,
}

impl NotFoundError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
