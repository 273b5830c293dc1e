//! `storefront-core`: domain building blocks shared by the storefront crates.
//!
//! This crate contains **pure domain** primitives (no IO, no locking, no HTTP).

pub mod error;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use money::{Money, NANOS_MAX, NANOS_MIN, NANOS_PER_UNIT};
