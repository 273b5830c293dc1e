//! HTTP adapter for the product catalog store.

pub mod app;
pub mod config;
