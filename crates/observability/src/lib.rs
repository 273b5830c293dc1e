//! Tracing and logging setup shared by the storefront binaries.

/// Initialize process-wide logging with the default format and filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogConfig::from_env());
}

/// Subscriber configuration (format, filter).
pub mod tracing;
