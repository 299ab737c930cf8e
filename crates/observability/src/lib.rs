//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide tracing with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::LogFormat;

/// Like [`init`], with an explicit output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
