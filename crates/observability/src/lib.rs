//! Tracing/logging setup shared by catalog binaries and tests.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogSettings;

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops and
/// return `false`.
pub fn init(settings: &LogSettings) -> bool {
    self::tracing::init(settings)
}
