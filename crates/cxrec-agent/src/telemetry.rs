//! Tracing setup for the fallback diagnostic channel.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a compact stderr subscriber honoring `RUST_LOG`.
///
/// For embedders that have not installed their own subscriber; a no-op
/// when one is already set, so calling it unconditionally at attach is
/// safe.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_is_idempotent() {
        super::init();
        super::init();
    }
}
