use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Logging
// ============================================================================
//
// RUST_LOG overrides the default filter, e.g. RUST_LOG=dealership_orders=trace
//
// ============================================================================

const DEFAULT_FILTER: &str = "info,dealership_orders=debug";

pub fn init() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .init();
}

/// Route output through the test harness; safe to call from every test
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::new("debug"))
        .try_init();
}
