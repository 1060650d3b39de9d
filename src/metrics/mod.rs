// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order creation and the size of the order store
// - Lifecycle operations (outcome counts, latency)
// - Login attempts
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Order Metrics
    pub orders_created: IntCounter,
    pub orders_in_store: IntGauge,

    // Operation Metrics
    pub order_operations: IntCounterVec,
    pub order_operation_duration: HistogramVec,

    // Session Metrics
    pub login_attempts: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Order Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_in_store = IntGauge::new("orders_in_store", "Orders currently held in memory")?;
        registry.register(Box::new(orders_in_store.clone()))?;

        // Operation Metrics
        let order_operations = IntCounterVec::new(
            Opts::new("order_operations_total", "Order operations by outcome"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(order_operations.clone()))?;

        let order_operation_duration = HistogramVec::new(
            HistogramOpts::new("order_operation_duration_seconds", "Order operation duration")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["operation"],
        )?;
        registry.register(Box::new(order_operation_duration.clone()))?;

        // Session Metrics
        let login_attempts = IntCounterVec::new(
            Opts::new("login_attempts_total", "Login attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_in_store,
            order_operations,
            order_operation_duration,
            login_attempts,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one lifecycle operation
    pub fn record_operation(&self, operation: &str, duration_secs: f64, success: bool) {
        let outcome = if success { OUTCOME_SUCCESS } else { OUTCOME_FAILURE };
        self.order_operations.with_label_values(&[operation, outcome]).inc();
        self.order_operation_duration.with_label_values(&[operation]).observe(duration_secs);
    }

    /// Helper to record a new order and the resulting store size
    pub fn record_order_created(&self, orders_in_store: usize) {
        self.orders_created.inc();
        self.orders_in_store.set(orders_in_store as i64);
    }

    pub fn record_login(&self, success: bool) {
        let outcome = if success { OUTCOME_SUCCESS } else { OUTCOME_FAILURE };
        self.login_attempts.with_label_values(&[outcome]).inc();
    }
}
