// ============================================================================
// Dealership Order Desk
// ============================================================================
//
// In-memory order management for a vehicle dealership:
// - catalog/         - Static reference data (users, stores, cars, banks)
// - event_sourcing/  - Generic aggregate + event envelope abstractions
// - domain/          - Order aggregate, status rules, business errors
// - store/           - Ordered in-memory order collection
// - session/         - Logged-in operator + the order lifecycle operations
// - wizard/          - Multi-step order creation draft
// - workflows/       - Lookup, financial approval and vehicle delivery desks
// - actors/          - Actor owning the session for the process lifetime
// - api/             - HTTP routes over the session actor
// - metrics/         - Prometheus registry, /metrics and /health
// - config, logging  - Environment settings and tracing setup
// - demo             - Optional startup data
//
// ============================================================================

pub mod actors;
pub mod api;
pub mod catalog;
pub mod config;
pub mod demo;
pub mod domain;
pub mod event_sourcing;
pub mod logging;
pub mod metrics;
pub mod session;
pub mod store;
pub mod wizard;
pub mod workflows;
