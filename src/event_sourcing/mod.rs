// ============================================================================
// Event Sourcing Infrastructure
// ============================================================================
//
// Generic aggregate/event infrastructure.
// Domain-specific code is in src/domain/
//
// ============================================================================

pub mod core;

pub use self::core::*;
