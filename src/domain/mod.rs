// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// The order aggregate and its rules. Nothing in here knows about sessions,
// actors or HTTP.
//
// ============================================================================

pub mod order;
