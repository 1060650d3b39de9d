use super::event::{DomainEvent, EventEnvelope};

// ============================================================================
// Aggregate Root Pattern
// ============================================================================
//
// Key Principles:
// 1. Commands are validated before any event is emitted
// 2. Events represent facts that have already happened
// 3. All state changes flow through apply_event
// 4. Replaying the envelopes reproduces the live state
//
// ============================================================================

/// Generic Aggregate trait
///
/// Type Parameters:
/// - `Event`: The domain event type for this aggregate
/// - `Command`: The command type for this aggregate
/// - `Error`: The error type for business rule violations
pub trait Aggregate: Sized {
    type Event: DomainEvent;
    type Command;
    type Error;

    /// Create new aggregate from first event
    fn apply_first_event(envelope: &EventEnvelope<Self::Event>) -> Result<Self, Self::Error>;

    /// Apply subsequent events to update state
    fn apply_event(&mut self, envelope: &EventEnvelope<Self::Event>) -> Result<(), Self::Error>;

    /// Handle command and emit events (business logic)
    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    fn aggregate_id(&self) -> &str;

    /// Sequence number of the last applied event
    fn version(&self) -> i64;
}
