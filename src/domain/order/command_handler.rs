use crate::event_sourcing::core::{Aggregate, EventEnvelope};

use super::aggregate::Order;
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::OrderEvent;

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Aggregate → Events → New Order state
//
// Events are applied to a copy; the caller only sees the new state when every
// event applied cleanly.
//
// ============================================================================

pub struct OrderCommandHandler;

impl OrderCommandHandler {
    /// Run `command` against `order` on behalf of `user`
    pub fn execute(
        order: &Order,
        command: &OrderCommand,
        user: &str,
    ) -> Result<(Order, Vec<EventEnvelope<OrderEvent>>), OrderError> {
        let domain_events = order.handle_command(command)?;

        let mut next = order.clone();
        let mut envelopes = Vec::with_capacity(domain_events.len());
        let mut seq = order.version();

        for domain_event in domain_events {
            seq += 1;
            let envelope = EventEnvelope::new(order.aggregate_id(), seq, domain_event, user);
            next.apply_event(&envelope)?;
            envelopes.push(envelope);
        }

        Ok((next, envelopes))
    }
}
