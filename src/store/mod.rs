use std::collections::HashMap;

use crate::domain::order::{Order, OrderEvent};
use crate::event_sourcing::EventEnvelope;

// ============================================================================
// Order Store - insertion-ordered, in-memory
// ============================================================================
//
// Keeps the current state of every order plus the envelopes that produced
// it. History is append-only and written in the same call as the state.
//
// ============================================================================

#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
    history: HashMap<String, Vec<EventEnvelope<OrderEvent>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, order: Order, created: EventEnvelope<OrderEvent>) -> &Order {
        self.history
            .insert(order.order_number.to_string(), vec![created]);
        self.orders.push(order);
        &self.orders[self.orders.len() - 1]
    }

    /// Replace the state of an existing order and extend its history
    pub fn commit(
        &mut self,
        order: Order,
        events: Vec<EventEnvelope<OrderEvent>>,
    ) -> Option<&Order> {
        let index = self
            .orders
            .iter()
            .position(|o| o.order_number == order.order_number)?;
        self.history
            .entry(order.order_number.to_string())
            .or_default()
            .extend(events);
        self.orders[index] = order;
        Some(&self.orders[index])
    }

    /// Exact order-number match
    pub fn find(&self, order_number: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_number == *order_number)
    }

    pub fn history(&self, order_number: &str) -> Option<&[EventEnvelope<OrderEvent>]> {
        self.history.get(order_number).map(Vec::as_slice)
    }

    pub fn contains(&self, order_number: &str) -> bool {
        self.find(order_number).is_some()
    }

    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{
        OrderCarInfo, OrderCommand, OrderCommandHandler, OrderCreationData, OrderNumber,
        OrderStatus, TransitionPolicy,
    };
    use crate::event_sourcing::Aggregate;

    fn order(number: &str) -> (Order, EventEnvelope<OrderEvent>) {
        let data = OrderCreationData {
            account_id: "user3".to_string(),
            account_name: "Alice Wonderland".to_string(),
            account_email: "alice.w@example.com".to_string(),
            store_id: "store3".to_string(),
            store_name: "ZYBERION South Bay Gallery".to_string(),
            car_info: OrderCarInfo {
                model_id: "truck_z3".to_string(),
                model_name: "Zyberion Truck Z3".to_string(),
                base_price: 75000.0,
                selected_equipment: vec![],
                total_price: 75000.0,
            },
            loan_required: false,
            loan_info: None,
            total_order_amount: 75000.0,
        };
        Order::create(OrderNumber::parse(number).unwrap(), data, "admin").unwrap()
    }

    fn append(store: &mut OrderStore, number: &str) {
        let (order, created) = order(number);
        store.append(order, created);
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut store = OrderStore::new();
        assert_eq!(store.len(), 0);
        append(&mut store, "BBB-1000-1000-10000");
        append(&mut store, "AAA-1000-1000-10000");

        let numbers: Vec<&str> = store.all().iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["BBB-1000-1000-10000", "AAA-1000-1000-10000"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_is_exact() {
        let mut store = OrderStore::new();
        append(&mut store, "ABC-1234-5678-90123");

        assert!(store.find("ABC-1234-5678-90123").is_some());
        assert!(store.find("abc-1234-5678-90123").is_none());
        assert!(store.find("ABC-1234-5678-9012").is_none());
        assert!(!store.contains("ZZZ-0000-0000-00000"));
        assert!(store.history("ZZZ-0000-0000-00000").is_none());
    }

    #[test]
    fn test_commit_unknown_order_is_refused() {
        let mut store = OrderStore::new();
        let (order, _) = order("ABC-1234-5678-90123");

        assert!(store.commit(order, vec![]).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_history_replays_to_current_state() {
        let mut store = OrderStore::new();
        append(&mut store, "ABC-1234-5678-90123");

        for status in [OrderStatus::FinancialApprovalInProgress, OrderStatus::Cancelled] {
            let current = store.find("ABC-1234-5678-90123").unwrap();
            let command = OrderCommand::ChangeStatus {
                status,
                details: None,
                policy: TransitionPolicy::Permissive,
            };
            let (next, events) = OrderCommandHandler::execute(current, &command, "admin").unwrap();
            store.commit(next, events).unwrap();
        }

        let history = store.history("ABC-1234-5678-90123").unwrap();
        assert_eq!(history.len(), 3);
        let sequence: Vec<i64> = history.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3]);

        let (first, rest) = history.split_first().unwrap();
        let mut replayed = Order::apply_first_event(first).unwrap();
        for envelope in rest {
            replayed.apply_event(envelope).unwrap();
        }
        assert_eq!(&replayed, store.find("ABC-1234-5678-90123").unwrap());
    }
}
