use serde::{Deserialize, Serialize};

use crate::event_sourcing::core::DomainEvent;
use super::value_objects::{
    FinancialApproval, OrderCreationData, OrderNumber, OrderStatus, VehicleDelivery,
};

// ============================================================================
// Order Events - Domain Events for Order Aggregate
// ============================================================================

/// Order Event - Union type for all order events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Created(OrderCreated),
    StatusChanged(OrderStatusChanged),
    FinancialsApproved(OrderFinancialsApproved),
    VehicleDelivered(OrderVehicleDelivered),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "OrderCreated",
            OrderEvent::StatusChanged(_) => "OrderStatusChanged",
            OrderEvent::FinancialsApproved(_) => "OrderFinancialsApproved",
            OrderEvent::VehicleDelivered(_) => "OrderVehicleDelivered",
        }
    }
}

impl OrderEvent {
    /// Action text recorded in the audit log
    pub fn audit_action(&self) -> String {
        match self {
            OrderEvent::Created(_) => "Order Created".to_string(),
            OrderEvent::StatusChanged(e) => format!("Status changed to {}", e.to),
            OrderEvent::FinancialsApproved(_) => "Financials Approved".to_string(),
            OrderEvent::VehicleDelivered(_) => "Vehicle Associated/Delivered".to_string(),
        }
    }

    pub fn audit_details(&self) -> Option<String> {
        match self {
            OrderEvent::Created(e) => Some(format!("Total: {}", e.data.total_order_amount)),
            OrderEvent::StatusChanged(e) => Some(
                e.details
                    .clone()
                    .unwrap_or_else(|| format!("Progress: {}%", e.progress)),
            ),
            OrderEvent::FinancialsApproved(e) => Some(format!(
                "Amount: {}, Rate: {}%, Term: {}yrs",
                e.approval.approved_amount,
                e.approval.approved_interest,
                e.approval.approved_duration
            )),
            OrderEvent::VehicleDelivered(e) => Some(format!(
                "VIN: {}, Mfg Date: {}",
                e.delivery.vin, e.delivery.manufacture_date
            )),
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Order Created - Initial event in order lifecycle
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderCreated {
    pub order_number: OrderNumber,
    pub data: OrderCreationData,
}

/// Order Status Changed - generic lifecycle move
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderStatusChanged {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub progress: u8,
    pub details: Option<String>,
}

/// Order Financials Approved - loan terms granted
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderFinancialsApproved {
    pub approval: FinancialApproval,
}

/// Order Vehicle Delivered - vehicle associated with the order
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderVehicleDelivered {
    pub delivery: VehicleDelivery,
}
