use super::status::TransitionPolicy;
use super::value_objects::{FinancialApproval, OrderCreationData, OrderNumber, OrderStatus, VehicleDelivery};

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

#[derive(Debug, Clone)]
pub enum OrderCommand {
    CreateOrder {
        order_number: OrderNumber,
        data: OrderCreationData,
    },
    ChangeStatus {
        status: OrderStatus,
        details: Option<String>,
        policy: TransitionPolicy,
    },
    ApproveFinancials {
        approval: FinancialApproval,
    },
    RecordVehicleDelivery {
        delivery: VehicleDelivery,
    },
}
