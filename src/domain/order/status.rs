use serde::{Deserialize, Serialize};

use super::value_objects::OrderStatus;

// ============================================================================
// Status / Progress Rules
// ============================================================================

/// Progress shown for an order moving into `target`.
///
/// FinancialRejected keeps whatever progress the order already had.
pub fn progress_for(target: OrderStatus, current_progress: u8) -> u8 {
    match target {
        OrderStatus::Created => 10,
        OrderStatus::FinancialApprovalInProgress => 25,
        OrderStatus::FinancialApproved => 50,
        OrderStatus::FinancialRejected => current_progress,
        OrderStatus::VehicleDeliveryInProgress => 75,
        OrderStatus::Delivered => 90,
        OrderStatus::Finished => 100,
        OrderStatus::Cancelled => 0,
    }
}

/// How strictly generic status updates are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may follow any status
    #[default]
    Permissive,
    /// Only transitions listed in `OrderStatus::allowed_next` are accepted
    Strict,
}

impl TransitionPolicy {
    pub fn permits(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => from.can_transition_to(to),
        }
    }
}

impl OrderStatus {
    /// Forward transitions of the dealership workflow
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Created => &[FinancialApprovalInProgress, FinancialApproved, VehicleDeliveryInProgress, Cancelled],
            FinancialApprovalInProgress => &[FinancialApproved, FinancialRejected, Cancelled],
            FinancialApproved => &[VehicleDeliveryInProgress, Delivered, Cancelled],
            FinancialRejected => &[FinancialApprovalInProgress, Cancelled],
            VehicleDeliveryInProgress => &[Delivered, Cancelled],
            Delivered => &[Finished, Cancelled],
            Finished | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}
