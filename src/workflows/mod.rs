pub mod delivery;
pub mod financial;

pub use delivery::{DeliveryForm, DeliveryReview, VehicleDeliveryDesk};
pub use financial::{ApprovalForm, FinancialApprovalDesk, FinancialReview};

use crate::domain::order::{Order, OrderNumber, OrderNumberError, OrderStatus};
use crate::session::{AppSession, SessionError};

// ============================================================================
// Order Lookup Screens
// ============================================================================
//
// Search-driven desks layered over the session: find an order by number,
// check that it is in the right state for the desk, then drive it forward.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidOrderNumber(#[from] OrderNumberError),

    #[error("Order with number \"{0}\" not found.")]
    NotFound(String),

    #[error("Order {0} does not require a loan.")]
    LoanNotRequired(String),

    #[error("Order {order_number} is not awaiting financial approval (Status: {status}).")]
    NotAwaitingApproval {
        order_number: String,
        status: OrderStatus,
    },

    #[error("Order {order_number} is not ready for vehicle delivery (Status: {status}). It must be Financially Approved.")]
    NotReadyForDelivery {
        order_number: String,
        status: OrderStatus,
    },

    #[error("All approval fields (Amount, Interest, Duration) must be positive values.")]
    NonPositiveApproval,

    #[error("VIN and Manufacture Date are required.")]
    MissingVehicleData,

    #[error("Order {order_number} cannot be finished (Status: {status}). The vehicle must be Delivered.")]
    NotDelivered {
        order_number: String,
        status: OrderStatus,
    },

    #[error("Order {0} has no recorded vehicle delivery.")]
    NoDeliveryRecorded(String),

    #[error("User must be logged in.")]
    NotLoggedIn,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Normalize search input into a well-formed order number
pub fn parse_order_number(input: &str) -> Result<OrderNumber, WorkflowError> {
    Ok(OrderNumber::parse(input)?)
}

pub struct OrderLookup;

impl OrderLookup {
    pub fn search<'a>(session: &'a AppSession, input: &str) -> Result<&'a Order, WorkflowError> {
        let number = parse_order_number(input)?;
        session
            .find_order(number.as_str())
            .ok_or_else(|| WorkflowError::NotFound(number.to_string()))
    }
}
