// ============================================================================
// Actors Module
// ============================================================================
//
// The session lives inside a single actor for the lifetime of the process.
// HTTP handlers and startup code talk to it only through messages.
//
// ============================================================================

mod session_actor;

pub use session_actor::{
    AddOrder, ApproveFinancials, CurrentUser, FindOrder, FinishOrder, ListOrders, Login, Logout,
    OpenFinancialReview, OpenVehicleDelivery, OrderHistory, RecordVehicleDelivery, RejectFinancials,
    SessionActor, UpdateOrderStatus,
};
