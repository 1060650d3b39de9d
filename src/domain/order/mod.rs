// ============================================================================
// Order Domain - Business Logic for Order Aggregate
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderNumber, OrderStatus, loan/approval/delivery records)
// - Status rules (progress table, TransitionPolicy)
// - Events (OrderCreated, OrderStatusChanged, etc.)
// - Commands (CreateOrder, ChangeStatus, etc.)
// - Errors (OrderError enum)
// - Aggregate (Order with business logic)
// - Command Handler (OrderCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod status;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use status::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
