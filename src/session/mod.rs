pub mod auth;

pub use auth::{authenticate, AuthError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::User;
use crate::domain::order::{
    FinancialApproval, Order, OrderCommand, OrderCommandHandler, OrderCreationData, OrderError,
    OrderEvent, OrderNumber, OrderStatus, TransitionPolicy, VehicleDelivery,
};
use crate::event_sourcing::EventEnvelope;
use crate::store::OrderStore;

// ============================================================================
// App Session - current operator + owned order store
// ============================================================================
//
// One session per process. Every mutation goes through the order aggregate
// and is written back only on success.
//
// ============================================================================

/// Actor name recorded when nobody is logged in
pub const SYSTEM_ACTOR: &str = "System";

const MAX_ORDER_NUMBER_ATTEMPTS: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("User must be logged in to {action}.")]
    Unauthorized { action: &'static str },

    #[error("Order with number \"{0}\" not found.")]
    OrderNotFound(String),

    #[error("Could not allocate a unique order number after {0} attempts")]
    OrderNumbersExhausted(usize),

    #[error(transparent)]
    Order(#[from] OrderError),
}

pub struct AppSession {
    current_user: Option<&'static User>,
    store: OrderStore,
    policy: TransitionPolicy,
    rng: StdRng,
}

impl AppSession {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    /// Deterministic order numbers, for tests and demos
    pub fn with_seed(policy: TransitionPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: TransitionPolicy, rng: StdRng) -> Self {
        Self {
            current_user: None,
            store: OrderStore::new(),
            policy,
            rng,
        }
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    pub fn login(&mut self, username: &str, password: &str) -> Result<&'static User, AuthError> {
        match authenticate(username, password) {
            Ok(user) => {
                self.current_user = Some(user);
                tracing::info!(username = %user.username, "User logged in");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(username = %username.trim(), "Login rejected");
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            tracing::info!(username = %user.username, "User logged out");
        }
    }

    pub fn current_user(&self) -> Option<&'static User> {
        self.current_user
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Username of the operator, or "System" when logged out
    pub fn acting_user(&self) -> &'static str {
        self.current_user.map(|u| u.username).unwrap_or(SYSTEM_ACTOR)
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn orders(&self) -> &[Order] {
        self.store.all()
    }

    pub fn find_order(&self, order_number: &str) -> Option<&Order> {
        let found = self.store.find(order_number);
        tracing::debug!(order_number = %order_number, found = found.is_some(), "Order lookup");
        found
    }

    /// Every event applied to the order, oldest first
    pub fn order_history(&self, order_number: &str) -> Option<&[EventEnvelope<OrderEvent>]> {
        self.store.history(order_number)
    }

    // ========================================================================
    // Lifecycle Operations
    // ========================================================================

    pub fn add_order(&mut self, data: OrderCreationData) -> Result<&Order, SessionError> {
        let user = self.require_user("create an order")?;
        let order_number = self.next_order_number()?;

        let (order, created) = Order::create(order_number, data, user.username)?;

        tracing::info!(
            order_number = %order.order_number,
            account_id = %order.account_id,
            total = order.total_order_amount,
            loan_required = order.loan_required,
            event_id = %created.event_id,
            orders = self.store.len() + 1,
            "Order created"
        );

        Ok(self.store.append(order, created))
    }

    /// `actor` is recorded as given; blank falls back to "System"
    pub fn update_order_status(
        &mut self,
        order_number: &str,
        status: OrderStatus,
        actor: &str,
        details: Option<String>,
    ) -> Result<&Order, SessionError> {
        let actor = match actor.trim() {
            "" => SYSTEM_ACTOR.to_string(),
            name => name.to_string(),
        };
        let command = OrderCommand::ChangeStatus {
            status,
            details,
            policy: self.policy,
        };

        self.execute(order_number, command, &actor)
    }

    pub fn update_order_financial_approval(
        &mut self,
        order_number: &str,
        approval: FinancialApproval,
    ) -> Result<&Order, SessionError> {
        self.ensure_exists(order_number)?;
        let user = self.require_user("approve financials")?;

        self.execute(order_number, OrderCommand::ApproveFinancials { approval }, user.username)
    }

    pub fn update_order_vehicle_delivery(
        &mut self,
        order_number: &str,
        delivery: VehicleDelivery,
    ) -> Result<&Order, SessionError> {
        self.ensure_exists(order_number)?;
        let user = self.require_user("record a vehicle delivery")?;

        self.execute(order_number, OrderCommand::RecordVehicleDelivery { delivery }, user.username)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_user(&self, action: &'static str) -> Result<&'static User, SessionError> {
        self.current_user.ok_or_else(|| {
            tracing::warn!(action, "Rejected operation: no user logged in");
            SessionError::Unauthorized { action }
        })
    }

    fn ensure_exists(&self, order_number: &str) -> Result<(), SessionError> {
        if self.store.contains(order_number) {
            Ok(())
        } else {
            tracing::warn!(order_number = %order_number, "Order not found");
            Err(SessionError::OrderNotFound(order_number.to_string()))
        }
    }

    fn next_order_number(&mut self) -> Result<OrderNumber, SessionError> {
        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let candidate = OrderNumber::generate(&mut self.rng);
            if !self.store.contains(candidate.as_str()) {
                return Ok(candidate);
            }
            tracing::debug!(order_number = %candidate, "Order number collision, regenerating");
        }
        Err(SessionError::OrderNumbersExhausted(MAX_ORDER_NUMBER_ATTEMPTS))
    }

    fn execute(
        &mut self,
        order_number: &str,
        command: OrderCommand,
        user: &str,
    ) -> Result<&Order, SessionError> {
        let current = self
            .store
            .find(order_number)
            .ok_or_else(|| SessionError::OrderNotFound(order_number.to_string()))?;

        let (next, envelopes) = OrderCommandHandler::execute(current, &command, user).map_err(|e| {
            tracing::warn!(order_number = %order_number, error = %e, "Order command rejected");
            e
        })?;

        for envelope in &envelopes {
            tracing::info!(
                order_number = %order_number,
                event_type = %envelope.event_type,
                status = ?next.status,
                progress = next.progress,
                user = %envelope.user,
                "Order updated"
            );
        }

        self.store
            .commit(next, envelopes)
            .ok_or_else(|| SessionError::OrderNotFound(order_number.to_string()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
