use actix::prelude::*;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::User;
use crate::domain::order::{Order, OrderCreationData, OrderEvent, OrderStatus};
use crate::event_sourcing::EventEnvelope;
use crate::metrics::Metrics;
use crate::session::{AppSession, AuthError, SessionError};
use crate::workflows::{
    ApprovalForm, DeliveryForm, DeliveryReview, FinancialApprovalDesk, FinancialReview,
    OrderLookup, VehicleDeliveryDesk, WorkflowError,
};

// ============================================================================
// Actor Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<&'static User, AuthError>")]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Logout;

#[derive(Message)]
#[rtype(result = "Option<&'static User>")]
pub struct CurrentUser;

#[derive(Message)]
#[rtype(result = "Vec<Order>")]
pub struct ListOrders;

/// Normalizing lookup by order number
#[derive(Message)]
#[rtype(result = "Result<Order, WorkflowError>")]
pub struct FindOrder {
    pub order_number: String,
}

/// Event envelopes behind an order, oldest first
#[derive(Message)]
#[rtype(result = "Result<Vec<EventEnvelope<OrderEvent>>, WorkflowError>")]
pub struct OrderHistory {
    pub order_number: String,
}

#[derive(Message)]
#[rtype(result = "Result<Order, SessionError>")]
pub struct AddOrder {
    pub data: OrderCreationData,
}

/// Requires a logged-in user; `actor: None` records that user
#[derive(Message)]
#[rtype(result = "Result<Order, SessionError>")]
pub struct UpdateOrderStatus {
    pub order_number: String,
    pub status: OrderStatus,
    pub actor: Option<String>,
    pub details: Option<String>,
}

#[derive(Message)]
#[rtype(result = "Result<FinancialReview, WorkflowError>")]
pub struct OpenFinancialReview {
    pub order_number: String,
}

#[derive(Message)]
#[rtype(result = "Result<Order, WorkflowError>")]
pub struct ApproveFinancials {
    pub order_number: String,
    pub form: ApprovalForm,
}

#[derive(Message)]
#[rtype(result = "Result<Order, WorkflowError>")]
pub struct RejectFinancials {
    pub order_number: String,
    pub notes: Option<String>,
}

#[derive(Message)]
#[rtype(result = "Result<DeliveryReview, WorkflowError>")]
pub struct OpenVehicleDelivery {
    pub order_number: String,
}

#[derive(Message)]
#[rtype(result = "Result<Order, WorkflowError>")]
pub struct RecordVehicleDelivery {
    pub order_number: String,
    pub form: DeliveryForm,
}

#[derive(Message)]
#[rtype(result = "Result<Order, WorkflowError>")]
pub struct FinishOrder {
    pub order_number: String,
}

// ============================================================================
// Session Actor - sole owner of the AppSession
// ============================================================================
//
// Messages are handled one at a time, so every lifecycle operation sees a
// consistent store without locking.
//
// ============================================================================

pub struct SessionActor {
    session: AppSession,
    metrics: Arc<Metrics>,
}

impl SessionActor {
    pub fn new(session: AppSession, metrics: Arc<Metrics>) -> Self {
        Self { session, metrics }
    }

    /// Record outcome + latency of one operation and hand the result back
    fn observe<T, E>(&self, operation: &str, started: Instant, result: Result<T, E>) -> Result<T, E> {
        self.metrics
            .record_operation(operation, started.elapsed().as_secs_f64(), result.is_ok());
        result
    }
}

impl Actor for SessionActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.metrics.orders_in_store.set(self.session.orders().len() as i64);
        tracing::info!(
            orders = self.session.orders().len(),
            policy = ?self.session.policy(),
            "SessionActor started"
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(orders = self.session.orders().len(), "SessionActor stopped, discarding session");
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Handler<Login> for SessionActor {
    type Result = Result<&'static User, AuthError>;

    fn handle(&mut self, msg: Login, _: &mut Self::Context) -> Self::Result {
        let result = self.session.login(&msg.username, &msg.password);
        self.metrics.record_login(result.is_ok());
        result
    }
}

impl Handler<Logout> for SessionActor {
    type Result = ();

    fn handle(&mut self, _: Logout, _: &mut Self::Context) -> Self::Result {
        self.session.logout();
    }
}

impl Handler<CurrentUser> for SessionActor {
    type Result = MessageResult<CurrentUser>;

    fn handle(&mut self, _: CurrentUser, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.session.current_user())
    }
}

impl Handler<ListOrders> for SessionActor {
    type Result = MessageResult<ListOrders>;

    fn handle(&mut self, _: ListOrders, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.session.orders().to_vec())
    }
}

impl Handler<FindOrder> for SessionActor {
    type Result = Result<Order, WorkflowError>;

    fn handle(&mut self, msg: FindOrder, _: &mut Self::Context) -> Self::Result {
        OrderLookup::search(&self.session, &msg.order_number).cloned()
    }
}

impl Handler<OrderHistory> for SessionActor {
    type Result = Result<Vec<EventEnvelope<OrderEvent>>, WorkflowError>;

    fn handle(&mut self, msg: OrderHistory, _: &mut Self::Context) -> Self::Result {
        let order = OrderLookup::search(&self.session, &msg.order_number)?;
        let number = order.order_number.to_string();
        self.session
            .order_history(&number)
            .map(<[_]>::to_vec)
            .ok_or(WorkflowError::NotFound(number))
    }
}

impl Handler<AddOrder> for SessionActor {
    type Result = Result<Order, SessionError>;

    fn handle(&mut self, msg: AddOrder, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = self.session.add_order(msg.data).map(|o| o.clone());
        if result.is_ok() {
            self.metrics.record_order_created(self.session.orders().len());
        }
        self.observe("add_order", started, result)
    }
}

impl Handler<UpdateOrderStatus> for SessionActor {
    type Result = Result<Order, SessionError>;

    fn handle(&mut self, msg: UpdateOrderStatus, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let Some(user) = self.session.current_user() else {
            tracing::warn!(order_number = %msg.order_number, "Status update rejected: no user logged in");
            let rejected = Err(SessionError::Unauthorized { action: "update an order status" });
            return self.observe("update_status", started, rejected);
        };
        let actor = msg.actor.unwrap_or_else(|| user.username.to_string());
        let result = self
            .session
            .update_order_status(&msg.order_number, msg.status, &actor, msg.details)
            .map(|o| o.clone());
        self.observe("update_status", started, result)
    }
}

impl Handler<OpenFinancialReview> for SessionActor {
    type Result = Result<FinancialReview, WorkflowError>;

    fn handle(&mut self, msg: OpenFinancialReview, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = FinancialApprovalDesk::open(&mut self.session, &msg.order_number);
        self.observe("financial_review", started, result)
    }
}

impl Handler<ApproveFinancials> for SessionActor {
    type Result = Result<Order, WorkflowError>;

    fn handle(&mut self, msg: ApproveFinancials, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = FinancialApprovalDesk::approve(&mut self.session, &msg.order_number, msg.form);
        self.observe("financial_approval", started, result)
    }
}

impl Handler<RejectFinancials> for SessionActor {
    type Result = Result<Order, WorkflowError>;

    fn handle(&mut self, msg: RejectFinancials, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = FinancialApprovalDesk::reject(
            &mut self.session,
            &msg.order_number,
            msg.notes.as_deref(),
        );
        self.observe("financial_rejection", started, result)
    }
}

impl Handler<OpenVehicleDelivery> for SessionActor {
    type Result = Result<DeliveryReview, WorkflowError>;

    fn handle(&mut self, msg: OpenVehicleDelivery, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = VehicleDeliveryDesk::open(&mut self.session, &msg.order_number);
        self.observe("delivery_review", started, result)
    }
}

impl Handler<RecordVehicleDelivery> for SessionActor {
    type Result = Result<Order, WorkflowError>;

    fn handle(&mut self, msg: RecordVehicleDelivery, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = VehicleDeliveryDesk::record(&mut self.session, &msg.order_number, msg.form);
        self.observe("vehicle_delivery", started, result)
    }
}

impl Handler<FinishOrder> for SessionActor {
    type Result = Result<Order, WorkflowError>;

    fn handle(&mut self, msg: FinishOrder, _: &mut Self::Context) -> Self::Result {
        let started = Instant::now();
        let result = VehicleDeliveryDesk::finish(&mut self.session, &msg.order_number);
        self.observe("finish", started, result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderCarInfo, TransitionPolicy};

    fn start() -> (Addr<SessionActor>, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new().unwrap());
        let session = AppSession::with_seed(TransitionPolicy::Permissive, 9);
        (SessionActor::new(session, metrics.clone()).start(), metrics)
    }

    fn creation_data() -> OrderCreationData {
        OrderCreationData {
            account_id: "user1".to_string(),
            account_name: "John Doe".to_string(),
            account_email: "john.doe@example.com".to_string(),
            store_id: "store1".to_string(),
            store_name: "ZYBERION Flagship Centralis".to_string(),
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
        }
    }

    async fn login(addr: &Addr<SessionActor>) {
        addr.send(Login {
            username: "admin".to_string(),
            password: "admin".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    }

    #[actix::test]
    async fn test_add_order_requires_login() {
        let (addr, _) = start();

        let result = addr.send(AddOrder { data: creation_data() }).await.unwrap();
        assert!(matches!(result, Err(SessionError::Unauthorized { .. })));

        let orders = addr.send(ListOrders).await.unwrap();
        assert!(orders.is_empty());
    }

    #[actix::test]
    async fn test_login_tracks_current_user() {
        let (addr, metrics) = start();

        let rejected = addr
            .send(Login { username: "admin".to_string(), password: "x".to_string() })
            .await
            .unwrap();
        assert_eq!(rejected, Err(AuthError::InvalidCredentials));

        login(&addr).await;
        let user = addr.send(CurrentUser).await.unwrap().unwrap();
        assert_eq!(user.username, "admin");

        addr.send(Logout).await.unwrap();
        assert!(addr.send(CurrentUser).await.unwrap().is_none());

        let gathered = metrics.registry().gather();
        let logins = gathered.iter().find(|m| m.name() == "login_attempts_total").unwrap();
        assert_eq!(logins.metric.len(), 2);
    }

    #[actix::test]
    async fn test_order_lifecycle_through_messages() {
        let (addr, metrics) = start();
        login(&addr).await;

        let order = addr.send(AddOrder { data: creation_data() }).await.unwrap().unwrap();
        let number = order.order_number.to_string();

        let found = addr
            .send(FindOrder { order_number: number.to_lowercase() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.order_number, order.order_number);

        let updated = addr
            .send(UpdateOrderStatus {
                order_number: number.clone(),
                status: OrderStatus::Cancelled,
                actor: None,
                details: Some("Customer withdrew".to_string()),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.progress, 0);
        assert_eq!(updated.audit_log.last().unwrap().user, "admin");

        assert_eq!(metrics.orders_created.get(), 1);
        assert_eq!(metrics.orders_in_store.get(), 1);
    }

    #[actix::test]
    async fn test_status_update_requires_login() {
        let (addr, _) = start();
        login(&addr).await;
        let order = addr.send(AddOrder { data: creation_data() }).await.unwrap().unwrap();
        addr.send(Logout).await.unwrap();

        let result = addr
            .send(UpdateOrderStatus {
                order_number: order.order_number.to_string(),
                status: OrderStatus::Finished,
                actor: Some("admin".to_string()),
                details: None,
            })
            .await
            .unwrap();
        assert!(matches!(result, Err(SessionError::Unauthorized { .. })));

        let orders = addr.send(ListOrders).await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::Created);
        assert_eq!(orders[0].audit_log.len(), 1);
    }

    #[actix::test]
    async fn test_order_history_follows_audit_log() {
        let (addr, _) = start();
        login(&addr).await;
        let order = addr.send(AddOrder { data: creation_data() }).await.unwrap().unwrap();
        let number = order.order_number.to_string();
        addr.send(UpdateOrderStatus {
            order_number: number.clone(),
            status: OrderStatus::Cancelled,
            actor: None,
            details: None,
        })
        .await
        .unwrap()
        .unwrap();

        let history = addr
            .send(OrderHistory { order_number: number.to_lowercase() })
            .await
            .unwrap()
            .unwrap();
        let types: Vec<&str> = history.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["OrderCreated", "OrderStatusChanged"]);

        let missing = addr
            .send(OrderHistory { order_number: "ZZZ-0000-0000-00000".to_string() })
            .await
            .unwrap();
        assert!(matches!(missing, Err(WorkflowError::NotFound(_))));
    }

    #[actix::test]
    async fn test_unknown_order_is_reported() {
        let (addr, _) = start();
        login(&addr).await;

        let result = addr
            .send(ApproveFinancials {
                order_number: "ZZZ-0000-0000-00000".to_string(),
                form: ApprovalForm {
                    approved_amount: 10.0,
                    approved_interest: 1.0,
                    approved_duration: 1,
                    notes: None,
                },
            })
            .await
            .unwrap();
        assert!(matches!(result, Err(WorkflowError::NotFound(_))));
        assert!(addr.send(ListOrders).await.unwrap().is_empty());
    }
}
