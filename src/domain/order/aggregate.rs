use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_sourcing::core::{Aggregate, EventEnvelope};
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::*;
use super::status::progress_for;
use super::value_objects::{
    AuditLogEntry, FinancialApproval, OrderCarInfo, OrderCreationData, OrderLoanInfo,
    OrderNumber, OrderStatus, VehicleDelivery,
};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity
    pub order_number: OrderNumber,
    pub version: i64,

    // Account & store
    pub account_id: String,
    pub account_name: String,
    pub account_email: String,
    pub store_id: String,
    pub store_name: String,

    // Purchase
    pub car_info: OrderCarInfo,
    pub loan_required: bool,
    pub loan_info: Option<OrderLoanInfo>,
    pub total_order_amount: f64,

    // Lifecycle
    pub status: OrderStatus,
    pub progress: u8,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub audit_log: Vec<AuditLogEntry>,

    // Optional fields
    pub financial_approval: Option<FinancialApproval>,
    pub vehicle_delivery: Option<VehicleDelivery>,
}

impl Order {
    /// Validate creation data and build the new order from its first event
    pub fn create(
        order_number: OrderNumber,
        data: OrderCreationData,
        created_by: &str,
    ) -> Result<(Self, EventEnvelope<OrderEvent>), OrderError> {
        Self::validate_creation(&data)?;

        let aggregate_id = order_number.to_string();
        let envelope = EventEnvelope::new(
            aggregate_id,
            1,
            OrderEvent::Created(OrderCreated { order_number, data }),
            created_by,
        );
        let order = Self::apply_first_event(&envelope)?;
        Ok((order, envelope))
    }

    /// Field presence only; pricing and loan bounds are checked by the wizard
    fn validate_creation(data: &OrderCreationData) -> Result<(), OrderError> {
        let required = [
            ("account_id", &data.account_id),
            ("account_name", &data.account_name),
            ("account_email", &data.account_email),
            ("store_id", &data.store_id),
            ("store_name", &data.store_name),
            ("car_info.model_id", &data.car_info.model_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(OrderError::MissingField(field));
            }
        }
        Ok(())
    }

    fn audit_entry(envelope: &EventEnvelope<OrderEvent>) -> AuditLogEntry {
        AuditLogEntry {
            id: envelope.event_id,
            timestamp: envelope.timestamp,
            action: envelope.event_data.audit_action(),
            user: envelope.user.clone(),
            details: envelope.event_data.audit_details(),
        }
    }

    fn validate_delivery(delivery: &VehicleDelivery) -> Result<(), OrderError> {
        if delivery.vin.trim().is_empty() {
            return Err(OrderError::MissingField("vin"));
        }
        Ok(())
    }
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for Order {
    type Event = OrderEvent;
    type Command = OrderCommand;
    type Error = OrderError;

    fn apply_first_event(envelope: &EventEnvelope<Self::Event>) -> Result<Self, Self::Error> {
        match &envelope.event_data {
            OrderEvent::Created(e) => {
                let data = e.data.clone();
                // Loan details only survive when a loan was asked for
                let loan_info = if data.loan_required { data.loan_info } else { None };

                Ok(Self {
                    order_number: e.order_number.clone(),
                    version: envelope.sequence_number,
                    account_id: data.account_id,
                    account_name: data.account_name,
                    account_email: data.account_email,
                    store_id: data.store_id,
                    store_name: data.store_name,
                    car_info: data.car_info,
                    loan_required: data.loan_required,
                    loan_info,
                    total_order_amount: data.total_order_amount,
                    status: OrderStatus::Created,
                    progress: progress_for(OrderStatus::Created, 0),
                    created_at: envelope.timestamp,
                    created_by: envelope.user.clone(),
                    updated_at: None,
                    audit_log: vec![Self::audit_entry(envelope)],
                    financial_approval: None,
                    vehicle_delivery: None,
                })
            }
            _ => Err(OrderError::NotInitialized),
        }
    }

    fn apply_event(&mut self, envelope: &EventEnvelope<Self::Event>) -> Result<(), Self::Error> {
        match &envelope.event_data {
            OrderEvent::Created(_) => return Err(OrderError::AlreadyCreated),
            OrderEvent::StatusChanged(e) => {
                self.status = e.to;
                self.progress = e.progress;
            }
            OrderEvent::FinancialsApproved(e) => {
                if let Some(loan) = self.loan_info.as_mut() {
                    loan.approved_amount = Some(e.approval.approved_amount);
                }
                self.financial_approval = Some(e.approval.clone());
                self.status = OrderStatus::FinancialApproved;
                self.progress = progress_for(OrderStatus::FinancialApproved, self.progress);
            }
            OrderEvent::VehicleDelivered(e) => {
                self.vehicle_delivery = Some(e.delivery.clone());
                self.status = OrderStatus::Delivered;
                self.progress = progress_for(OrderStatus::Delivered, self.progress);
            }
        }

        self.updated_at = Some(envelope.timestamp);
        self.audit_log.push(Self::audit_entry(envelope));
        self.version = envelope.sequence_number;
        Ok(())
    }

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::CreateOrder { .. } => Err(OrderError::AlreadyCreated),

            OrderCommand::ChangeStatus { status, details, policy } => {
                if !policy.permits(self.status, *status) {
                    return Err(OrderError::InvalidStatusTransition {
                        from: self.status,
                        to: *status,
                    });
                }

                Ok(vec![OrderEvent::StatusChanged(OrderStatusChanged {
                    from: self.status,
                    to: *status,
                    progress: progress_for(*status, self.progress),
                    details: details.clone(),
                })])
            }

            // Forced transitions: accepted from any prior status
            OrderCommand::ApproveFinancials { approval } => {
                Ok(vec![OrderEvent::FinancialsApproved(OrderFinancialsApproved {
                    approval: approval.clone(),
                })])
            }

            OrderCommand::RecordVehicleDelivery { delivery } => {
                Self::validate_delivery(delivery)?;

                Ok(vec![OrderEvent::VehicleDelivered(OrderVehicleDelivered {
                    delivery: delivery.clone(),
                })])
            }
        }
    }

    fn aggregate_id(&self) -> &str {
        self.order_number.as_str()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::status::TransitionPolicy;
    use crate::domain::order::value_objects::EquipmentItem;
    use chrono::NaiveDate;

    fn number() -> OrderNumber {
        OrderNumber::parse("ABC-1234-5678-90123").unwrap()
    }

    fn creation_data(loan_required: bool) -> OrderCreationData {
        OrderCreationData {
            account_id: "user1".to_string(),
            account_name: "John Doe".to_string(),
            account_email: "john.doe@example.com".to_string(),
            store_id: "store1".to_string(),
            store_name: "ZYBERION Flagship Centralis".to_string(),
            car_info: OrderCarInfo {
                model_id: "sedan_x1".to_string(),
                model_name: "Zyberion Sedan X1".to_string(),
                base_price: 45000.0,
                selected_equipment: vec![EquipmentItem {
                    id: "eq1".to_string(),
                    name: "Premium Sound System".to_string(),
                    price: 1800.0,
                }],
                total_price: 46800.0,
            },
            loan_required,
            loan_info: Some(OrderLoanInfo {
                bank_id: "bank1".to_string(),
                bank_name: "Global Investment Bank".to_string(),
                plan_id: "b1p1".to_string(),
                plan_name: "Standard 3yr @ 3.5%".to_string(),
                requested_amount: 30000.0,
                interest_rate: 3.5,
                term_years: 3,
                approved_amount: None,
            }),
            total_order_amount: 46800.0,
        }
    }

    fn approval() -> FinancialApproval {
        FinancialApproval {
            approved_interest: 3.2,
            approved_duration: 3,
            approved_amount: 28000.0,
            approved_by: "admin".to_string(),
            approved_at: Utc::now(),
            notes: None,
        }
    }

    fn delivery() -> VehicleDelivery {
        VehicleDelivery {
            vin: "U0180152025055688".to_string(),
            manufacture_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            delivery_date: None,
            notes: None,
        }
    }

    fn apply(order: &mut Order, command: OrderCommand) -> Vec<EventEnvelope<OrderEvent>> {
        let events = order.handle_command(&command).unwrap();
        let mut envelopes = Vec::new();
        for event in events {
            let envelope = EventEnvelope::new(order.aggregate_id(), order.version() + 1, event, "admin");
            order.apply_event(&envelope).unwrap();
            envelopes.push(envelope);
        }
        envelopes
    }

    #[test]
    fn test_create_order_initial_state() {
        let (order, envelope) = Order::create(number(), creation_data(true), "admin").unwrap();

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.progress, 10);
        assert_eq!(order.version, 1);
        assert_eq!(order.created_by, "admin");
        assert_eq!(order.audit_log.len(), 1);
        assert_eq!(order.audit_log[0].action, "Order Created");
        assert_eq!(order.audit_log[0].details.as_deref(), Some("Total: 46800"));
        assert_eq!(order.audit_log[0].id, envelope.event_id);
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn test_create_without_loan_drops_loan_info() {
        let (order, _) = Order::create(number(), creation_data(false), "admin").unwrap();
        assert!(!order.loan_required);
        assert!(order.loan_info.is_none());
    }

    #[test]
    fn test_create_requires_account() {
        let mut data = creation_data(false);
        data.account_id = "  ".to_string();

        let result = Order::create(number(), data, "admin");
        assert_eq!(result.unwrap_err(), OrderError::MissingField("account_id"));
    }

    #[test]
    fn test_status_change_appends_one_entry() {
        let (mut order, _) = Order::create(number(), creation_data(true), "admin").unwrap();

        apply(&mut order, OrderCommand::ChangeStatus {
            status: OrderStatus::FinancialApprovalInProgress,
            details: None,
            policy: TransitionPolicy::Permissive,
        });

        assert_eq!(order.status, OrderStatus::FinancialApprovalInProgress);
        assert_eq!(order.progress, 25);
        assert_eq!(order.audit_log.len(), 2);
        assert_eq!(order.audit_log[1].action, "Status changed to Financial Approval In Progress");
        assert_eq!(order.audit_log[1].details.as_deref(), Some("Progress: 25%"));
        assert!(order.updated_at.is_some());
    }

    #[test]
    fn test_rejection_keeps_progress() {
        let (mut order, _) = Order::create(number(), creation_data(true), "admin").unwrap();
        apply(&mut order, OrderCommand::ChangeStatus {
            status: OrderStatus::FinancialApprovalInProgress,
            details: None,
            policy: TransitionPolicy::Permissive,
        });
        apply(&mut order, OrderCommand::ChangeStatus {
            status: OrderStatus::FinancialRejected,
            details: Some("Financials rejected. Notes: No notes".to_string()),
            policy: TransitionPolicy::Permissive,
        });

        assert_eq!(order.status, OrderStatus::FinancialRejected);
        assert_eq!(order.progress, 25);
        assert_eq!(
            order.audit_log.last().unwrap().details.as_deref(),
            Some("Financials rejected. Notes: No notes")
        );
    }

    #[test]
    fn test_strict_policy_rejects_skipping() {
        let (order, _) = Order::create(number(), creation_data(true), "admin").unwrap();

        let result = order.handle_command(&OrderCommand::ChangeStatus {
            status: OrderStatus::Finished,
            details: None,
            policy: TransitionPolicy::Strict,
        });

        assert_eq!(
            result.unwrap_err(),
            OrderError::InvalidStatusTransition {
                from: OrderStatus::Created,
                to: OrderStatus::Finished,
            }
        );
    }

    #[test]
    fn test_approval_propagates_amount_to_loan() {
        let (mut order, _) = Order::create(number(), creation_data(true), "admin").unwrap();
        apply(&mut order, OrderCommand::ApproveFinancials { approval: approval() });

        assert_eq!(order.status, OrderStatus::FinancialApproved);
        assert_eq!(order.progress, 50);
        assert_eq!(order.loan_info.as_ref().unwrap().approved_amount, Some(28000.0));
        assert_eq!(
            order.audit_log.last().unwrap().details.as_deref(),
            Some("Amount: 28000, Rate: 3.2%, Term: 3yrs")
        );
    }

    #[test]
    fn test_approval_from_any_status() {
        let (mut order, _) = Order::create(number(), creation_data(false), "admin").unwrap();
        apply(&mut order, OrderCommand::ChangeStatus {
            status: OrderStatus::Cancelled,
            details: None,
            policy: TransitionPolicy::Permissive,
        });
        apply(&mut order, OrderCommand::ApproveFinancials { approval: approval() });

        assert_eq!(order.status, OrderStatus::FinancialApproved);
        assert_eq!(order.progress, 50);
        assert!(order.loan_info.is_none());
    }

    #[test]
    fn test_delivery_sets_vehicle() {
        let (mut order, _) = Order::create(number(), creation_data(true), "admin").unwrap();
        apply(&mut order, OrderCommand::RecordVehicleDelivery { delivery: delivery() });

        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.progress, 90);
        assert_eq!(order.vehicle_delivery.as_ref().unwrap().vin, "U0180152025055688");
        assert_eq!(
            order.audit_log.last().unwrap().details.as_deref(),
            Some("VIN: U0180152025055688, Mfg Date: 2025-03-14")
        );
    }

    #[test]
    fn test_delivery_requires_vin() {
        let (order, _) = Order::create(number(), creation_data(true), "admin").unwrap();
        let mut blank = delivery();
        blank.vin = String::new();

        let result = order.handle_command(&OrderCommand::RecordVehicleDelivery { delivery: blank });
        assert_eq!(result.unwrap_err(), OrderError::MissingField("vin"));
    }

    #[test]
    fn test_create_command_on_existing_order_fails() {
        let (order, _) = Order::create(number(), creation_data(false), "admin").unwrap();
        let result = order.handle_command(&OrderCommand::CreateOrder {
            order_number: number(),
            data: creation_data(false),
        });
        assert_eq!(result.unwrap_err(), OrderError::AlreadyCreated);
    }

    #[test]
    fn test_replay_reproduces_live_state() {
        let (mut order, created) = Order::create(number(), creation_data(true), "admin").unwrap();
        let mut history = vec![created];
        history.extend(apply(&mut order, OrderCommand::ChangeStatus {
            status: OrderStatus::FinancialApprovalInProgress,
            details: Some("Financial review started.".to_string()),
            policy: TransitionPolicy::Permissive,
        }));
        history.extend(apply(&mut order, OrderCommand::ApproveFinancials { approval: approval() }));
        history.extend(apply(&mut order, OrderCommand::RecordVehicleDelivery { delivery: delivery() }));

        let (first, rest) = history.split_first().unwrap();
        let mut replayed = Order::apply_first_event(first).unwrap();
        for envelope in rest {
            replayed.apply_event(envelope).unwrap();
        }
        assert_eq!(replayed, order);
        assert_eq!(replayed.version, 4);
    }

    #[test]
    fn test_first_event_must_be_created() {
        let envelope = EventEnvelope::new(
            "ABC-1234-5678-90123",
            1,
            OrderEvent::VehicleDelivered(OrderVehicleDelivered { delivery: delivery() }),
            "admin",
        );
        assert_eq!(Order::apply_first_event(&envelope).unwrap_err(), OrderError::NotInitialized);
    }
}
