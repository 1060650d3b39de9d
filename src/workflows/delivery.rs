use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderNumber, OrderStatus, VehicleDelivery};
use crate::session::AppSession;
use super::{parse_order_number, WorkflowError};

// ============================================================================
// Vehicle Delivery Desk
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryForm {
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&VehicleDelivery> for DeliveryForm {
    fn from(delivery: &VehicleDelivery) -> Self {
        Self {
            vin: delivery.vin.clone(),
            manufacture_date: Some(delivery.manufacture_date),
            delivery_date: delivery.delivery_date,
            notes: delivery.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReview {
    pub order: Order,
    pub form: DeliveryForm,
}

/// The order must exist and have cleared financing
fn ready_for_delivery<'a>(
    session: &'a AppSession,
    number: &OrderNumber,
) -> Result<&'a Order, WorkflowError> {
    let order = session
        .find_order(number.as_str())
        .ok_or_else(|| WorkflowError::NotFound(number.to_string()))?;

    if !matches!(
        order.status,
        OrderStatus::FinancialApproved | OrderStatus::VehicleDeliveryInProgress
    ) {
        return Err(WorkflowError::NotReadyForDelivery {
            order_number: number.to_string(),
            status: order.status,
        });
    }
    Ok(order)
}

pub struct VehicleDeliveryDesk;

impl VehicleDeliveryDesk {
    /// Load an approved order; the first visit starts the delivery process
    pub fn open(session: &mut AppSession, input: &str) -> Result<DeliveryReview, WorkflowError> {
        let number = parse_order_number(input)?;
        let order = ready_for_delivery(session, &number)?;

        let form = order
            .vehicle_delivery
            .as_ref()
            .map(DeliveryForm::from)
            .unwrap_or_default();

        if order.status == OrderStatus::FinancialApproved {
            let actor = session.acting_user();
            session.update_order_status(
                number.as_str(),
                OrderStatus::VehicleDeliveryInProgress,
                actor,
                Some("Vehicle delivery process started.".to_string()),
            )?;
        }

        let order = session
            .find_order(number.as_str())
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound(number.to_string()))?;
        Ok(DeliveryReview { order, form })
    }

    pub fn record(
        session: &mut AppSession,
        input: &str,
        form: DeliveryForm,
    ) -> Result<Order, WorkflowError> {
        let number = parse_order_number(input)?;
        if session.current_user().is_none() {
            return Err(WorkflowError::NotLoggedIn);
        }
        ready_for_delivery(session, &number)?;

        let vin = form.vin.trim().to_ascii_uppercase();
        let manufacture_date = match (vin.is_empty(), form.manufacture_date) {
            (false, Some(date)) => date,
            _ => return Err(WorkflowError::MissingVehicleData),
        };

        let delivery = VehicleDelivery {
            vin,
            manufacture_date,
            delivery_date: form.delivery_date,
            notes: form.notes.filter(|n| !n.trim().is_empty()),
        };

        let order = session.update_order_vehicle_delivery(number.as_str(), delivery)?;
        Ok(order.clone())
    }

    /// Close out an order whose vehicle has been handed over
    pub fn finish(session: &mut AppSession, input: &str) -> Result<Order, WorkflowError> {
        let number = parse_order_number(input)?;
        let user = session.current_user().ok_or(WorkflowError::NotLoggedIn)?;

        let order = session
            .find_order(number.as_str())
            .ok_or_else(|| WorkflowError::NotFound(number.to_string()))?;
        if order.status != OrderStatus::Delivered {
            return Err(WorkflowError::NotDelivered {
                order_number: number.to_string(),
                status: order.status,
            });
        }
        if order.vehicle_delivery.is_none() {
            return Err(WorkflowError::NoDeliveryRecorded(number.to_string()));
        }

        let order = session.update_order_status(
            number.as_str(),
            OrderStatus::Finished,
            user.username,
            Some("Order marked as finished by customer.".to_string()),
        )?;
        Ok(order.clone())
    }
}
