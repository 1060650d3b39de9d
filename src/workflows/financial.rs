use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::order::{FinancialApproval, Order, OrderNumber, OrderStatus};
use crate::session::AppSession;
use super::{parse_order_number, WorkflowError};

// ============================================================================
// Financial Approval Desk
// ============================================================================

/// Editable approval terms, prefilled from the loan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalForm {
    pub approved_amount: f64,
    pub approved_interest: f64,
    pub approved_duration: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialReview {
    pub order: Order,
    pub form: ApprovalForm,
}

/// The order must exist, carry a loan and still be awaiting a decision
fn awaiting_approval<'a>(
    session: &'a AppSession,
    number: &OrderNumber,
) -> Result<&'a Order, WorkflowError> {
    let order = session
        .find_order(number.as_str())
        .ok_or_else(|| WorkflowError::NotFound(number.to_string()))?;

    if !order.loan_required {
        return Err(WorkflowError::LoanNotRequired(number.to_string()));
    }
    if !matches!(
        order.status,
        OrderStatus::Created | OrderStatus::FinancialApprovalInProgress
    ) {
        return Err(WorkflowError::NotAwaitingApproval {
            order_number: number.to_string(),
            status: order.status,
        });
    }
    Ok(order)
}

pub struct FinancialApprovalDesk;

impl FinancialApprovalDesk {
    /// Load an order for review; a fresh order is moved into review
    pub fn open(session: &mut AppSession, input: &str) -> Result<FinancialReview, WorkflowError> {
        let number = parse_order_number(input)?;
        let order = awaiting_approval(session, &number)?;

        let form = order
            .loan_info
            .as_ref()
            .map(|loan| ApprovalForm {
                approved_amount: loan.requested_amount,
                approved_interest: loan.interest_rate,
                approved_duration: loan.term_years,
                notes: None,
            })
            .unwrap_or(ApprovalForm {
                approved_amount: 0.0,
                approved_interest: 0.0,
                approved_duration: 0,
                notes: None,
            });

        if order.status == OrderStatus::Created {
            let actor = session.acting_user();
            session.update_order_status(
                number.as_str(),
                OrderStatus::FinancialApprovalInProgress,
                actor,
                Some("Financial review started.".to_string()),
            )?;
        }

        let order = session
            .find_order(number.as_str())
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound(number.to_string()))?;
        Ok(FinancialReview { order, form })
    }

    pub fn approve(
        session: &mut AppSession,
        input: &str,
        form: ApprovalForm,
    ) -> Result<Order, WorkflowError> {
        let number = parse_order_number(input)?;
        let user = session.current_user().ok_or(WorkflowError::NotLoggedIn)?;
        awaiting_approval(session, &number)?;

        let positive = |value: f64| value > 0.0;
        if !positive(form.approved_amount)
            || !positive(form.approved_interest)
            || form.approved_duration == 0
        {
            return Err(WorkflowError::NonPositiveApproval);
        }

        let approval = FinancialApproval {
            approved_interest: form.approved_interest,
            approved_duration: form.approved_duration,
            approved_amount: form.approved_amount,
            approved_by: user.username.to_string(),
            approved_at: Utc::now(),
            notes: form.notes.filter(|n| !n.trim().is_empty()),
        };

        let order = session.update_order_financial_approval(number.as_str(), approval)?;
        Ok(order.clone())
    }

    pub fn reject(
        session: &mut AppSession,
        input: &str,
        notes: Option<&str>,
    ) -> Result<Order, WorkflowError> {
        let number = parse_order_number(input)?;
        let user = session.current_user().ok_or(WorkflowError::NotLoggedIn)?;
        awaiting_approval(session, &number)?;

        let notes = notes.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("No notes");
        let order = session.update_order_status(
            number.as_str(),
            OrderStatus::FinancialRejected,
            user.username,
            Some(format!("Financials rejected. Notes: {}", notes)),
        )?;
        Ok(order.clone())
    }
}
