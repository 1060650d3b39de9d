pub mod draft;

pub use draft::{AccountLookup, OrderFormData};

use std::fmt;

use serde::Serialize;

use crate::domain::order::{Order, OrderCreationData};
use crate::session::{AppSession, SessionError};

// ============================================================================
// Order Creation Wizard
// ============================================================================
//
// Four steps over one draft. Which steps are visible is decided by the draft
// itself (the loan step only exists when a loan is required), and navigation
// walks the visible steps.
//
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WizardStep {
    #[default]
    BasicInfo,
    CarInfo,
    LoanInfo,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::BasicInfo,
        WizardStep::CarInfo,
        WizardStep::LoanInfo,
        WizardStep::Confirmation,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Order Basic Information",
            WizardStep::CarInfo => "Car (Vehicle) Information",
            WizardStep::LoanInfo => "Loan Plan Information",
            WizardStep::Confirmation => "Confirmation",
        }
    }

    pub fn is_visible(&self, draft: &OrderFormData) -> bool {
        match self {
            WizardStep::LoanInfo => draft.loan_required,
            _ => true,
        }
    }

    /// Field-level validation of this step against the draft
    pub fn validate(&self, draft: &OrderFormData) -> StepReport {
        let mut report = StepReport::new(*self);
        match self {
            WizardStep::BasicInfo => {
                if draft.found_user.is_none() {
                    report.push("account", "An account must be selected.");
                }
                if draft.store_id.is_none() {
                    report.push("store", "A store must be selected.");
                }
            }
            WizardStep::CarInfo => {
                if draft.car_model.is_none() {
                    report.push("model", "A car model must be selected.");
                }
            }
            WizardStep::LoanInfo => {
                if !draft.loan_required {
                    return report;
                }
                if draft.bank.is_none() {
                    report.push("bank", "A bank must be selected.");
                }
                if draft.loan_plan.is_none() {
                    report.push("plan", "A loan plan must be selected.");
                }
                let amount = draft.effective_requested_amount();
                if amount.is_nan() || amount <= 0.0 {
                    report.push("amount", "Requested loan amount must be positive.");
                } else if let Some(car) = &draft.car_info {
                    if amount > car.total_price {
                        report.push(
                            "amount",
                            format!(
                                "Loan amount cannot exceed total car price (${}).",
                                format_amount(car.total_price)
                            ),
                        );
                    }
                }
            }
            WizardStep::Confirmation => {}
        }
        report
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ============================================================================
// Validation Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: WizardStep,
    pub errors: Vec<FieldError>,
}

impl StepReport {
    fn new(step: WizardStep) -> Self {
        Self { step, errors: Vec::new() }
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Search term cannot be empty.")]
    EmptySearchTerm,

    #[error("Account not found.")]
    AccountNotFound,

    #[error("A car model must be selected.")]
    NoCarModel,

    #[error("Equipment {0} is not available for the selected car model.")]
    EquipmentNotOffered(String),

    #[error("Please complete all required fields correctly before proceeding.")]
    StepInvalid(StepReport),

    #[error("Step \"{0}\" cannot be opened from here.")]
    StepUnreachable(WizardStep),

    #[error("Critical information missing. Please review all steps.")]
    MissingInformation,

    #[error("Failed to create order: {0}")]
    Session(#[from] SessionError),
}

// ============================================================================
// Wizard
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct OrderWizard {
    draft: OrderFormData,
    current: WizardStep,
}

impl OrderWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn draft(&self) -> &OrderFormData {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut OrderFormData {
        &mut self.draft
    }

    pub fn visible_steps(&self) -> Vec<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .filter(|s| s.is_visible(&self.draft))
            .collect()
    }

    pub fn validate_current(&self) -> StepReport {
        self.current.validate(&self.draft)
    }

    pub fn is_last_step(&self) -> bool {
        self.current == WizardStep::Confirmation
    }

    /// Validate the current step, then advance to the next visible step
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let report = self.validate_current();
        if !report.is_valid() {
            tracing::debug!(step = ?self.current, errors = report.errors.len(), "Wizard step invalid");
            return Err(WizardError::StepInvalid(report));
        }

        if let Some(next) = WizardStep::ALL
            .into_iter()
            .skip(self.current.index() + 1)
            .find(|s| s.is_visible(&self.draft))
        {
            self.current = next;
        }
        Ok(self.current)
    }

    pub fn previous(&mut self) -> WizardStep {
        if let Some(prev) = WizardStep::ALL[..self.current.index()]
            .iter()
            .rev()
            .find(|s| s.is_visible(&self.draft))
        {
            self.current = *prev;
        }
        self.current
    }

    /// Jump back to an already-visited visible step
    pub fn go_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        if step > self.current || !step.is_visible(&self.draft) {
            return Err(WizardError::StepUnreachable(step));
        }
        self.current = step;
        Ok(self.current)
    }

    /// Assemble creation data from a complete draft
    pub fn finish(&self) -> Result<OrderCreationData, WizardError> {
        let report = self.validate_current();
        if !report.is_valid() {
            return Err(WizardError::StepInvalid(report));
        }

        let draft = &self.draft;
        let (Some(account_id), Some(account_name), Some(account_email)) =
            (&draft.account_id, &draft.account_name, &draft.account_email)
        else {
            return Err(WizardError::MissingInformation);
        };
        let (Some(store_id), Some(store_name), Some(car_info)) =
            (&draft.store_id, &draft.store_name, &draft.car_info)
        else {
            return Err(WizardError::MissingInformation);
        };

        let loan_info = if draft.loan_required {
            Some(draft.loan_info.clone().ok_or(WizardError::MissingInformation)?)
        } else {
            None
        };

        Ok(OrderCreationData {
            account_id: account_id.clone(),
            account_name: account_name.clone(),
            account_email: account_email.clone(),
            store_id: store_id.clone(),
            store_name: store_name.clone(),
            car_info: car_info.clone(),
            loan_required: draft.loan_required,
            loan_info,
            total_order_amount: car_info.total_price,
        })
    }

    pub fn submit(&self, session: &mut AppSession) -> Result<Order, WizardError> {
        let data = self.finish()?;
        let order = session.add_order(data)?;
        Ok(order.clone())
    }
}

/// Thousands-separated amount, fractional part only when present
fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }

    let cents = ((rounded.fract().abs()) * 100.0).round() as u32;
    match cents {
        0 => grouped,
        c if c % 10 == 0 => format!("{}.{}", grouped, c / 10),
        c => format!("{}.{:02}", grouped, c),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
