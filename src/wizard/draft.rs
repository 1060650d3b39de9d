use serde::Serialize;

use crate::catalog::{self, Bank, CarModel, Equipment, LoanPlan, Store, User};
use crate::domain::order::{EquipmentItem, OrderCarInfo, OrderLoanInfo};
use super::WizardError;

// ============================================================================
// Order Form Draft - accumulated wizard input, never stored
// ============================================================================

/// How `search_account` interprets its term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountLookup {
    #[default]
    Email,
    Phone,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderFormData {
    // Account
    pub search_term: Option<String>,
    pub found_user: Option<&'static User>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub account_email: Option<String>,

    // Store
    pub store_id: Option<String>,
    pub store_name: Option<String>,

    // Car
    pub car_model: Option<&'static CarModel>,
    pub selected_equipment: Vec<&'static Equipment>,
    pub car_info: Option<OrderCarInfo>,

    // Loan
    pub loan_required: bool,
    pub bank: Option<&'static Bank>,
    pub loan_plan: Option<&'static LoanPlan>,
    pub requested_amount: Option<f64>,
    pub loan_info: Option<OrderLoanInfo>,
}

impl OrderFormData {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Account & store
    // ========================================================================

    pub fn search_account(
        &mut self,
        term: &str,
        lookup: AccountLookup,
    ) -> Result<&'static User, WizardError> {
        if term.trim().is_empty() {
            self.found_user = None;
            return Err(WizardError::EmptySearchTerm);
        }

        let found = match lookup {
            AccountLookup::Email => catalog::find_user_by_email(term),
            AccountLookup::Phone => catalog::find_user_by_phone(term),
        };

        match found {
            Some(user) => {
                self.found_user = Some(user);
                self.account_id = Some(user.id.to_string());
                self.account_name = Some(user.name.to_string());
                self.account_email = Some(user.email.to_string());
                self.search_term = Some(term.to_string());
                Ok(user)
            }
            None => {
                self.found_user = None;
                Err(WizardError::AccountNotFound)
            }
        }
    }

    pub fn select_store(&mut self, store_id: &str) -> Option<&'static Store> {
        let store = catalog::find_store(store_id);
        self.store_id = store.map(|s| s.id.to_string());
        self.store_name = store.map(|s| s.name.to_string());
        store
    }

    // ========================================================================
    // Car
    // ========================================================================

    /// Changing the model always resets the equipment selection
    pub fn select_car_model(&mut self, model_id: &str) -> Option<&'static CarModel> {
        self.car_model = catalog::find_car_model(model_id);
        self.selected_equipment.clear();
        self.refresh_car_info();
        self.car_model
    }

    /// Returns whether the item is selected after the toggle
    pub fn toggle_equipment(&mut self, equipment_id: &str) -> Result<bool, WizardError> {
        let model = self.car_model.ok_or(WizardError::NoCarModel)?;
        let equipment = model
            .available_equipment()
            .find(|e| e.id == equipment_id)
            .ok_or_else(|| WizardError::EquipmentNotOffered(equipment_id.to_string()))?;

        let selected = match self.selected_equipment.iter().position(|e| e.id == equipment.id) {
            Some(index) => {
                self.selected_equipment.remove(index);
                false
            }
            None => {
                self.selected_equipment.push(equipment);
                true
            }
        };
        self.refresh_car_info();
        Ok(selected)
    }

    pub fn total_car_price(&self) -> f64 {
        self.car_info.as_ref().map(|c| c.total_price).unwrap_or(0.0)
    }

    fn refresh_car_info(&mut self) {
        self.car_info = self.car_model.map(|model| {
            let selected_equipment: Vec<EquipmentItem> =
                self.selected_equipment.iter().copied().map(EquipmentItem::from).collect();
            let equipment_total: f64 = selected_equipment.iter().map(|e| e.price).sum();
            OrderCarInfo {
                model_id: model.id.to_string(),
                model_name: model.name.to_string(),
                base_price: model.base_price,
                selected_equipment,
                total_price: model.base_price + equipment_total,
            }
        });
        self.refresh_loan_info();
    }

    // ========================================================================
    // Loan
    // ========================================================================

    pub fn set_loan_required(&mut self, loan_required: bool) {
        self.loan_required = loan_required;
    }

    /// Changing the bank always resets the plan
    pub fn select_bank(&mut self, bank_id: &str) -> Option<&'static Bank> {
        self.bank = catalog::find_bank(bank_id);
        self.loan_plan = None;
        self.refresh_loan_info();
        self.bank
    }

    pub fn select_loan_plan(&mut self, plan_id: &str) -> Option<&'static LoanPlan> {
        self.loan_plan = self.bank.and_then(|bank| bank.find_plan(plan_id));
        self.refresh_loan_info();
        self.loan_plan
    }

    pub fn set_requested_amount(&mut self, amount: f64) {
        self.requested_amount = Some(amount);
        self.refresh_loan_info();
    }

    /// Falls back to the car total until an amount is entered
    pub fn effective_requested_amount(&self) -> f64 {
        self.requested_amount.unwrap_or_else(|| self.total_car_price())
    }

    fn refresh_loan_info(&mut self) {
        self.loan_info = match (self.bank, self.loan_plan) {
            (Some(bank), Some(plan)) => Some(OrderLoanInfo {
                bank_id: bank.id.to_string(),
                bank_name: bank.name.to_string(),
                plan_id: plan.id.to_string(),
                plan_name: plan.name.to_string(),
                requested_amount: self.effective_requested_amount(),
                interest_rate: plan.interest_rate,
                term_years: plan.term_years,
                approved_amount: None,
            }),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_by_email_is_case_insensitive() {
        let mut draft = OrderFormData::new();
        let user = draft.search_account("John.Doe@Example.com", AccountLookup::Email).unwrap();

        assert_eq!(user.id, "user1");
        assert_eq!(draft.account_name.as_deref(), Some("John Doe"));
        assert_eq!(draft.search_term.as_deref(), Some("John.Doe@Example.com"));
    }

    #[test]
    fn test_search_by_phone() {
        let mut draft = OrderFormData::new();
        let user = draft.search_account("987-654-3210", AccountLookup::Phone).unwrap();
        assert_eq!(user.id, "user2");
    }

    #[test]
    fn test_search_miss_clears_found_user() {
        let mut draft = OrderFormData::new();
        draft.search_account("john.doe@example.com", AccountLookup::Email).unwrap();

        let err = draft.search_account("nobody@example.com", AccountLookup::Email).unwrap_err();
        assert_eq!(err.to_string(), "Account not found.");
        assert!(draft.found_user.is_none());

        let err = draft.search_account("   ", AccountLookup::Phone).unwrap_err();
        assert_eq!(err.to_string(), "Search term cannot be empty.");
    }

    #[test]
    fn test_unknown_store_clears_selection() {
        let mut draft = OrderFormData::new();
        draft.select_store("store2");
        assert_eq!(draft.store_name.as_deref(), Some("ZYBERION Northpoint Branch 020"));

        assert!(draft.select_store("nope").is_none());
        assert!(draft.store_id.is_none());
        assert!(draft.store_name.is_none());
    }

    #[test]
    fn test_equipment_updates_total() {
        let mut draft = OrderFormData::new();
        draft.select_car_model("sedan_x1");
        assert!(draft.toggle_equipment("eq1").unwrap());
        assert!(draft.toggle_equipment("eq2").unwrap());

        let car = draft.car_info.as_ref().unwrap();
        assert_eq!(car.selected_equipment.len(), 2);
        assert_eq!(car.total_price, 45000.0 + 1800.0 + 1200.0);

        assert!(!draft.toggle_equipment("eq1").unwrap());
        assert_eq!(draft.total_car_price(), 46200.0);
    }

    #[test]
    fn test_equipment_must_be_offered_by_model() {
        let mut draft = OrderFormData::new();
        assert!(matches!(draft.toggle_equipment("eq1"), Err(WizardError::NoCarModel)));

        draft.select_car_model("sedan_x1");
        assert!(matches!(
            draft.toggle_equipment("eq7"),
            Err(WizardError::EquipmentNotOffered(ref id)) if id == "eq7"
        ));
    }

    #[test]
    fn test_model_change_clears_equipment() {
        let mut draft = OrderFormData::new();
        draft.select_car_model("suv_y7");
        draft.toggle_equipment("eq3").unwrap();

        draft.select_car_model("truck_z3");
        let car = draft.car_info.as_ref().unwrap();
        assert!(car.selected_equipment.is_empty());
        assert_eq!(car.total_price, 75000.0);

        draft.select_car_model("unknown");
        assert!(draft.car_info.is_none());
    }

    #[test]
    fn test_loan_info_built_from_bank_and_plan() {
        let mut draft = OrderFormData::new();
        draft.select_car_model("sedan_x1");
        draft.select_bank("bank1");
        assert!(draft.loan_info.is_none());

        draft.select_loan_plan("b1p2");
        let loan = draft.loan_info.as_ref().unwrap();
        assert_eq!(loan.bank_id, "bank1");
        assert_eq!(loan.plan_id, "b1p2");
        assert_eq!(loan.term_years, 5);
        assert_eq!(loan.requested_amount, 45000.0);

        draft.set_requested_amount(20000.0);
        assert_eq!(draft.loan_info.as_ref().unwrap().requested_amount, 20000.0);
    }

    #[test]
    fn test_bank_change_clears_plan() {
        let mut draft = OrderFormData::new();
        draft.select_bank("bank1");
        draft.select_loan_plan("b1p1");

        draft.select_bank("bank2");
        assert!(draft.loan_plan.is_none());
        assert!(draft.loan_info.is_none());
        // Plan from another bank is not accepted
        assert!(draft.select_loan_plan("b1p1").is_none());
    }
}
