use serde::Serialize;

// ============================================================================
// Reference Data - Static lookup tables
// ============================================================================
//
// Read-only mock data shared by the wizard, the session and the desks.
// Everything here is 'static; callers hold plain references.
//
// ============================================================================

pub const APP_TITLE: &str = "Zyberion Management System";

#[derive(Debug, PartialEq, Serialize)]
pub struct User {
    pub id: &'static str,
    pub username: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub name: &'static str,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Store {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Equipment {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CarModel {
    pub id: &'static str,
    pub name: &'static str,
    pub base_price: f64,
    pub available_equipment_ids: &'static [&'static str],
    pub image_url: Option<&'static str>,
}

impl CarModel {
    pub fn offers(&self, equipment_id: &str) -> bool {
        self.available_equipment_ids.contains(&equipment_id)
    }

    /// Equipment that can be fitted to this model, in catalog order
    pub fn available_equipment(&self) -> impl Iterator<Item = &'static Equipment> + '_ {
        EQUIPMENT.iter().filter(move |eq| self.offers(eq.id))
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct LoanPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub interest_rate: f64,
    pub term_years: u32,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Bank {
    pub id: &'static str,
    pub name: &'static str,
    pub min_interest: f64,
    pub max_interest: f64,
    pub min_term: u32,
    pub max_term: u32,
    pub loan_plans: &'static [LoanPlan],
}

impl Bank {
    pub fn find_plan(&self, plan_id: &str) -> Option<&'static LoanPlan> {
        self.loan_plans.iter().find(|p| p.id == plan_id)
    }
}

pub static USERS: [User; 4] = [
    User { id: "admin01", username: "admin", email: "admin@zyberion.com", phone: "000-000-0000", name: "Administrator" },
    User { id: "user1", username: "john.doe", email: "john.doe@example.com", phone: "123-456-7890", name: "John Doe" },
    User { id: "user2", username: "jane.smith", email: "jane.smith@example.com", phone: "987-654-3210", name: "Jane Smith" },
    User { id: "user3", username: "alice.w", email: "alice.w@example.com", phone: "555-123-4567", name: "Alice Wonderland" },
];

pub static STORES: [Store; 3] = [
    Store { id: "store1", name: "ZYBERION Flagship Centralis" },
    Store { id: "store2", name: "ZYBERION Northpoint Branch 020" },
    Store { id: "store3", name: "ZYBERION South Bay Gallery" },
];

pub static EQUIPMENT: [Equipment; 7] = [
    Equipment { id: "eq1", name: "Premium Sound System", price: 1800.0 },
    Equipment { id: "eq2", name: "Panoramic Sunroof", price: 1200.0 },
    Equipment { id: "eq3", name: "AI Autopilot Package", price: 5500.0 },
    Equipment { id: "eq4", name: "Vegan Leather Seats (Cream)", price: 2200.0 },
    Equipment { id: "eq5", name: "Adaptive Matrix Headlights", price: 900.0 },
    Equipment { id: "eq6", name: "22\" Aero Wheels", price: 2500.0 },
    Equipment { id: "eq7", name: "Performance Boost Upgrade", price: 3000.0 },
];

pub static CAR_MODELS: [CarModel; 3] = [
    CarModel {
        id: "sedan_x1",
        name: "Zyberion Sedan X1",
        base_price: 45000.0,
        available_equipment_ids: &["eq1", "eq2", "eq4", "eq5"],
        image_url: Some("https://picsum.photos/seed/sedanx1/400/250"),
    },
    CarModel {
        id: "suv_y7",
        name: "Zyberion SUV Y7 (7-seater)",
        base_price: 62000.0,
        available_equipment_ids: &["eq1", "eq2", "eq3", "eq4", "eq5", "eq6"],
        image_url: Some("https://picsum.photos/seed/suvy7/400/250"),
    },
    CarModel {
        id: "truck_z3",
        name: "Zyberion Truck Z3",
        base_price: 75000.0,
        available_equipment_ids: &["eq2", "eq3", "eq5", "eq6", "eq7"],
        image_url: Some("https://picsum.photos/seed/truckz3/400/250"),
    },
];

pub static BANKS: [Bank; 3] = [
    Bank {
        id: "bank1",
        name: "Global Investment Bank",
        min_interest: 2.5,
        max_interest: 5.0,
        min_term: 1,
        max_term: 7,
        loan_plans: &[
            LoanPlan { id: "b1p1", name: "Standard 3yr @ 3.5%", interest_rate: 3.5, term_years: 3 },
            LoanPlan { id: "b1p2", name: "Extended 5yr @ 4.0%", interest_rate: 4.0, term_years: 5 },
            LoanPlan { id: "b1p3", name: "Flexi 7yr @ 4.2%", interest_rate: 4.2, term_years: 7 },
        ],
    },
    Bank {
        id: "bank2",
        name: "Future Finance Corp",
        min_interest: 3.0,
        max_interest: 6.0,
        min_term: 2,
        max_term: 5,
        loan_plans: &[
            LoanPlan { id: "b2p1", name: "Eco Saver 4yr @ 3.2%", interest_rate: 3.2, term_years: 4 },
            LoanPlan { id: "b2p2", name: "MaxTerm 5yr @ 3.8%", interest_rate: 3.8, term_years: 5 },
            LoanPlan { id: "b2p3", name: "Advantage 2yr @ 3.0%", interest_rate: 3.0, term_years: 2 },
        ],
    },
    Bank {
        id: "bank3",
        name: "RuiFeng International Investment Bank (瑞豐國際投資銀行)",
        min_interest: 7.0,
        max_interest: 10.0,
        min_term: 2,
        max_term: 6,
        loan_plans: &[
            LoanPlan { id: "rfp1", name: "Special Offer 4yr @ 9.0%", interest_rate: 9.0, term_years: 4 },
            LoanPlan { id: "rfp2", name: "Standard 5yr @ 8.5%", interest_rate: 8.5, term_years: 5 },
        ],
    },
];

// ============================================================================
// Lookups
// ============================================================================

pub fn find_user_by_username(username: &str) -> Option<&'static User> {
    USERS.iter().find(|u| u.username.eq_ignore_ascii_case(username))
}

/// Case-insensitive email match
pub fn find_user_by_email(email: &str) -> Option<&'static User> {
    USERS.iter().find(|u| u.email.to_lowercase() == email.to_lowercase())
}

/// Exact phone match
pub fn find_user_by_phone(phone: &str) -> Option<&'static User> {
    USERS.iter().find(|u| u.phone == phone)
}

pub fn find_store(store_id: &str) -> Option<&'static Store> {
    STORES.iter().find(|s| s.id == store_id)
}

pub fn find_car_model(model_id: &str) -> Option<&'static CarModel> {
    CAR_MODELS.iter().find(|m| m.id == model_id)
}

pub fn find_bank(bank_id: &str) -> Option<&'static Bank> {
    BANKS.iter().find(|b| b.id == bank_id)
}
