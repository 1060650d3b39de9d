use anyhow::Context;
use chrono::NaiveDate;

use crate::domain::order::OrderNumber;
use crate::session::AppSession;
use crate::wizard::{AccountLookup, OrderWizard};
use crate::workflows::{DeliveryForm, FinancialApprovalDesk, VehicleDeliveryDesk};

// ============================================================================
// Demo Data
// ============================================================================
//
// Seeds a fresh session with two orders driven through the same operations
// an operator would use:
// 1. A cash purchase left at Created
// 2. A financed purchase taken through approval, delivery and finish
//
// The session must already be logged in.
//
// ============================================================================

pub fn seed_demo_orders(session: &mut AppSession) -> anyhow::Result<Vec<OrderNumber>> {
    let cash = create_cash_order(session).context("seeding cash order")?;
    let financed = create_financed_order(session).context("seeding financed order")?;

    tracing::info!(
        orders = session.orders().len(),
        cash = %cash,
        financed = %financed,
        "Demo orders seeded"
    );
    Ok(vec![cash, financed])
}

fn create_cash_order(session: &mut AppSession) -> anyhow::Result<OrderNumber> {
    let mut wizard = OrderWizard::new();
    {
        let draft = wizard.draft_mut();
        draft.search_account("john.doe@example.com", AccountLookup::Email)?;
        draft.select_store("store1");
    }
    wizard.next()?;
    {
        let draft = wizard.draft_mut();
        draft.select_car_model("sedan_x1");
        draft.toggle_equipment("eq1")?;
        draft.toggle_equipment("eq2")?;
        draft.set_loan_required(false);
    }
    wizard.next()?;

    let order = wizard.submit(session)?;
    Ok(order.order_number)
}

fn create_financed_order(session: &mut AppSession) -> anyhow::Result<OrderNumber> {
    let mut wizard = OrderWizard::new();
    {
        let draft = wizard.draft_mut();
        draft.search_account("987-654-3210", AccountLookup::Phone)?;
        draft.select_store("store2");
    }
    wizard.next()?;
    {
        let draft = wizard.draft_mut();
        draft.select_car_model("suv_y7");
        draft.toggle_equipment("eq3")?;
        draft.set_loan_required(true);
    }
    wizard.next()?;
    {
        let draft = wizard.draft_mut();
        draft.select_bank("bank2");
        draft.select_loan_plan("b2p2");
        draft.set_requested_amount(50000.0);
    }
    wizard.next()?;

    let order = wizard.submit(session)?;
    let number = order.order_number.to_string();

    let review = FinancialApprovalDesk::open(session, &number)?;
    let mut form = review.form;
    form.notes = Some("Income verified.".to_string());
    FinancialApprovalDesk::approve(session, &number, form)?;

    VehicleDeliveryDesk::open(session, &number)?;
    let delivery = DeliveryForm {
        vin: "1zyb3r10n5uv00042".to_string(),
        manufacture_date: NaiveDate::from_ymd_opt(2024, 11, 5),
        delivery_date: NaiveDate::from_ymd_opt(2025, 1, 20),
        notes: None,
    };
    VehicleDeliveryDesk::record(session, &number, delivery)?;
    VehicleDeliveryDesk::finish(session, &number)?;

    Ok(order.order_number)
}
