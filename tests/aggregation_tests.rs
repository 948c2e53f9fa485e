mod common;

use common::{approx_eq, household_obligations, month};
use fambudget_core::{
    aggregate::{category_totals, monthly_equivalent, total_monthly, MonthScope},
    domain::{FixedCost, InstallmentPlan, Interval, Obligation, Subscription},
};

#[test]
fn yearly_obligations_amortize_to_a_twelfth() {
    for amount in [0.0, 1.0, 99.99, 600.0, 1234.56] {
        let cost = Obligation::from(FixedCost::new("Yearly", amount, Interval::Yearly));
        let sub = Obligation::from(Subscription::new("Yearly", amount, Interval::Yearly, 28));
        assert!(approx_eq(monthly_equivalent(&cost), amount / 12.0));
        assert!(approx_eq(monthly_equivalent(&sub), amount / 12.0));
    }
}

#[test]
fn monthly_obligations_are_unchanged() {
    for amount in [0.0, 0.01, 42.0, 1200.0] {
        let sub = Obligation::from(Subscription::new("Monthly", amount, Interval::Monthly, 1));
        assert_eq!(monthly_equivalent(&sub), amount);
    }
}

#[test]
fn empty_collection_totals_zero() {
    let empty: Vec<Obligation> = Vec::new();
    assert_eq!(total_monthly(&empty, MonthScope::Undated), 0.0);
}

#[test]
fn installment_plan_contributes_only_inside_its_range() {
    let plans = vec![Obligation::from(InstallmentPlan::new(
        "Laptop",
        100.0,
        "2024-01-01",
        "2024-03-31",
    ))];
    assert_eq!(total_monthly(&plans, MonthScope::Month(month("2024-02"))), 100.0);
    assert_eq!(total_monthly(&plans, MonthScope::Month(month("2024-04"))), 0.0);
    assert_eq!(total_monthly(&plans, MonthScope::Undated), 100.0);
}

#[test]
fn rent_and_yearly_insurance_total_1250() {
    let items: Vec<Obligation> = household_obligations().into_iter().take(2).collect();
    assert!(approx_eq(total_monthly(&items, MonthScope::Undated), 1250.0));
    assert!(approx_eq(
        total_monthly(&items, MonthScope::Month(month("2024-06"))),
        1250.0
    ));
}

#[test]
fn malformed_plan_dates_are_excluded_not_fatal() {
    let mut items = household_obligations();
    items.push(InstallmentPlan::new("Broken", 999.0, "2024-02-30", "2024-12-31").into());
    let total = total_monthly(&items, MonthScope::Month(month("2024-02")));
    assert!(approx_eq(total, 1350.0));
}

#[test]
fn malformed_plan_deserializes_and_is_skipped() {
    let json = r#"{
        "kind": "installment",
        "id": "6f1c8f8e-2b2a-4a53-9a43-6a4a1f0c1d11",
        "name": "Fridge",
        "monthly_amount": 45.0,
        "start_date": "someday",
        "end_date": "2025-01-01"
    }"#;
    let plan: Obligation = serde_json::from_str(json).expect("record still loads");
    assert_eq!(
        total_monthly([&plan], MonthScope::Month(month("2024-06"))),
        0.0
    );
}

#[test]
fn category_breakdown_sums_to_month_total() {
    let items = household_obligations();
    let scope = MonthScope::Month(month("2024-02"));
    let breakdown: f64 = category_totals(&items, scope).iter().map(|c| c.total).sum();
    assert!(approx_eq(breakdown, total_monthly(&items, scope)));
}
