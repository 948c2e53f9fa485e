#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use fambudget_core::domain::{
    FixedCost, InstallmentPlan, Interval, MonthKey, Obligation, Subscription,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that is removed when the test binary exits.
pub fn temp_base() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn month(raw: &str) -> MonthKey {
    raw.parse().expect("valid month key")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Rent (1200 monthly), Insurance (600 yearly) and a Q1 2024 laptop plan (100 monthly).
pub fn household_obligations() -> Vec<Obligation> {
    vec![
        FixedCost::new("Rent", 1200.0, Interval::Monthly)
            .with_category("Housing")
            .into(),
        Subscription::new("Insurance", 600.0, Interval::Yearly, 1)
            .with_category("Insurance")
            .into(),
        InstallmentPlan::new("Laptop", 100.0, "2024-01-01", "2024-03-31").into(),
    ]
}

pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
