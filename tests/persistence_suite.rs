mod common;

use std::fs;

use common::{household_obligations, month, temp_base};
use fambudget_core::{
    domain::{BudgetBook, Household, SavingsGoal},
    errors::BudgetError,
    payments::{PaidLedgerStore, PaymentTracker},
    storage::{JsonPaidStore, JsonStorage, StorageBackend},
};

fn sample_book() -> BudgetBook {
    let mut book = BudgetBook::new("Family");
    for obligation in household_obligations() {
        book.add_obligation(obligation);
    }
    book.add_household(Household::new("Main street"));
    book.add_savings_goal(SavingsGoal::new("Vacation", 1500.0).with_target_date("2024-12-01"));
    book
}

#[test]
fn book_survives_save_and_load() {
    let storage = JsonStorage::new(Some(temp_base()), Some(3)).unwrap();
    let book = sample_book();
    storage.save(&book, "family").expect("save book");

    let loaded = storage.load("family").expect("load book");
    assert_eq!(loaded.obligations(), book.obligations());
    assert_eq!(loaded.households, book.households);
    assert_eq!(loaded.savings_goals, book.savings_goals);
}

#[test]
fn failed_save_preserves_original_file() {
    let storage = JsonStorage::new(Some(temp_base()), Some(3)).unwrap();
    let book = sample_book();
    storage.save(&book, "family").unwrap();
    let path = storage.book_path("family");
    let original = fs::read_to_string(&path).unwrap();

    let tmp = path.with_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    let mut changed = book.clone();
    changed.add_household(Household::new("Cabin"));
    let err = storage.save(&changed, "family").expect_err("temp file is blocked");
    assert!(matches!(err, BudgetError::StorageError(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn restore_brings_back_an_earlier_version() {
    let storage = JsonStorage::new(Some(temp_base()), Some(3)).unwrap();
    let original = sample_book();
    storage.save(&original, "family").unwrap();

    let mut emptied = original.clone();
    for obligation in original.obligations() {
        emptied.remove_obligation(&obligation.instance_id()).unwrap();
    }
    storage.save(&emptied, "family").unwrap();
    assert!(storage.load("family").unwrap().obligations().is_empty());

    let backups = storage.list_backups("family").unwrap();
    let newest = backups.first().expect("a backup exists");
    let restored = storage.restore("family", newest).unwrap();
    assert_eq!(restored.obligations().len(), 3);
    assert_eq!(storage.load("family").unwrap().obligations().len(), 3);
}

#[test]
fn deleting_an_obligation_leaves_its_payment_records() {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base), None).unwrap();
    let mut book = sample_book();
    let june = month("2024-06");
    let rent = book.obligations()[0].instance_id();

    let mut tracker = PaymentTracker::new(JsonPaidStore::open(storage.paid_ledger_path("family")).unwrap());
    tracker.set_paid(rent, june, true).unwrap();

    book.remove_obligation(&rent).unwrap();
    storage.save(&book, "family").unwrap();

    let reopened = JsonPaidStore::open(storage.paid_ledger_path("family")).unwrap();
    assert_eq!(reopened.keys().len(), 1);
    let tracker = PaymentTracker::new(reopened);
    assert_eq!(tracker.orphaned_keys(book.obligations()).len(), 1);
}

#[test]
fn two_trackers_on_one_ledger_keep_both_marks() {
    let storage = JsonStorage::new(Some(temp_base()), None).unwrap();
    let book = sample_book();
    let rent = book.obligations()[0].instance_id();
    let insurance = book.obligations()[1].instance_id();
    let june = month("2024-06");
    let path = storage.paid_ledger_path("family");

    let mut first = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
    let mut second = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
    first.set_paid(rent, june, true).unwrap();
    second.set_paid(insurance, june, true).unwrap();

    let reopened = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
    assert!(reopened.is_paid(&rent, &june));
    assert!(reopened.is_paid(&insurance, &june));

    second.set_paid(rent, june, false).unwrap();
    first.set_paid(insurance, june, true).unwrap();
    let reopened = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
    assert!(!reopened.is_paid(&rent, &june));
    assert!(reopened.is_paid(&insurance, &june));
}
