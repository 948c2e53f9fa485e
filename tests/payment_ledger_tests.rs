mod common;

use common::{approx_eq, household_obligations, month, temp_base};
use fambudget_core::{
    aggregate::{total_monthly, MonthScope},
    domain::Obligation,
    payments::{MemoryPaidStore, PaymentTracker, StatusFilter},
    storage::JsonPaidStore,
};

#[test]
fn set_paid_round_trips() {
    let mut tracker = PaymentTracker::new(MemoryPaidStore::new());
    let items = household_obligations();
    let rent = items[0].instance_id();
    let june = month("2024-06");

    tracker.set_paid(rent, june, true).expect("mark paid");
    assert!(tracker.is_paid(&rent, &june));
    tracker.set_paid(rent, june, false).expect("mark unpaid");
    assert!(!tracker.is_paid(&rent, &june));
}

#[test]
fn unpaid_total_matches_total_of_unpaid_instances() {
    let mut tracker = PaymentTracker::new(MemoryPaidStore::new());
    let items = household_obligations();
    let feb = month("2024-02");
    tracker.set_paid(items[1].instance_id(), feb, true).unwrap();

    let unpaid: Vec<&Obligation> = items
        .iter()
        .filter(|item| !tracker.is_paid(&item.instance_id(), &feb))
        .collect();
    assert!(approx_eq(
        tracker.unpaid_total(&items, &feb),
        total_monthly(unpaid, MonthScope::Month(feb))
    ));
}

#[test]
fn paying_everything_drives_unpaid_total_to_zero() {
    let mut tracker = PaymentTracker::new(MemoryPaidStore::new());
    let items = household_obligations();
    let feb = month("2024-02");
    for item in &items {
        tracker.set_paid(item.instance_id(), feb, true).unwrap();
    }
    assert_eq!(tracker.unpaid_total(&items, &feb), 0.0);
    assert!(tracker.unpaid_total(&items, &month("2024-03")) > 0.0);
}

#[test]
fn paying_rent_leaves_insurance_share_unpaid() {
    let mut tracker = PaymentTracker::new(MemoryPaidStore::new());
    let items: Vec<Obligation> = household_obligations().into_iter().take(2).collect();
    let june = month("2024-06");
    tracker.set_paid(items[0].instance_id(), june, true).unwrap();
    assert!(approx_eq(tracker.unpaid_total(&items, &june), 50.0));
}

#[test]
fn status_filters_partition_every_month() {
    let mut tracker = PaymentTracker::new(MemoryPaidStore::new());
    let items = household_obligations();
    tracker
        .set_paid(items[0].instance_id(), month("2024-01"), true)
        .unwrap();
    tracker
        .set_paid(items[2].instance_id(), month("2024-03"), true)
        .unwrap();

    for raw in ["2023-12", "2024-01", "2024-02", "2024-03", "2024-04"] {
        let key = month(raw);
        let paid = tracker.filter_by_status(&items, &key, StatusFilter::Paid);
        let unpaid = tracker.filter_by_status(&items, &key, StatusFilter::Unpaid);
        assert_eq!(paid.len() + unpaid.len(), items.len(), "month {raw}");

        let positions: Vec<usize> = unpaid
            .iter()
            .map(|item| {
                items
                    .iter()
                    .position(|candidate| candidate.instance_id() == item.instance_id())
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn file_backed_ledger_persists_before_returning() {
    let base = temp_base();
    let path = base.join("household.paid.json");
    let items = household_obligations();
    let june = month("2024-06");

    {
        let mut tracker = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
        tracker.set_paid(items[0].instance_id(), june, true).unwrap();
        tracker.set_paid(items[1].instance_id(), june, true).unwrap();
        tracker.set_paid(items[1].instance_id(), june, false).unwrap();
    }

    let reopened = PaymentTracker::new(JsonPaidStore::open(&path).unwrap());
    assert!(reopened.is_paid(&items[0].instance_id(), &june));
    assert!(!reopened.is_paid(&items[1].instance_id(), &june));
    assert!(approx_eq(reopened.unpaid_total(&items, &june), 50.0));
}
