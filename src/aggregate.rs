//! Monthly normalisation and totals over obligation snapshots.
//!
//! Every function here is pure: it reads the obligations handed in and never
//! mutates them.

use uuid::Uuid;

use crate::domain::{MonthKey, Obligation};

pub const INSTALLMENTS_BUCKET: &str = "Installments";
pub const UNCATEGORIZED_BUCKET: &str = "Uncategorized";

/// Which installment plans a total includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthScope {
    /// Only plans whose date range covers the month.
    Month(MonthKey),
    /// Every plan, regardless of its date range.
    Undated,
}

impl MonthScope {
    pub fn includes(&self, obligation: &Obligation) -> bool {
        match self {
            MonthScope::Month(month) => obligation.is_active_in(month),
            MonthScope::Undated => true,
        }
    }
}

impl From<MonthKey> for MonthScope {
    fn from(value: MonthKey) -> Self {
        MonthScope::Month(value)
    }
}

/// Amount attributable to a single month.
///
/// Yearly amounts are divided by twelve; installment plans are already monthly.
pub fn monthly_equivalent(obligation: &Obligation) -> f64 {
    match obligation {
        Obligation::Fixed(cost) => cost.interval.monthly_share(cost.amount),
        Obligation::Subscription(sub) => sub.interval.monthly_share(sub.amount),
        Obligation::Installment(plan) => plan.monthly_amount,
    }
}

/// Sums monthly equivalents of the obligations in scope. Empty input yields zero.
pub fn total_monthly<'a>(
    obligations: impl IntoIterator<Item = &'a Obligation>,
    scope: MonthScope,
) -> f64 {
    obligations
        .into_iter()
        .filter(|obligation| scope.includes(obligation))
        .map(monthly_equivalent)
        .sum()
}

/// Monthly total for one category bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Groups monthly totals by category, in order of first appearance.
pub fn category_totals<'a>(
    obligations: impl IntoIterator<Item = &'a Obligation>,
    scope: MonthScope,
) -> Vec<CategoryTotal> {
    let mut buckets: Vec<CategoryTotal> = Vec::new();
    for obligation in obligations.into_iter().filter(|item| scope.includes(item)) {
        let label = match obligation.category() {
            None => INSTALLMENTS_BUCKET,
            Some(name) if name.trim().is_empty() => UNCATEGORIZED_BUCKET,
            Some(name) => name,
        };
        let amount = monthly_equivalent(obligation);
        match buckets.iter_mut().find(|bucket| bucket.category == label) {
            Some(bucket) => {
                bucket.total += amount;
                bucket.count += 1;
            }
            None => buckets.push(CategoryTotal {
                category: label.to_string(),
                total: amount,
                count: 1,
            }),
        }
    }
    buckets
}

pub fn owned_by_household<'a>(
    obligations: impl IntoIterator<Item = &'a Obligation>,
    household_id: Uuid,
) -> impl Iterator<Item = &'a Obligation> {
    obligations
        .into_iter()
        .filter(move |item| item.household_id() == Some(household_id))
}

pub fn owned_by_member<'a>(
    obligations: impl IntoIterator<Item = &'a Obligation>,
    member_id: Uuid,
) -> impl Iterator<Item = &'a Obligation> {
    obligations
        .into_iter()
        .filter(move |item| item.member_id() == Some(member_id))
}
