use std::{collections::HashSet, str::FromStr};

use crate::aggregate::{monthly_equivalent, total_monthly, MonthScope};
use crate::domain::{InstanceId, MonthKey, Obligation};
use crate::errors::{BudgetError, Result};

use super::{PaidKey, PaidLedgerStore};

/// Which obligations `filter_by_status` keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl FromStr for StatusFilter {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "paid" => Ok(StatusFilter::Paid),
            "unpaid" | "open" => Ok(StatusFilter::Unpaid),
            other => Err(BudgetError::InvalidInput(format!(
                "unknown status filter `{other}`, expected all, paid or unpaid"
            ))),
        }
    }
}

/// Dashboard figures for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total: f64,
    pub paid_total: f64,
    pub unpaid_total: f64,
    pub paid_count: usize,
    pub unpaid_count: usize,
}

/// Answers paid/unpaid questions on top of an injected ledger store.
///
/// Writes are last-write-wins per key; two clients toggling the same instance
/// concurrently are not coordinated.
#[derive(Debug)]
pub struct PaymentTracker<S> {
    store: S,
}

impl<S: PaidLedgerStore> PaymentTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn is_paid(&self, instance: &InstanceId, month: &MonthKey) -> bool {
        self.store.contains(&PaidKey::new(*instance, *month))
    }

    /// Marks or unmarks an instance for a month. Repeating the same call is a no-op.
    pub fn set_paid(&mut self, instance: InstanceId, month: MonthKey, paid: bool) -> Result<()> {
        let key = PaidKey::new(instance, month);
        let changed = if paid {
            self.store.insert(key)?
        } else {
            self.store.remove(&key)?
        };
        tracing::debug!(%instance, %month, paid, changed, "payment status updated");
        Ok(())
    }

    /// Sum of monthly equivalents still unpaid in `month`, counting only active plans.
    pub fn unpaid_total<'a>(
        &self,
        obligations: impl IntoIterator<Item = &'a Obligation>,
        month: &MonthKey,
    ) -> f64 {
        total_monthly(
            obligations
                .into_iter()
                .filter(|item| !self.is_paid(&item.instance_id(), month)),
            MonthScope::Month(*month),
        )
    }

    pub fn paid_total<'a>(
        &self,
        obligations: impl IntoIterator<Item = &'a Obligation>,
        month: &MonthKey,
    ) -> f64 {
        total_monthly(
            obligations
                .into_iter()
                .filter(|item| self.is_paid(&item.instance_id(), month)),
            MonthScope::Month(*month),
        )
    }

    /// Keeps obligations matching `status` in `month`, preserving input order.
    ///
    /// Only payment status is checked; plan date ranges are not applied here.
    pub fn filter_by_status<'a>(
        &self,
        obligations: impl IntoIterator<Item = &'a Obligation>,
        month: &MonthKey,
        status: StatusFilter,
    ) -> Vec<&'a Obligation> {
        obligations
            .into_iter()
            .filter(|item| match status {
                StatusFilter::All => true,
                StatusFilter::Paid => self.is_paid(&item.instance_id(), month),
                StatusFilter::Unpaid => !self.is_paid(&item.instance_id(), month),
            })
            .collect()
    }

    pub fn summary<'a>(
        &self,
        obligations: impl IntoIterator<Item = &'a Obligation>,
        month: &MonthKey,
    ) -> MonthlySummary {
        let mut summary = MonthlySummary {
            month: *month,
            total: 0.0,
            paid_total: 0.0,
            unpaid_total: 0.0,
            paid_count: 0,
            unpaid_count: 0,
        };
        for obligation in obligations
            .into_iter()
            .filter(|item| item.is_active_in(month))
        {
            let amount = monthly_equivalent(obligation);
            summary.total += amount;
            if self.is_paid(&obligation.instance_id(), month) {
                summary.paid_total += amount;
                summary.paid_count += 1;
            } else {
                summary.unpaid_total += amount;
                summary.unpaid_count += 1;
            }
        }
        summary
    }

    /// Ledger entries whose obligation is no longer in `obligations`.
    ///
    /// Reported only; orphaned entries are never removed.
    pub fn orphaned_keys<'a>(
        &self,
        obligations: impl IntoIterator<Item = &'a Obligation>,
    ) -> Vec<PaidKey> {
        let known: HashSet<InstanceId> = obligations
            .into_iter()
            .map(Obligation::instance_id)
            .collect();
        self.store
            .keys()
            .into_iter()
            .filter(|key| !known.contains(&key.instance))
            .collect()
    }
}
