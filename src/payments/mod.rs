//! Paid/unpaid tracking per obligation instance and month.

mod tracker;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{InstanceId, MonthKey};
use crate::errors::Result;

pub use tracker::{MonthlySummary, PaymentTracker, StatusFilter};

/// Ledger key for one obligation in one month.
///
/// Structured rather than a concatenated string, so names or ids can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaidKey {
    #[serde(flatten)]
    pub instance: InstanceId,
    pub month: MonthKey,
}

impl PaidKey {
    pub fn new(instance: InstanceId, month: MonthKey) -> Self {
        Self { instance, month }
    }
}

/// Backing store for the paid-item ledger.
///
/// Presence of a key means paid; absence means unpaid. `insert` and `remove` return
/// whether the set changed and must have persisted the change when they return `Ok`.
pub trait PaidLedgerStore {
    fn contains(&self, key: &PaidKey) -> bool;
    fn insert(&mut self, key: PaidKey) -> Result<bool>;
    fn remove(&mut self, key: &PaidKey) -> Result<bool>;
    /// All keys in ascending order.
    fn keys(&self) -> Vec<PaidKey>;
}

/// Volatile store, used in tests and as the in-memory half of file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryPaidStore {
    entries: BTreeSet<PaidKey>,
}

impl MemoryPaidStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PaidLedgerStore for MemoryPaidStore {
    fn contains(&self, key: &PaidKey) -> bool {
        self.entries.contains(key)
    }

    fn insert(&mut self, key: PaidKey) -> Result<bool> {
        Ok(self.entries.insert(key))
    }

    fn remove(&mut self, key: &PaidKey) -> Result<bool> {
        Ok(self.entries.remove(key))
    }

    fn keys(&self) -> Vec<PaidKey> {
        self.entries.iter().copied().collect()
    }
}

impl<S: PaidLedgerStore + ?Sized> PaidLedgerStore for Box<S> {
    fn contains(&self, key: &PaidKey) -> bool {
        (**self).contains(key)
    }

    fn insert(&mut self, key: PaidKey) -> Result<bool> {
        (**self).insert(key)
    }

    fn remove(&mut self, key: &PaidKey) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<PaidKey> {
        (**self).keys()
    }
}
