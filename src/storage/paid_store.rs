use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::Result,
    payments::{MemoryPaidStore, PaidKey, PaidLedgerStore},
};

use super::write_durable;

const PAID_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PaidFile {
    #[serde(default = "schema_version_default")]
    schema_version: u8,
    #[serde(default)]
    entries: MemoryPaidStore,
}

fn schema_version_default() -> u8 {
    PAID_SCHEMA_VERSION
}

/// Paid-item ledger persisted as a JSON file.
///
/// Every change re-reads the file, applies the single key to what is on disk, and
/// writes the result durably before `insert`/`remove` return. Handles sharing one
/// file therefore only overwrite each other for the same key. If the write fails
/// the in-memory set is left as it was.
#[derive(Debug)]
pub struct JsonPaidStore {
    path: PathBuf,
    entries: MemoryPaidStore,
}

impl JsonPaidStore {
    /// Opens the ledger at `path`; a missing file means nothing is paid yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_entries(&path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "paid ledger opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks up changes written by other handles since the last read.
    pub fn reload(&mut self) -> Result<()> {
        self.entries = read_entries(&self.path)?;
        Ok(())
    }

    fn apply(
        &mut self,
        change: impl FnOnce(&mut MemoryPaidStore) -> Result<bool>,
    ) -> Result<bool> {
        let mut fresh = read_entries(&self.path)?;
        let changed = change(&mut fresh)?;
        if changed {
            write_entries(&self.path, &fresh)?;
        }
        self.entries = fresh;
        Ok(changed)
    }
}

fn read_entries(path: &Path) -> Result<MemoryPaidStore> {
    if !path.exists() {
        return Ok(MemoryPaidStore::new());
    }
    let data = fs::read_to_string(path)?;
    let file: PaidFile = serde_json::from_str(&data)?;
    Ok(file.entries)
}

fn write_entries(path: &Path, entries: &MemoryPaidStore) -> Result<()> {
    let file = PaidFile {
        schema_version: PAID_SCHEMA_VERSION,
        entries: entries.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    write_durable(path, &json)
}

impl PaidLedgerStore for JsonPaidStore {
    fn contains(&self, key: &PaidKey) -> bool {
        self.entries.contains(key)
    }

    fn insert(&mut self, key: PaidKey) -> Result<bool> {
        self.apply(|entries| entries.insert(key))
    }

    fn remove(&mut self, key: &PaidKey) -> Result<bool> {
        self.apply(|entries| entries.remove(key))
    }

    fn keys(&self) -> Vec<PaidKey> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceId, ObligationKind};
    use crate::errors::BudgetError;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn key(month: &str) -> PaidKey {
        PaidKey::new(
            InstanceId::new(ObligationKind::Fixed, Uuid::new_v4()),
            month.parse().unwrap(),
        )
    }

    #[test]
    fn changes_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paid.json");
        let paid = key("2024-06");
        let unpaid = key("2024-07");

        let mut store = JsonPaidStore::open(&path).unwrap();
        assert!(store.insert(paid).unwrap());
        assert!(store.insert(unpaid).unwrap());
        assert!(store.remove(&unpaid).unwrap());

        let reopened = JsonPaidStore::open(&path).unwrap();
        assert!(reopened.contains(&paid));
        assert!(!reopened.contains(&unpaid));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn failed_write_is_reported_and_rolled_back() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let mut store = JsonPaidStore::open(blocker.join("paid.json")).unwrap();
        let entry = key("2024-06");
        let err = store.insert(entry).expect_err("write must fail");
        assert!(matches!(err, BudgetError::StorageError(_)));
        assert!(!store.contains(&entry));
    }

    #[test]
    fn handles_sharing_a_file_keep_each_others_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paid.json");
        let rent = key("2024-06");
        let insurance = key("2024-06");

        let mut first = JsonPaidStore::open(&path).unwrap();
        let mut second = JsonPaidStore::open(&path).unwrap();
        assert!(first.insert(rent).unwrap());
        assert!(second.insert(insurance).unwrap());
        assert!(second.contains(&rent));

        let reopened = JsonPaidStore::open(&path).unwrap();
        assert!(reopened.contains(&rent));
        assert!(reopened.contains(&insurance));

        assert!(first.remove(&insurance).unwrap());
        assert!(!second.remove(&insurance).unwrap());
        second.reload().unwrap();
        assert_eq!(second.keys(), vec![rent]);
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paid.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonPaidStore::open(&path).is_err());
    }
}
