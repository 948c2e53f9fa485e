pub mod json_backend;
pub mod paid_store;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{domain::BudgetBook, errors::Result, utils::paths::ensure_dir};

const TMP_SUFFIX: &str = "tmp";

/// Persistence backends able to store budget books and their snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &BudgetBook, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<BudgetBook>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<BudgetBook>;
}

pub use json_backend::JsonStorage;
pub use paid_store::JsonPaidStore;

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file, syncs it, then renames it over `path`.
pub(crate) fn write_durable(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let written = write_and_rename(&tmp, path, data);
    if written.is_err() && tmp.exists() {
        if let Err(err) = fs::remove_file(&tmp) {
            tracing::warn!(path = %tmp.display(), error = %err, "failed to remove temp file");
        }
    }
    written
}

fn write_and_rename(tmp: &Path, path: &Path, data: &str) -> Result<()> {
    {
        let mut file = File::create(tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("books/family.json")),
            Path::new("books/family.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("ledger")), Path::new("ledger.tmp"));
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("family.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "occupied").unwrap();

        assert!(write_durable(&target, "{}").is_err());
        assert!(!tmp_path(&target).exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn successful_write_replaces_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("family.json");
        write_durable(&target, "old").unwrap();
        write_durable(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!tmp_path(&target).exists());
    }
}
