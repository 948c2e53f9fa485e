use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::BudgetBook,
    errors::{BudgetError, Result},
    utils::paths::{ensure_dir, PathResolver},
};

use super::{write_durable, StorageBackend};

const BOOK_EXTENSION: &str = "json";
const PAID_SUFFIX: &str = "paid";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// File-per-book JSON storage with rotating backups.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let books_dir = PathResolver::books_dir_in(&root);
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&books_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            books_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    /// Location of the paid-item ledger that belongs to a book.
    pub fn paid_ledger_path(&self, name: &str) -> PathBuf {
        self.books_dir.join(format!(
            "{}.{}.{}",
            canonical_name(name),
            PAID_SUFFIX,
            BOOK_EXTENSION
        ))
    }

    /// Loads the named book, or starts an empty one when no file exists yet.
    pub fn load_or_create(&self, name: &str) -> Result<BudgetBook> {
        if self.book_path(name).exists() {
            self.load(name)
        } else {
            tracing::info!(book = name, "no stored book found, starting empty");
            Ok(BudgetBook::new(name))
        }
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!("{}_{}.{}", canonical_name(name), timestamp, BOOK_EXTENSION);
        fs::copy(path, dir.join(&backup_name))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(name, entry)) {
                tracing::warn!(backup = %entry, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, book: &BudgetBook, name: &str) -> Result<()> {
        let path = self.book_path(name);
        self.backup_existing_file(name, &path)?;
        let json = serde_json::to_string_pretty(book)?;
        write_durable(&path, &json)?;
        tracing::info!(book = name, path = %path.display(), "book saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<BudgetBook> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(BudgetError::StorageError(format!(
                "book `{}` not found at {}",
                name,
                path.display()
            )));
        }
        let book = load_book_from_path(&path)?;
        for plan in book.plans_with_invalid_dates() {
            tracing::warn!(
                book = name,
                plan = %plan.id,
                start = %plan.start_date,
                end = %plan.end_date,
                "installment plan has an unparseable date range and is treated as inactive"
            );
        }
        tracing::info!(book = name, obligations = book.obligations().len(), "book loaded");
        Ok(book)
    }

    /// Backup file names, newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<BudgetBook> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(BudgetError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let book = load_book_from_path(&backup_path)?;
        self.save(&book, name)?;
        Ok(book)
    }
}

pub fn load_book_from_path(path: &Path) -> Result<BudgetBook> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "book".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", BOOK_EXTENSION))?;
    let mut parts = stem.rsplitn(3, '_');
    let time_part = parts.next()?;
    let date_part = parts.next()?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date_part}{time_part}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
