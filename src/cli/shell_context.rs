use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::{
    config::{Config, ConfigManager},
    currency::AmountFormat,
    domain::{BudgetBook, InstanceId, MonthKey},
    errors::{BudgetError, CliError},
    payments::PaymentTracker,
    storage::{JsonPaidStore, JsonStorage, StorageBackend},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every shell command.
pub struct ShellContext {
    pub mode: CliMode,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub book_name: String,
    pub book: BudgetBook,
    pub tracker: PaymentTracker<JsonPaidStore>,
    pub today: NaiveDate,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, None, Local::now().date_naive())
    }

    /// Opens the configured book under `base` (or the default data directory).
    pub fn open(mode: CliMode, base: Option<PathBuf>, today: NaiveDate) -> Result<Self, CliError> {
        let storage = JsonStorage::new(base, None)?;
        let config_manager = ConfigManager::with_base_dir(storage.base_dir().to_path_buf())?;
        let config = config_manager.load()?;
        let book_name = config.book_name().to_string();
        let book = storage.load_or_create(&book_name)?;
        let paid = JsonPaidStore::open(storage.paid_ledger_path(&book_name))?;
        Ok(Self {
            mode,
            storage,
            config_manager,
            config,
            book_name,
            book,
            tracker: PaymentTracker::new(paid),
            today,
            last_command: None,
            running: true,
        })
    }

    pub fn current_month(&self) -> MonthKey {
        MonthKey::from_date(self.today)
    }

    pub fn amount_format(&self) -> AmountFormat {
        self.config.amount_format()
    }

    pub fn prompt(&self) -> String {
        format!("fambudget [{}]> ", self.book_name)
    }

    pub fn save_book(&mut self) -> Result<(), BudgetError> {
        self.book.touch();
        self.storage.save(&self.book, &self.book_name)
    }

    /// Resolves a 1-based list position or a textual instance id.
    pub fn resolve_ref(&self, raw: &str) -> Result<InstanceId, BudgetError> {
        if let Ok(position) = raw.parse::<usize>() {
            return self
                .book
                .obligations()
                .get(position.wrapping_sub(1))
                .map(|item| item.instance_id())
                .ok_or_else(|| {
                    BudgetError::InvalidInput(format!("no obligation at position {position}"))
                });
        }
        let instance: InstanceId = raw.parse()?;
        if self.book.obligation(&instance).is_none() {
            return Err(BudgetError::ObligationNotFound(instance));
        }
        Ok(instance)
    }
}
