use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::AmountFormat,
    errors::{BudgetError, Result},
    storage::write_durable,
    utils::paths::{ensure_dir, PathResolver},
};

const DEFAULT_BOOK: &str = "household";

/// User preferences persisted next to the data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Months shown before the current one in the month picker.
    pub months_before: u32,
    pub months_after: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            months_before: 6,
            months_after: 6,
            last_opened_book: None,
        }
    }
}

impl Config {
    pub fn amount_format(&self) -> AmountFormat {
        AmountFormat::for_locale(&self.locale, &self.currency)
    }

    pub fn book_name(&self) -> &str {
        self.last_opened_book.as_deref().unwrap_or(DEFAULT_BOOK)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            BudgetError::ConfigError(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_durable(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
