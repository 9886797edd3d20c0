use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{currency::LocaleConfig, errors::LedgerError};

/// Stores application preferences and storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default = "Config::default_retention")]
    pub backup_retention: usize,
    /// Optional custom root for account documents. Defaults to
    /// `~/Documents/PDDE/Accounts`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_root: Option<PathBuf>,
    /// Optional custom root for backups. Defaults to `~/Documents/PDDE/Backups`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backups_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            backup_retention: Self::default_retention(),
            accounts_root: None,
            backups_root: None,
        }
    }
}

impl Config {
    pub fn default_retention() -> usize {
        5
    }

    pub fn resolve_accounts_root(&self) -> PathBuf {
        if let Some(path) = &self.accounts_root {
            return path.clone();
        }
        default_base().join("PDDE").join("Accounts")
    }

    pub fn resolve_backups_root(&self) -> PathBuf {
        if let Some(path) = &self.backups_root {
            return path.clone();
        }
        default_base().join("PDDE").join("Backups")
    }

    pub fn load_from(path: &Path) -> Result<Self, LedgerError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

fn default_base() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
