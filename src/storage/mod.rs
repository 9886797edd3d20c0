pub mod json_backend;

use std::collections::BTreeMap;

use crate::{domain::Account, errors::LedgerError};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends holding one document per account.
///
/// The core only ever needs the full collection up front and single-document
/// writes after each mutation; anything richer is a backend concern.
pub trait StorageBackend: Send + Sync {
    /// Loads every stored account, keyed by account name.
    fn load_all(&self) -> Result<BTreeMap<String, Account>>;
    /// Persists one account document under its name.
    fn save_one(&self, name: &str, account: &Account) -> Result<()>;
}

pub use json_backend::JsonStorage;
