//! Session facade coordinating the in-memory book and the storage collaborator.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Local};
use rust_decimal::Decimal;

use crate::{
    domain::{Account, Movement, Period, Split},
    errors::LedgerError,
    storage::StorageBackend,
};

use super::services::{
    AccountService, Apportionment, InterestService, ProgramEntry, ServiceError, ServiceResult,
};

const SAVE_ATTEMPTS: u32 = 2;

/// Holds the account book for one editing session.
///
/// The book is loaded once, mutated in place, and flushed per account after
/// every mutating operation. A storage failure never aborts the session: the
/// in-memory change survives and the failure is reported to the caller.
pub struct BookManager {
    accounts: BTreeMap<String, Account>,
    extra_years: BTreeSet<i32>,
    storage: Box<dyn StorageBackend>,
    storage_available: bool,
}

impl BookManager {
    /// Loads every account from storage. A failing backend degrades the
    /// session to memory-only instead of refusing to start.
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        let (accounts, storage_available) = match storage.load_all() {
            Ok(accounts) => (accounts, true),
            Err(err) => {
                tracing::error!(%err, "storage unavailable; starting with an empty book");
                (BTreeMap::new(), false)
            }
        };
        Self {
            accounts,
            extra_years: BTreeSet::new(),
            storage,
            storage_available,
        }
    }

    pub fn accounts(&self) -> &BTreeMap<String, Account> {
        &self.accounts
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn storage_available(&self) -> bool {
        self.storage_available
    }

    /// Fiscal years offered for selection: every year present in any
    /// movement, explicitly added years, and the current year.
    pub fn available_years(&self) -> Vec<i32> {
        let mut years = self.extra_years.clone();
        years.insert(Local::now().year());
        for account in self.accounts.values() {
            years.extend(account.years());
        }
        years.into_iter().collect()
    }

    /// Adds a fiscal year to the selectable set. Returns `false` when the
    /// year is already offered.
    pub fn add_year(&mut self, year: i32) -> bool {
        if self.available_years().contains(&year) {
            return false;
        }
        self.extra_years.insert(year)
    }

    pub fn create_account(&mut self, name: &str) -> ServiceResult<()> {
        let account = AccountService::create(name)?;
        if self.accounts.contains_key(&account.name) {
            return Err(ServiceError::Invalid(format!(
                "account `{}` already exists",
                account.name
            )));
        }
        let key = account.name.clone();
        self.accounts.insert(key.clone(), account);
        self.persist(&key)
    }

    pub fn add_program(&mut self, account_name: &str, program: &str) -> ServiceResult<()> {
        let account = self.account_mut(account_name)?;
        AccountService::add_program(account, program)?;
        self.persist(account_name)
    }

    pub fn set_initial_balance(
        &mut self,
        account_name: &str,
        program: &str,
        balance: Split,
    ) -> ServiceResult<()> {
        let account = self.account_mut(account_name)?;
        AccountService::set_initial_balance(account, program, balance)?;
        self.persist(account_name)
    }

    /// Movements already saved for `period`, for prefilling an edited month.
    pub fn existing_month(&self, account_name: &str, period: Period) -> Vec<&Movement> {
        self.accounts
            .get(account_name)
            .map(|account| account.movements().in_month(period))
            .unwrap_or_default()
    }

    /// Sum of the period's saved interest, the prefill for the
    /// bank-statement figure when a month is reopened for editing.
    pub fn reported_interest(&self, account_name: &str, period: Period) -> Decimal {
        self.existing_month(account_name, period)
            .iter()
            .map(|movement| movement.total_interest())
            .sum()
    }

    /// Finalizes one month: apportions the reported interest across the
    /// drafted entries, swaps the period's movements, and persists the
    /// account. The returned [`Apportionment`] carries the degenerate-pool
    /// warning state for the caller to surface.
    pub fn save_month(
        &mut self,
        account_name: &str,
        period: Period,
        reported_total: Decimal,
        entries: &[ProgramEntry],
    ) -> ServiceResult<Apportionment> {
        let apportionment = {
            let account = self
                .accounts
                .get(account_name)
                .ok_or_else(|| LedgerError::UnknownAccount(account_name.into()))?;
            InterestService::apportion(account, period, reported_total, entries)
        };
        let account = self.account_mut(account_name)?;
        account.replace_month(period, apportionment.movements.clone());
        self.persist(account_name)?;
        Ok(apportionment)
    }

    fn account_mut(&mut self, name: &str) -> ServiceResult<&mut Account> {
        self.accounts
            .get_mut(name)
            .ok_or_else(|| ServiceError::from(LedgerError::UnknownAccount(name.into())))
    }

    fn persist(&self, name: &str) -> ServiceResult<()> {
        let account = self
            .accounts
            .get(name)
            .ok_or_else(|| LedgerError::UnknownAccount(name.into()))?;
        if !self.storage_available {
            tracing::warn!(account = name, "storage unavailable; change kept in memory only");
            return Err(ServiceError::Ledger(LedgerError::Persistence(
                "storage unavailable; change kept in memory only".into(),
            )));
        }
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.storage.save_one(name, account) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < SAVE_ATTEMPTS => {
                    tracing::warn!(account = name, attempt, %err, "save failed; retrying");
                }
                Err(err) => return Err(ServiceError::Ledger(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Result as StorageResult;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        accounts: Mutex<BTreeMap<String, Account>>,
    }

    impl StorageBackend for MemoryStorage {
        fn load_all(&self) -> StorageResult<BTreeMap<String, Account>> {
            Ok(self.accounts.lock().unwrap().clone())
        }

        fn save_one(&self, name: &str, account: &Account) -> StorageResult<()> {
            self.accounts
                .lock()
                .unwrap()
                .insert(name.to_string(), account.clone());
            Ok(())
        }
    }

    struct OfflineStorage;

    impl StorageBackend for OfflineStorage {
        fn load_all(&self) -> StorageResult<BTreeMap<String, Account>> {
            Err(LedgerError::Persistence("backend offline".into()))
        }

        fn save_one(&self, _name: &str, _account: &Account) -> StorageResult<()> {
            Err(LedgerError::Persistence("backend offline".into()))
        }
    }

    #[test]
    fn offline_storage_degrades_to_memory_only() {
        let mut manager = BookManager::open(Box::new(OfflineStorage));
        assert!(!manager.storage_available());

        let err = manager
            .create_account("27.922-6")
            .expect_err("persist must be reported as failed");
        assert!(matches!(err, ServiceError::Ledger(_)));
        // The in-memory session keeps working regardless.
        assert!(manager.account("27.922-6").is_some());
    }

    #[test]
    fn save_month_replaces_and_persists() {
        let mut manager = BookManager::open(Box::new(MemoryStorage::default()));
        manager.create_account("A").unwrap();
        manager.add_program("A", "P1").unwrap();
        manager
            .set_initial_balance("A", "P1", Split::new(dec!(100), dec!(0)))
            .unwrap();

        let period = Period::new(2024, 1).unwrap();
        let entries = vec![ProgramEntry::new("P1")];
        let first = manager
            .save_month("A", period, dec!(10), &entries)
            .unwrap();
        assert_eq!(first.movements[0].interest.capital, dec!(10));

        // Re-saving the same month replaces, never accumulates.
        let second = manager
            .save_month("A", period, dec!(4), &entries)
            .unwrap();
        assert_eq!(second.movements[0].interest.capital, dec!(4));
        let account = manager.account("A").unwrap();
        assert_eq!(account.movements().len(), 1);
        assert_eq!(manager.reported_interest("A", period), dec!(4));
    }

    #[test]
    fn available_years_union_movements_current_and_added() {
        let mut manager = BookManager::open(Box::new(MemoryStorage::default()));
        manager.create_account("A").unwrap();
        manager.add_program("A", "P1").unwrap();
        manager
            .save_month(
                "A",
                Period::new(2019, 7).unwrap(),
                Decimal::ZERO,
                &[ProgramEntry::new("P1")],
            )
            .unwrap();

        let current_year = Local::now().year();
        assert!(manager.add_year(current_year + 1));
        assert!(!manager.add_year(current_year + 1));

        let years = manager.available_years();
        assert!(years.contains(&2019));
        assert!(years.contains(&current_year));
        assert!(years.contains(&(current_year + 1)));
    }

    #[test]
    fn unknown_account_is_rejected() {
        let mut manager = BookManager::open(Box::new(MemoryStorage::default()));
        let err = manager
            .save_month(
                "ghost",
                Period::new(2024, 1).unwrap(),
                Decimal::ZERO,
                &[],
            )
            .expect_err("unknown account must fail");
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::UnknownAccount(_))
        ));
    }
}
