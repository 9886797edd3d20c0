use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    movement::{Movement, MovementSet, Split},
    period::Period,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One bank account holding the funds of several PDDE programs.
///
/// The account is the persistence unit: the storage layer keeps one document
/// per account, keyed by its name (the bank account number in practice).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Program names in insertion order; the order matters for display only.
    #[serde(default)]
    pub programs: Vec<String>,
    /// Opening balance per program, seeded at zero when the program is added.
    #[serde(default)]
    pub initial_balances: BTreeMap<String, Split>,
    #[serde(default)]
    movements: MovementSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Account::schema_version_default")]
    pub schema_version: u8,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            programs: Vec::new(),
            initial_balances: BTreeMap::new(),
            movements: MovementSet::default(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn has_program(&self, program: &str) -> bool {
        self.programs.iter().any(|p| p == program)
    }

    /// Registers a program and seeds its initial balance at zero.
    pub fn add_program(&mut self, program: impl Into<String>) {
        let program = program.into();
        self.initial_balances
            .entry(program.clone())
            .or_insert(Split::ZERO);
        self.programs.push(program);
        self.touch();
    }

    /// Initial balance of `program`, zero when the program was never seeded.
    pub fn initial_balance(&self, program: &str) -> Split {
        self.initial_balances
            .get(program)
            .copied()
            .unwrap_or(Split::ZERO)
    }

    pub fn set_initial_balance(&mut self, program: impl Into<String>, balance: Split) {
        self.initial_balances.insert(program.into(), balance);
        self.touch();
    }

    pub fn movements(&self) -> &MovementSet {
        &self.movements
    }

    pub fn upsert_movement(&mut self, movement: Movement) {
        self.movements.upsert(movement);
        self.touch();
    }

    /// Swaps out every movement of `period` for the given set.
    pub fn replace_month(&mut self, period: Period, movements: Vec<Movement>) {
        self.movements.replace_month(period, movements);
        self.touch();
    }

    /// Every year that appears in this account's movements.
    pub fn years(&self) -> BTreeSet<i32> {
        self.movements.years()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Applies the defaulting and uniqueness rules to a loaded document.
    ///
    /// Movements are deduplicated (last entry wins), programs get their
    /// initial-balance entry seeded, and movements referencing a program the
    /// account does not list are kept but reported; balance queries treat
    /// unknown programs as zero-seeded rather than failing.
    pub(crate) fn normalize(&mut self) -> Vec<String> {
        let mut warnings = self.movements.normalize();
        for program in &self.programs {
            self.initial_balances
                .entry(program.clone())
                .or_insert(Split::ZERO);
        }
        for movement in self.movements.iter() {
            if !self.programs.iter().any(|p| p == &movement.program) {
                warnings.push(format!(
                    "movement {} references program `{}` not listed on account `{}`",
                    movement.period, movement.program, self.name
                ));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn add_program_seeds_zero_initial_balance() {
        let mut account = Account::new("27.922-6");
        account.add_program("PDDE Básico");

        assert!(account.has_program("PDDE Básico"));
        assert_eq!(account.initial_balance("PDDE Básico"), Split::ZERO);
    }

    #[test]
    fn unknown_program_reads_as_zero() {
        let account = Account::new("27.922-6");
        assert_eq!(account.initial_balance("missing"), Split::ZERO);
    }

    #[test]
    fn normalize_seeds_missing_balance_entries_and_reports_strays() {
        let mut account = Account::new("A");
        account.programs.push("P1".into());
        let mut stray = Movement::new("ghost", Period::new(2024, 2).unwrap());
        stray.credit.capital = dec!(5);
        account.movements.upsert(stray);

        let warnings = account.normalize();

        assert_eq!(account.initial_balance("P1"), Split::ZERO);
        assert!(account.initial_balances.contains_key("P1"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ghost"));
    }
}
