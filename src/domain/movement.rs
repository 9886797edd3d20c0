use std::collections::{BTreeSet, HashSet};
use std::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::Period;

/// Resource category a PDDE amount belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Resource {
    Capital,
    Operating,
}

/// Category selector for balance queries: one resource class, or both combined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BalanceScope {
    Capital,
    Operating,
    Total,
}

/// Paired Capital/Operating amounts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Split {
    #[serde(default)]
    pub capital: Decimal,
    #[serde(default)]
    pub operating: Decimal,
}

impl Split {
    pub const ZERO: Split = Split {
        capital: Decimal::ZERO,
        operating: Decimal::ZERO,
    };

    pub fn new(capital: Decimal, operating: Decimal) -> Self {
        Self { capital, operating }
    }

    pub fn total(&self) -> Decimal {
        self.capital + self.operating
    }

    pub fn get(&self, resource: Resource) -> Decimal {
        match resource {
            Resource::Capital => self.capital,
            Resource::Operating => self.operating,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut Decimal {
        match resource {
            Resource::Capital => &mut self.capital,
            Resource::Operating => &mut self.operating,
        }
    }

    pub fn scoped(&self, scope: BalanceScope) -> Decimal {
        match scope {
            BalanceScope::Capital => self.capital,
            BalanceScope::Operating => self.operating,
            BalanceScope::Total => self.total(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.capital.is_zero() && self.operating.is_zero()
    }
}

impl Add for Split {
    type Output = Split;

    fn add(self, rhs: Split) -> Split {
        Split {
            capital: self.capital + rhs.capital,
            operating: self.operating + rhs.operating,
        }
    }
}

impl AddAssign for Split {
    fn add_assign(&mut self, rhs: Split) {
        self.capital += rhs.capital;
        self.operating += rhs.operating;
    }
}

impl Sub for Split {
    type Output = Split;

    fn sub(self, rhs: Split) -> Split {
        Split {
            capital: self.capital - rhs.capital,
            operating: self.operating - rhs.operating,
        }
    }
}

/// One finalized monthly entry for one program of an account.
///
/// Column totals (`total_credit` and friends) are derived from the per-resource
/// amounts on demand, so they can never disagree with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub program: String,
    pub period: Period,
    #[serde(default)]
    pub credit: Split,
    #[serde(default)]
    pub debit: Split,
    #[serde(default)]
    pub interest: Split,
}

impl Movement {
    pub fn new(program: impl Into<String>, period: Period) -> Self {
        Self {
            program: program.into(),
            period,
            credit: Split::ZERO,
            debit: Split::ZERO,
            interest: Split::ZERO,
        }
    }

    pub fn total_credit(&self) -> Decimal {
        self.credit.total()
    }

    pub fn total_debit(&self) -> Decimal {
        self.debit.total()
    }

    pub fn total_interest(&self) -> Decimal {
        self.interest.total()
    }

    /// Net change this movement applies to a balance of the given scope.
    pub fn net(&self, scope: BalanceScope) -> Decimal {
        self.credit.scoped(scope) + self.interest.scoped(scope) - self.debit.scoped(scope)
    }

    pub fn key(&self) -> (&str, Period) {
        (&self.program, self.period)
    }
}

/// Movement collection holding at most one entry per `(program, period)`.
///
/// Serialized transparently as a plain array for document compatibility; the
/// keyed invariant is maintained by the mutators and re-established by
/// [`MovementSet::normalize`] when loading documents written by other tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MovementSet(Vec<Movement>);

impl MovementSet {
    pub fn iter(&self) -> impl Iterator<Item = &Movement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, program: &str, period: Period) -> Option<&Movement> {
        self.0
            .iter()
            .find(|m| m.program == program && m.period == period)
    }

    /// Inserts `movement`, replacing any existing entry with the same key.
    pub fn upsert(&mut self, movement: Movement) {
        self.0
            .retain(|m| !(m.program == movement.program && m.period == movement.period));
        self.0.push(movement);
    }

    /// Replaces every movement of `period` with the given set.
    ///
    /// Saving a month is a whole-period swap: entries missing from
    /// `movements` are deleted, not carried over.
    pub fn replace_month(&mut self, period: Period, movements: Vec<Movement>) {
        self.0.retain(|m| m.period != period);
        for movement in movements {
            self.upsert(movement);
        }
    }

    pub fn in_month(&self, period: Period) -> Vec<&Movement> {
        self.0.iter().filter(|m| m.period == period).collect()
    }

    /// Movements of `program` in `year`, sorted by month ascending.
    pub fn for_program_in_year(&self, program: &str, year: i32) -> Vec<&Movement> {
        let mut movements: Vec<&Movement> = self
            .0
            .iter()
            .filter(|m| m.program == program && m.period.year == year)
            .collect();
        movements.sort_by_key(|m| m.period);
        movements
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.0.iter().map(|m| m.period.year).collect()
    }

    /// Re-establishes the one-entry-per-key invariant on loaded data.
    ///
    /// Later entries win, mirroring the replace-on-save semantics. Entries
    /// with an out-of-range month are dropped. Returns human-readable
    /// warnings for everything that was discarded.
    pub(crate) fn normalize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen: HashSet<(String, Period)> = HashSet::new();
        let mut kept: Vec<Movement> = Vec::with_capacity(self.0.len());
        for movement in self.0.drain(..).rev() {
            if !movement.period.is_valid() {
                warnings.push(format!(
                    "dropped movement of `{}` with invalid period {}",
                    movement.program, movement.period
                ));
                continue;
            }
            if !seen.insert((movement.program.clone(), movement.period)) {
                warnings.push(format!(
                    "dropped duplicate movement for `{}` in {}",
                    movement.program, movement.period
                ));
                continue;
            }
            kept.push(movement);
        }
        kept.reverse();
        self.0 = kept;
        warnings
    }
}
