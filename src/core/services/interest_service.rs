//! Proportional apportionment of bank-reported interest across the programs
//! sharing one account.

use rust_decimal::Decimal;

use crate::{
    currency::round_currency,
    domain::{Account, BalanceScope, Movement, Period, Resource, Split},
};

use super::BalanceService;

const RESOURCES: [Resource; 2] = [Resource::Capital, Resource::Operating];

/// Draft credit/debit figures for one program in the month being saved.
///
/// Entry order is meaningful: it drives the display order of the resulting
/// movements and breaks ties when assigning the rounding residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEntry {
    pub program: String,
    pub credit: Split,
    pub debit: Split,
}

impl ProgramEntry {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            credit: Split::ZERO,
            debit: Split::ZERO,
        }
    }

    pub fn with_amounts(program: impl Into<String>, credit: Split, debit: Split) -> Self {
        Self {
            program: program.into(),
            credit,
            debit,
        }
    }
}

/// Outcome of apportioning one month's reported interest.
#[derive(Debug, Clone)]
pub struct Apportionment {
    /// One finalized movement per submitted entry, in entry order.
    pub movements: Vec<Movement>,
    /// Sum of every program's clamped base balance for the month.
    pub pool: Decimal,
    /// Reported interest left unassigned because every base balance was
    /// zero. Non-zero values mean money is unaccounted for and deserve the
    /// caller's attention.
    pub undistributed: Decimal,
}

impl Apportionment {
    pub fn is_degenerate(&self) -> bool {
        !self.undistributed.is_zero()
    }

    pub fn distributed_total(&self) -> Decimal {
        self.movements
            .iter()
            .map(Movement::total_interest)
            .sum()
    }
}

/// Splits a single bank-reported interest figure across programs in
/// proportion to their post-transaction base balances.
pub struct InterestService;

impl InterestService {
    /// Finalizes one month of entries for `account`.
    ///
    /// Each program's base per resource category is
    /// `max(0, prior balance + credit − debit)`: a program that would go
    /// negative neither feeds nor draws from the interest pool. When the
    /// pool is positive, shares are `reported × base / pool`, rounded to
    /// cents; the rounding residue is assigned to the cell with the largest
    /// base (ties: first entry, Capital before Operating) so the shares sum
    /// to the reported figure exactly. A zero pool distributes nothing.
    ///
    /// Pure over its inputs; the account is only read, never mutated.
    pub fn apportion(
        account: &Account,
        period: Period,
        reported_total: Decimal,
        entries: &[ProgramEntry],
    ) -> Apportionment {
        let reported = round_currency(reported_total);

        let mut bases: Vec<Split> = Vec::with_capacity(entries.len());
        let mut pool = Decimal::ZERO;
        for entry in entries {
            let mut base = Split::ZERO;
            for resource in RESOURCES {
                let scope = match resource {
                    Resource::Capital => BalanceScope::Capital,
                    Resource::Operating => BalanceScope::Operating,
                };
                let prior =
                    BalanceService::prior_balance(account, &entry.program, scope, period);
                let candidate = prior + entry.credit.get(resource) - entry.debit.get(resource);
                *base.get_mut(resource) = candidate.max(Decimal::ZERO);
            }
            pool += base.total();
            bases.push(base);
        }

        let mut movements: Vec<Movement> = entries
            .iter()
            .map(|entry| {
                let mut movement = Movement::new(entry.program.clone(), period);
                movement.credit = entry.credit;
                movement.debit = entry.debit;
                movement
            })
            .collect();

        if pool <= Decimal::ZERO {
            if !reported.is_zero() {
                tracing::warn!(
                    account = %account.name,
                    %period,
                    reported = %reported,
                    "interest pool is empty; reported interest left unassigned"
                );
            }
            return Apportionment {
                movements,
                pool,
                undistributed: reported,
            };
        }

        let mut distributed = Decimal::ZERO;
        let mut largest: Option<(usize, Resource, Decimal)> = None;
        for (index, base) in bases.iter().enumerate() {
            for resource in RESOURCES {
                let cell = base.get(resource);
                let share = round_currency(reported * cell / pool);
                *movements[index].interest.get_mut(resource) = share;
                distributed += share;
                match largest {
                    Some((_, _, best)) if cell <= best => {}
                    _ if cell.is_zero() => {}
                    _ => largest = Some((index, resource, cell)),
                }
            }
        }

        let residue = reported - distributed;
        if !residue.is_zero() {
            if let Some((index, resource, _)) = largest {
                *movements[index].interest.get_mut(resource) += residue;
            }
        }

        Apportionment {
            movements,
            pool,
            undistributed: Decimal::ZERO,
        }
    }
}
