//! Balance reconstruction by replaying movements against the initial balance.

use rust_decimal::Decimal;

use crate::domain::{Account, BalanceScope, Period};

/// Computes program balances as of a target period.
pub struct BalanceService;

impl BalanceService {
    /// Balance of `program` at the start of `period`.
    ///
    /// Seeds with the program's initial balance and adds
    /// `credit + interest − debit` for every movement strictly before the
    /// period. Movements of the period itself are never included. A program
    /// the account has never seen reads as zero, so newly-added programs
    /// stay computable.
    pub fn prior_balance(
        account: &Account,
        program: &str,
        scope: BalanceScope,
        period: Period,
    ) -> Decimal {
        let mut balance = account.initial_balance(program).scoped(scope);
        for movement in account.movements().iter() {
            if movement.program == program && movement.period < period {
                balance += movement.net(scope);
            }
        }
        balance
    }

    /// Balance of `program` at the end of `period` (movement of the period
    /// included). Used for entry-form previews.
    pub fn balance_after(
        account: &Account,
        program: &str,
        scope: BalanceScope,
        period: Period,
    ) -> Decimal {
        let mut balance = Self::prior_balance(account, program, scope, period);
        if let Some(movement) = account.movements().get(program, period) {
            balance += movement.net(scope);
        }
        balance
    }
}
