//! Statement and summary derivation by chronological replay.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Account, BalanceScope, Period};

use super::BalanceService;

pub const GRAND_TOTAL_LABEL: &str = "TOTAL GERAL";

/// One statement line: a month's movement plus the running balances after it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementRow {
    pub program: String,
    pub period: Period,
    pub credit: Decimal,
    pub interest_capital: Decimal,
    pub interest_operating: Decimal,
    pub interest_total: Decimal,
    pub debit: Decimal,
    pub balance_operating: Decimal,
    pub balance_capital: Decimal,
    pub balance_total: Decimal,
}

/// Synthetic TOTAL line closing a program's statement: summed flow columns
/// and the final running balances.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StatementTotals {
    pub credit: Decimal,
    pub interest_capital: Decimal,
    pub interest_operating: Decimal,
    pub interest_total: Decimal,
    pub debit: Decimal,
    pub balance_operating: Decimal,
    pub balance_capital: Decimal,
    pub balance_total: Decimal,
}

/// Monthly statement of one program for one year.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramStatement {
    pub program: String,
    pub rows: Vec<StatementRow>,
    pub totals: StatementTotals,
}

/// One line of the year-end summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    pub program: String,
    pub opening_balance: Decimal,
    pub credit: Decimal,
    pub interest: Decimal,
    pub debit: Decimal,
    pub closing_balance: Decimal,
}

/// Year-end summary across every program of an account.
#[derive(Debug, Clone, Serialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub rows: Vec<SummaryRow>,
    pub grand_total: SummaryRow,
}

/// Derives running-balance statements and year-end summaries.
pub struct StatementService;

impl StatementService {
    /// Monthly statement for `year`, one block per program.
    ///
    /// Pass `program_filter` to restrict the statement to a single program.
    /// Programs with no movement in the year produce no block. Rows are
    /// ordered by month; running balances accumulate from the balance at the
    /// start of January.
    pub fn monthly_statement(
        account: &Account,
        program_filter: Option<&str>,
        year: i32,
    ) -> Vec<ProgramStatement> {
        let programs: Vec<&String> = match program_filter {
            Some(filter) => account.programs.iter().filter(|p| *p == filter).collect(),
            None => account.programs.iter().collect(),
        };

        let mut statements = Vec::new();
        for program in programs {
            let movements = account.movements().for_program_in_year(program, year);
            if movements.is_empty() {
                continue;
            }

            let opening = Period::january(year);
            let mut capital =
                BalanceService::prior_balance(account, program, BalanceScope::Capital, opening);
            let mut operating =
                BalanceService::prior_balance(account, program, BalanceScope::Operating, opening);

            let mut rows = Vec::with_capacity(movements.len());
            let mut totals = StatementTotals::default();
            for movement in movements {
                capital += movement.net(BalanceScope::Capital);
                operating += movement.net(BalanceScope::Operating);

                totals.credit += movement.total_credit();
                totals.interest_capital += movement.interest.capital;
                totals.interest_operating += movement.interest.operating;
                totals.interest_total += movement.total_interest();
                totals.debit += movement.total_debit();

                rows.push(StatementRow {
                    program: program.clone(),
                    period: movement.period,
                    credit: movement.total_credit(),
                    interest_capital: movement.interest.capital,
                    interest_operating: movement.interest.operating,
                    interest_total: movement.total_interest(),
                    debit: movement.total_debit(),
                    balance_operating: operating,
                    balance_capital: capital,
                    balance_total: capital + operating,
                });
            }

            totals.balance_capital = capital;
            totals.balance_operating = operating;
            totals.balance_total = capital + operating;

            statements.push(ProgramStatement {
                program: program.clone(),
                rows,
                totals,
            });
        }
        statements
    }

    /// Year-end summary: opening balance, yearly flow totals, and closing
    /// balance per program, plus a grand-total line.
    ///
    /// The closing balance of year `Y` equals the prior balance at January
    /// of `Y + 1`, so summaries chain across year boundaries.
    pub fn annual_summary(account: &Account, year: i32) -> AnnualSummary {
        let opening_period = Period::january(year);
        let mut rows = Vec::with_capacity(account.programs.len());
        let mut grand_total = SummaryRow {
            program: GRAND_TOTAL_LABEL.into(),
            opening_balance: Decimal::ZERO,
            credit: Decimal::ZERO,
            interest: Decimal::ZERO,
            debit: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
        };

        for program in &account.programs {
            let opening = BalanceService::prior_balance(
                account,
                program,
                BalanceScope::Total,
                opening_period,
            );
            let mut credit = Decimal::ZERO;
            let mut interest = Decimal::ZERO;
            let mut debit = Decimal::ZERO;
            for movement in account.movements().for_program_in_year(program, year) {
                credit += movement.total_credit();
                interest += movement.total_interest();
                debit += movement.total_debit();
            }
            let closing = opening + credit + interest - debit;

            grand_total.opening_balance += opening;
            grand_total.credit += credit;
            grand_total.interest += interest;
            grand_total.debit += debit;
            grand_total.closing_balance += closing;

            rows.push(SummaryRow {
                program: program.clone(),
                opening_balance: opening,
                credit,
                interest,
                debit,
                closing_balance: closing,
            });
        }

        AnnualSummary {
            year,
            rows,
            grand_total,
        }
    }
}
