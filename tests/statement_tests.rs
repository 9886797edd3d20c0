use pdde_core::{
    core::services::{BalanceService, InterestService, ProgramEntry, StatementService},
    domain::{Account, BalanceScope, Period, Split},
};
use rust_decimal_macros::dec;

/// Builds an account with two programs and two finalized years of movements,
/// going through the apportionment path like the entry form would.
fn account_with_two_years() -> Account {
    let mut account = Account::new("27.922-6");
    account.add_program("PDDE Básico");
    account.add_program("PDDE Qualidade");
    account.set_initial_balance("PDDE Básico", Split::new(dec!(500), dec!(250)));

    let months = [
        (2023, 11, dec!(2.40)),
        (2023, 12, dec!(2.55)),
        (2024, 1, dec!(2.70)),
        (2024, 4, dec!(3.05)),
    ];
    for (year, month, reported) in months {
        let period = Period::new(year, month).unwrap();
        let mut basico = ProgramEntry::new("PDDE Básico");
        basico.credit.operating = dec!(100);
        basico.debit.capital = dec!(40);
        let mut qualidade = ProgramEntry::new("PDDE Qualidade");
        qualidade.credit.capital = dec!(60);
        let result =
            InterestService::apportion(&account, period, reported, &[basico, qualidade]);
        account.replace_month(period, result.movements);
    }
    account
}

#[test]
fn monthly_statement_orders_rows_and_accumulates() {
    let account = account_with_two_years();
    let statements = StatementService::monthly_statement(&account, None, 2024);

    assert_eq!(statements.len(), 2);
    for statement in &statements {
        let months: Vec<u32> = statement.rows.iter().map(|r| r.period.month).collect();
        assert_eq!(months, vec![1, 4], "rows must be sorted by month");

        let opening = BalanceService::prior_balance(
            &account,
            &statement.program,
            BalanceScope::Total,
            Period::january(2024),
        );
        let replayed: rust_decimal::Decimal = statement
            .rows
            .iter()
            .map(|r| r.credit + r.interest_total - r.debit)
            .sum();
        assert_eq!(
            statement.rows.last().unwrap().balance_total,
            opening + replayed,
            "running balance must equal opening plus replayed flows"
        );
        assert_eq!(
            statement.totals.balance_total,
            statement.rows.last().unwrap().balance_total
        );
    }
}

#[test]
fn program_filter_restricts_the_statement() {
    let account = account_with_two_years();
    let statements =
        StatementService::monthly_statement(&account, Some("PDDE Qualidade"), 2024);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].program, "PDDE Qualidade");
}

#[test]
fn annual_summary_chains_into_the_next_year() {
    let account = account_with_two_years();

    for year in [2023, 2024] {
        let summary = StatementService::annual_summary(&account, year);
        assert_eq!(summary.rows.len(), 2);
        for row in &summary.rows {
            let next_opening = BalanceService::prior_balance(
                &account,
                &row.program,
                BalanceScope::Total,
                Period::january(year + 1),
            );
            assert_eq!(
                row.closing_balance, next_opening,
                "closing balance of {year} must open {} for {}",
                year + 1,
                row.program
            );
        }
    }
}

#[test]
fn grand_total_sums_every_column() {
    let account = account_with_two_years();
    let summary = StatementService::annual_summary(&account, 2024);

    let mut opening = rust_decimal::Decimal::ZERO;
    let mut credit = rust_decimal::Decimal::ZERO;
    let mut interest = rust_decimal::Decimal::ZERO;
    let mut debit = rust_decimal::Decimal::ZERO;
    let mut closing = rust_decimal::Decimal::ZERO;
    for row in &summary.rows {
        opening += row.opening_balance;
        credit += row.credit;
        interest += row.interest;
        debit += row.debit;
        closing += row.closing_balance;
    }

    assert_eq!(summary.grand_total.opening_balance, opening);
    assert_eq!(summary.grand_total.credit, credit);
    assert_eq!(summary.grand_total.interest, interest);
    assert_eq!(summary.grand_total.debit, debit);
    assert_eq!(summary.grand_total.closing_balance, closing);
}

#[test]
fn year_without_movements_yields_no_statement_blocks() {
    let account = account_with_two_years();
    let statements = StatementService::monthly_statement(&account, None, 2026);
    assert!(statements.is_empty());

    // The annual summary still lists every program, carrying balances only.
    let summary = StatementService::annual_summary(&account, 2026);
    assert_eq!(summary.rows.len(), 2);
    for row in &summary.rows {
        assert_eq!(row.credit, rust_decimal::Decimal::ZERO);
        assert_eq!(row.opening_balance, row.closing_balance);
    }
}
