//! Validated CRUD helpers for accounts and their programs.

use crate::domain::{Account, Split};

use super::{ServiceError, ServiceResult};

/// Administrative operations on the ledger model.
pub struct AccountService;

impl AccountService {
    /// Creates an empty account with the given name.
    pub fn create(name: &str) -> ServiceResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("account name must not be blank".into()));
        }
        Ok(Account::new(name))
    }

    /// Registers a program on the account, seeding its initial balance at
    /// zero.
    pub fn add_program(account: &mut Account, program: &str) -> ServiceResult<()> {
        let program = program.trim();
        if program.is_empty() {
            return Err(ServiceError::Invalid("program name must not be blank".into()));
        }
        if account.has_program(program) {
            return Err(ServiceError::Invalid(format!(
                "program `{program}` already exists on account `{}`",
                account.name
            )));
        }
        account.add_program(program);
        Ok(())
    }

    /// Overwrites the initial balance of an existing program.
    pub fn set_initial_balance(
        account: &mut Account,
        program: &str,
        balance: Split,
    ) -> ServiceResult<()> {
        if !account.has_program(program) {
            return Err(ServiceError::Invalid(format!(
                "program `{program}` is not registered on account `{}`",
                account.name
            )));
        }
        account.set_initial_balance(program, balance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn create_rejects_blank_names() {
        assert!(AccountService::create("  ").is_err());
        assert!(AccountService::create("27.922-6").is_ok());
    }

    #[test]
    fn add_program_rejects_duplicates() {
        let mut account = AccountService::create("A").unwrap();
        AccountService::add_program(&mut account, "PDDE Básico").unwrap();
        let err = AccountService::add_program(&mut account, "PDDE Básico")
            .expect_err("duplicate program must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn set_initial_balance_requires_known_program() {
        let mut account = AccountService::create("A").unwrap();
        let err = AccountService::set_initial_balance(
            &mut account,
            "ghost",
            Split::new(dec!(10), dec!(0)),
        )
        .expect_err("unknown program must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));

        AccountService::add_program(&mut account, "P1").unwrap();
        AccountService::set_initial_balance(&mut account, "P1", Split::new(dec!(10), dec!(5)))
            .unwrap();
        assert_eq!(account.initial_balance("P1"), Split::new(dec!(10), dec!(5)));
    }
}
