pub mod account_service;
pub mod balance_service;
pub mod interest_service;
pub mod statement_service;

pub use account_service::AccountService;
pub use balance_service::BalanceService;
pub use interest_service::{Apportionment, InterestService, ProgramEntry};
pub use statement_service::{
    AnnualSummary, ProgramStatement, StatementRow, StatementService, StatementTotals, SummaryRow,
};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
