use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Portuguese month names, indexed by `month - 1` (reference locale).
const MONTH_LABELS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// One calendar month of one fiscal year.
///
/// Field order gives the derived `Ord` chronological meaning: a period is
/// "before" another when its `(year, month)` pair is smaller.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// January of `year`, the opening period for yearly statements.
    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Month name in the reference locale, e.g. `"Janeiro"`.
    pub fn label(&self) -> &'static str {
        MONTH_LABELS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_chronologically() {
        let december = Period::new(2023, 12).unwrap();
        let january = Period::new(2024, 1).unwrap();
        assert!(december < january);
        assert_eq!(december.next(), january);
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
    }

    #[test]
    fn labels_use_reference_locale() {
        assert_eq!(Period::january(2024).label(), "Janeiro");
        assert_eq!(Period::new(2024, 12).unwrap().label(), "Dezembro");
    }
}
