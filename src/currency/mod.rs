use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places carried by currency amounts.
pub const MINOR_UNITS: u32 = 2;

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub symbol: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            symbol: "R$".into(),
        }
    }
}

static REFERENCE_LOCALE: Lazy<LocaleConfig> = Lazy::new(LocaleConfig::default);

/// The pt-BR reference locale used when no explicit locale is configured.
pub fn reference_locale() -> &'static LocaleConfig {
    &REFERENCE_LOCALE
}

/// Rounds `value` to the currency's minor units, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders `value` with the locale's separators, e.g. `1.234,56`.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let mut body = format!("{:.*}", precision as usize, rounded);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(pos) = body.find(locale.decimal_separator) {
        let mut int_part = body[..pos].to_string();
        insert_grouping(&mut int_part, locale.grouping_separator);
        body = format!("{}{}", int_part, &body[pos..]);
    } else {
        insert_grouping(&mut body, locale.grouping_separator);
    }
    body
}

/// Renders a currency amount with symbol, e.g. `R$ 1.234,56`.
pub fn format_currency(locale: &LocaleConfig, value: Decimal) -> String {
    format!(
        "{} {}",
        locale.symbol,
        format_number(locale, value, MINOR_UNITS)
    )
}

fn insert_grouping(int_part: &mut String, separator: char) {
    let mut cleaned = int_part.replace(separator, "");
    if cleaned.starts_with('-') {
        let sign = cleaned.remove(0);
        let grouped = group_digits(&cleaned, separator);
        *int_part = format!("{}{}", sign, grouped);
    } else {
        *int_part = group_digits(&cleaned, separator);
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_reference_locale_amounts() {
        let locale = reference_locale();
        assert_eq!(format_currency(locale, dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(locale, dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(locale, dec!(-9876543.2)), "R$ -9.876.543,20");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_currency(dec!(0.005)), dec!(0.01));
        assert_eq!(round_currency(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_currency(dec!(1.004)), dec!(1.00));
    }
}
