//! Currency rounding and tax back-calculation.
//!
//! Amounts stay exact [`Decimal`]s through every sum. Rounding to whole
//! currency units happens once, when a figure is presented.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Round to a whole currency unit, halves away from zero.
///
/// For the non-negative amounts reports deal in this is the classic
/// round-half-up.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole-unit amount with dot thousands separators, e.g. `$1.234.567`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_currency(value);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    grouped.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Net/tax split of a tax-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxSplit {
    pub gross: Decimal,
    pub net: Decimal,
    pub tax: Decimal,
}

impl TaxSplit {
    /// Back-calculate `net = gross / (1 + rate)` and `tax = gross - net`.
    pub fn from_gross(gross: Decimal, rate: Decimal) -> Self {
        if gross.is_zero() {
            return Self {
                gross,
                net: Decimal::ZERO,
                tax: Decimal::ZERO,
            };
        }

        let divisor = Decimal::ONE + rate;
        let net = gross.checked_div(divisor).unwrap_or(gross);
        Self {
            gross,
            net,
            tax: gross - net,
        }
    }

    /// Presentation form: net rounded half-up, tax taking the remainder so
    /// `net + tax` still equals the rounded gross.
    pub fn rounded(&self) -> Self {
        let gross = round_currency(self.gross);
        let net = round_currency(self.net);
        Self {
            gross,
            net,
            tax: gross - net,
        }
    }
}
