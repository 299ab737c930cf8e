//! Chilean tax identifier (RUT) value object.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, ValueObject};

/// A validated RUT: numeric body plus modulo-11 check digit.
///
/// Accepts the usual spellings (`76.543.210-3`, `76543210-3`, `765432103`)
/// and stores the normalized `body-dv` form with an uppercase `K`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId {
    body: u32,
    check_digit: char,
}

impl ValueObject for TaxId {}

impl TaxId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        if cleaned.len() < 2 {
            return Err(DomainError::validation(format!("tax id too short: {raw:?}")));
        }

        let (digits, dv) = cleaned.split_at(cleaned.len() - 1);
        if digits.len() > 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!("malformed tax id: {raw:?}")));
        }

        let body: u32 = digits
            .parse()
            .map_err(|_| DomainError::validation(format!("malformed tax id: {raw:?}")))?;
        // `dv` is exactly one ASCII char after the split above.
        let check_digit = dv.chars().next().unwrap_or(' ');

        let expected = Self::check_digit_for(body);
        if check_digit != expected {
            return Err(DomainError::validation(format!(
                "invalid tax id check digit for {raw:?} (expected {expected})"
            )));
        }

        Ok(Self { body, check_digit })
    }

    /// Modulo-11 check digit with weights 2..=7 applied right to left.
    pub fn check_digit_for(body: u32) -> char {
        let mut sum = 0u32;
        let mut weight = 2u32;
        let mut rest = body;
        while rest > 0 {
            sum += (rest % 10) * weight;
            rest /= 10;
            weight = if weight == 7 { 2 } else { weight + 1 };
        }

        match 11 - (sum % 11) {
            11 => '0',
            10 => 'K',
            d => char::from_digit(d, 10).unwrap_or('0'),
        }
    }

    pub fn body(&self) -> u32 {
        self.body
    }

    pub fn check_digit(&self) -> char {
        self.check_digit
    }

    /// Display form with thousands dots, e.g. `12.345.678-5`.
    pub fn formatted(&self) -> String {
        let digits = self.body.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{grouped}-{}", self.check_digit)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.body, self.check_digit)
    }
}

impl FromStr for TaxId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaxId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxId> for String {
    fn from(value: TaxId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_common_spellings() {
        let dotted = TaxId::parse("12.345.678-5").unwrap();
        let plain = TaxId::parse("123456785").unwrap();
        assert_eq!(dotted, plain);
        assert_eq!(dotted.to_string(), "12345678-5");
        assert_eq!(dotted.formatted(), "12.345.678-5");
    }

    #[test]
    fn k_check_digit_is_case_insensitive() {
        let id = TaxId::parse("1.000.005-k").unwrap();
        assert_eq!(id.check_digit(), 'K');
        assert_eq!(id.formatted(), "1.000.005-K");
    }

    #[test]
    fn zero_check_digit() {
        assert_eq!(TaxId::check_digit_for(1_000_013), '0');
        assert!(TaxId::parse("1000013-0").is_ok());
    }

    #[test]
    fn rejects_wrong_check_digit() {
        let err = TaxId::parse("76.543.210-K").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("expected 3")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(TaxId::parse("").is_err());
        assert!(TaxId::parse("-").is_err());
        assert!(TaxId::parse("12a45678-5").is_err());
    }

    proptest! {
        /// Property: every body paired with its computed digit parses back.
        #[test]
        fn computed_check_digit_always_validates(body in 1_000_000u32..99_999_999u32) {
            let raw = format!("{}-{}", body, TaxId::check_digit_for(body));
            let parsed = TaxId::parse(&raw).unwrap();
            prop_assert_eq!(parsed.body(), body);
            prop_assert_eq!(TaxId::parse(&parsed.formatted()).unwrap(), parsed);
        }
    }
}
