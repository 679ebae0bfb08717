//! Money: a non-negative decimal amount in a single currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::{EqualityComponent, ValueObject};

/// A non-negative amount of money.
///
/// The currency code is trimmed and upper-cased on construction. Arithmetic
/// never converts between currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MoneyFields")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

#[derive(Deserialize)]
struct MoneyFields {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyFields> for Money {
    type Error = DomainError;

    fn try_from(value: MoneyFields) -> Result<Self, Self::Error> {
        Money::new(value.amount, &value.currency)
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation("amount", "cannot be negative"));
        }

        let currency = currency.trim();
        if currency.is_empty() {
            return Err(DomainError::validation("currency", "cannot be empty"));
        }

        Ok(Self {
            amount,
            currency: currency.to_uppercase(),
        })
    }

    pub fn zero(currency: &str) -> DomainResult<Self> {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn symbol(&self) -> &str {
        match self.currency.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            other => other,
        }
    }

    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        if !self.same_currency(other) {
            return Err(DomainError::currency_mismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| DomainError::validation("amount", "overflows"))?;
        Money::new(amount, &self.currency)
    }

    /// Scale the amount. A negative multiplier on a non-zero amount fails
    /// validation because the result would be negative.
    pub fn multiply(&self, multiplier: Decimal) -> DomainResult<Money> {
        let amount = self
            .amount
            .checked_mul(multiplier)
            .ok_or_else(|| DomainError::validation("amount", "overflows"))?;
        Money::new(amount, &self.currency)
    }

    /// Sum an iterator of money values, all of which must be in `currency`.
    pub fn sum<'a>(
        values: impl IntoIterator<Item = &'a Money>,
        currency: &str,
    ) -> DomainResult<Money> {
        values
            .into_iter()
            .try_fold(Money::zero(currency)?, |acc, m| acc.add(m))
    }
}

impl ValueObject for Money {
    fn equality_components(&self) -> Vec<EqualityComponent> {
        vec![self.amount.into(), self.currency.as_str().into()]
    }
}

crate::impl_structural_equality!(Money);

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut amount = self.amount.round_dp(2);
        amount.rescale(2);
        write!(f, "{}{}", self.symbol(), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn construction_boundary() {
        assert!(Money::new(dec!(-0.01), "USD").is_err());
        assert!(Money::new(dec!(0), "USD").is_ok());
    }

    #[test]
    fn negative_amount_names_the_field() {
        let err = Money::new(dec!(-1), "USD").unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn blank_currency_is_rejected() {
        let err = Money::new(dec!(1), "   ").unwrap_err();
        assert_eq!(err.field(), Some("currency"));
    }

    #[test]
    fn currency_is_normalized_to_upper_case() {
        let m = Money::new(dec!(10), " eur ").unwrap();
        assert_eq!(m.currency(), "EUR");
        assert_eq!(m.symbol(), "€");
        assert_eq!(m, Money::new(dec!(10.00), "EUR").unwrap());
    }

    #[test]
    fn add_rejects_mismatched_currency() {
        let a = usd(dec!(1));
        let b = Money::new(dec!(1), "GBP").unwrap();
        assert!(matches!(
            a.add(&b),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn multiply_fails_for_negative_results() {
        let m = usd(dec!(3.50));
        assert_eq!(m.multiply(dec!(2)).unwrap(), usd(dec!(7)));
        assert!(m.multiply(dec!(-1)).is_err());
        assert!(usd(dec!(0)).multiply(dec!(-1)).is_ok());
    }

    #[test]
    fn overflowing_arithmetic_is_a_validation_error() {
        let max = usd(Decimal::MAX);

        let err = max.add(&max).unwrap_err();
        assert_eq!(err.field(), Some("amount"));

        let err = max.multiply(dec!(2)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));

        assert!(Money::sum(&[max.clone(), usd(dec!(1))], "USD").is_err());
        assert_eq!(max.multiply(dec!(1)).unwrap(), max);
    }

    #[test]
    fn sum_totals_same_currency_values() {
        let values = [usd(dec!(1.25)), usd(dec!(2.75))];
        assert_eq!(Money::sum(&values, "USD").unwrap(), usd(dec!(4)));
        assert!(Money::sum(&values, "EUR").is_err());
    }

    #[test]
    fn display_uses_symbol_and_two_decimals() {
        assert_eq!(usd(dec!(5)).to_string(), "$5.00");
        assert_eq!(Money::new(dec!(1.5), "JPY").unwrap().to_string(), "JPY1.50");
    }

    #[test]
    fn deserialization_runs_validation() {
        let ok: Money = serde_json::from_str(r#"{"amount":"12.50","currency":"usd"}"#).unwrap();
        assert_eq!(ok, usd(dec!(12.5)));

        let bad = serde_json::from_str::<Money>(r#"{"amount":"-1","currency":"USD"}"#);
        assert!(bad.is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn add_is_commutative(a in amount(), b in amount()) {
                let (x, y) = (usd(a), usd(b));
                prop_assert_eq!(x.add(&y).unwrap(), y.add(&x).unwrap());
            }

            #[test]
            fn add_is_associative(a in amount(), b in amount(), c in amount()) {
                let (x, y, z) = (usd(a), usd(b), usd(c));
                let left = x.add(&y).unwrap().add(&z).unwrap();
                let right = x.add(&y.add(&z).unwrap()).unwrap();
                prop_assert_eq!(left, right);
            }

            #[test]
            fn add_with_differing_currency_always_fails(a in amount(), b in amount()) {
                let eur = Money::new(b, "EUR").unwrap();
                prop_assert!(usd(a).add(&eur).is_err());
            }
        }
    }
}
