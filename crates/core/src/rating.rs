//! Rating: a 0.0–5.0 score held to one decimal place.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::{EqualityComponent, ValueObject};

const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rating {
    value: Decimal,
}

impl TryFrom<Decimal> for Rating {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for Decimal {
    fn from(rating: Rating) -> Self {
        rating.value
    }
}

impl Rating {
    pub const MIN_VALUE: Decimal = Decimal::ZERO;
    pub const MAX_VALUE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
    pub const ZERO: Rating = Rating { value: Decimal::ZERO };

    /// Validate `value` against [0, 5] and round it to one decimal place,
    /// midpoints away from zero.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Self::MIN_VALUE || value > Self::MAX_VALUE {
            return Err(DomainError::validation("rating", "must be between 0 and 5"));
        }

        Ok(Self::rounded(value))
    }

    fn rounded(value: Decimal) -> Self {
        Self {
            value: value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn from_stars(stars: u8) -> DomainResult<Self> {
        if stars > MAX_STARS {
            return Err(DomainError::validation("stars", "must be between 0 and 5"));
        }
        Self::new(Decimal::from(stars))
    }

    /// Scale a 0–100 percentage linearly onto 0–5.
    pub fn from_percentage(percentage: Decimal) -> DomainResult<Self> {
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(
                "percentage",
                "must be between 0 and 100",
            ));
        }
        Self::new(percentage / Decimal::ONE_HUNDRED * Self::MAX_VALUE)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Whole stars, midpoints away from zero.
    pub fn star_count(&self) -> u8 {
        round_to_u8(self.value)
    }

    /// Half-star units (0–10), i.e. `round(value × 2)`.
    pub fn half_star_count(&self) -> u8 {
        round_to_u8(self.value * Decimal::TWO)
    }

    pub fn is_excellent(&self) -> bool {
        self.value >= Decimal::new(45, 1)
    }

    pub fn is_good(&self) -> bool {
        self.value >= Decimal::new(4, 0)
    }

    pub fn is_average(&self) -> bool {
        self.value >= Decimal::new(3, 0)
    }

    pub fn is_poor(&self) -> bool {
        self.value < Decimal::new(3, 0)
    }

    /// The mean of two ratings, re-validated and re-rounded.
    pub fn add(&self, other: &Rating) -> DomainResult<Rating> {
        Rating::new((self.value + other.value) / Decimal::TWO)
    }

    /// Mean of any number of ratings; `None` when there are none.
    ///
    /// Infallible: a mean of values in [0, 5] lies in [0, 5], so only the
    /// rounding is reapplied.
    pub fn average<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> Option<Rating> {
        let (sum, count) = ratings
            .into_iter()
            .fold((Decimal::ZERO, 0u64), |(sum, count), r| (sum + r.value, count + 1));
        if count == 0 {
            return None;
        }
        Some(Self::rounded(sum / Decimal::from(count)))
    }
}

fn round_to_u8(value: Decimal) -> u8 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or_default()
}

impl ValueObject for Rating {
    fn equality_components(&self) -> Vec<EqualityComponent> {
        vec![self.value.into()]
    }
}

crate::impl_structural_equality!(Rating);

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut value = self.value;
        value.rescale(1);
        write!(f, "{value}/5.0")
    }
}
