//! Physical package dimensions with unit conversion and shipping-derived measures.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::{EqualityComponent, ValueObject};

/// Divisor used for volumetric weight when the carrier does not specify one.
pub const DEFAULT_VOLUMETRIC_DIVISOR: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Largest accepted component, in any unit. Keeps volume, girth and unit
/// conversion within `Decimal` range.
pub const MAX_COMPONENT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
}

impl DimensionUnit {
    pub const ALL: [DimensionUnit; 4] = [
        DimensionUnit::Millimeters,
        DimensionUnit::Centimeters,
        DimensionUnit::Meters,
        DimensionUnit::Inches,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            DimensionUnit::Millimeters => "mm",
            DimensionUnit::Centimeters => "cm",
            DimensionUnit::Meters => "m",
            DimensionUnit::Inches => "in",
        }
    }

    /// How many centimeters one of this unit spans.
    pub fn centimeters_per_unit(self) -> Decimal {
        match self {
            DimensionUnit::Millimeters => Decimal::new(1, 1),
            DimensionUnit::Centimeters => Decimal::ONE,
            DimensionUnit::Meters => Decimal::ONE_HUNDRED,
            DimensionUnit::Inches => Decimal::new(254, 2),
        }
    }

    /// Multiplier taking a length in `self` to a length in `target`.
    pub fn factor_to(self, target: DimensionUnit) -> Decimal {
        let per_centimeter = match target {
            DimensionUnit::Millimeters => Decimal::TEN,
            DimensionUnit::Centimeters => Decimal::ONE,
            DimensionUnit::Meters => Decimal::new(1, 2),
            DimensionUnit::Inches => Decimal::ONE / Decimal::new(254, 2),
        };
        self.centimeters_per_unit() * per_centimeter
    }

    fn tag(self) -> &'static str {
        match self {
            DimensionUnit::Millimeters => "millimeters",
            DimensionUnit::Centimeters => "centimeters",
            DimensionUnit::Meters => "meters",
            DimensionUnit::Inches => "inches",
        }
    }
}

/// Length × width × height in one unit, each strictly positive and held to
/// two fractional digits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DimensionsFields")]
pub struct Dimensions {
    length: Decimal,
    width: Decimal,
    height: Decimal,
    unit: DimensionUnit,
}

#[derive(Deserialize)]
struct DimensionsFields {
    length: Decimal,
    width: Decimal,
    height: Decimal,
    unit: DimensionUnit,
}

impl TryFrom<DimensionsFields> for Dimensions {
    type Error = DomainError;

    fn try_from(value: DimensionsFields) -> Result<Self, Self::Error> {
        Dimensions::new(value.length, value.width, value.height, value.unit)
    }
}

fn component(field: &'static str, value: Decimal) -> DomainResult<Decimal> {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if value <= Decimal::ZERO || rounded <= Decimal::ZERO {
        return Err(DomainError::validation(field, "must be a positive value"));
    }
    if rounded > MAX_COMPONENT {
        return Err(DomainError::validation(
            field,
            format!("cannot exceed {MAX_COMPONENT}"),
        ));
    }
    Ok(rounded)
}

impl Dimensions {
    pub fn new(
        length: Decimal,
        width: Decimal,
        height: Decimal,
        unit: DimensionUnit,
    ) -> DomainResult<Self> {
        Ok(Self {
            length: component("length", length)?,
            width: component("width", width)?,
            height: component("height", height)?,
            unit,
        })
    }

    pub fn in_centimeters(length: Decimal, width: Decimal, height: Decimal) -> DomainResult<Self> {
        Self::new(length, width, height, DimensionUnit::Centimeters)
    }

    pub fn in_inches(length: Decimal, width: Decimal, height: Decimal) -> DomainResult<Self> {
        Self::new(length, width, height, DimensionUnit::Inches)
    }

    pub fn in_meters(length: Decimal, width: Decimal, height: Decimal) -> DomainResult<Self> {
        Self::new(length, width, height, DimensionUnit::Meters)
    }

    pub fn in_millimeters(length: Decimal, width: Decimal, height: Decimal) -> DomainResult<Self> {
        Self::new(length, width, height, DimensionUnit::Millimeters)
    }

    pub fn length(&self) -> Decimal {
        self.length
    }

    pub fn width(&self) -> Decimal {
        self.width
    }

    pub fn height(&self) -> Decimal {
        self.height
    }

    pub fn unit(&self) -> DimensionUnit {
        self.unit
    }

    pub fn volume(&self) -> Decimal {
        self.length * self.width * self.height
    }

    /// Liters for centimeter dimensions; other units report the raw cubic volume.
    pub fn volume_in_liters(&self) -> Decimal {
        match self.unit {
            DimensionUnit::Centimeters => self.volume() / Decimal::ONE_THOUSAND,
            _ => self.volume(),
        }
    }

    pub fn girth(&self) -> Decimal {
        Decimal::TWO * self.width + Decimal::TWO * self.height
    }

    pub fn length_plus_girth(&self) -> Decimal {
        self.length + self.girth()
    }

    /// Volume divided by a carrier divisor, in this instance's unit.
    pub fn volumetric_weight(&self, divisor: Decimal) -> DomainResult<Decimal> {
        if divisor <= Decimal::ZERO {
            return Err(DomainError::validation("divisor", "must be a positive value"));
        }
        self.volume()
            .checked_div(divisor)
            .ok_or_else(|| DomainError::validation("divisor", "too small for this volume"))
    }

    pub fn default_volumetric_weight(&self) -> Decimal {
        self.volume() / DEFAULT_VOLUMETRIC_DIVISOR
    }

    /// Carrier oversize rule. Only inch and centimeter dimensions have
    /// thresholds; meters and millimeters are never reported oversized.
    pub fn is_oversized(&self) -> bool {
        let (side_limit, length_plus_girth_limit) = match self.unit {
            DimensionUnit::Inches => (Decimal::from(96), Decimal::from(165)),
            DimensionUnit::Centimeters => (Decimal::from(244), Decimal::from(330)),
            DimensionUnit::Meters | DimensionUnit::Millimeters => return false,
        };

        self.length > side_limit
            || self.width > side_limit
            || self.height > side_limit
            || self.length_plus_girth() > length_plus_girth_limit
    }

    /// Express the same box in `target` units.
    ///
    /// Fails when a component rounds to zero in the target unit (e.g. a
    /// 1 mm edge expressed in meters) or grows past [`MAX_COMPONENT`].
    pub fn convert_to(&self, target: DimensionUnit) -> DomainResult<Dimensions> {
        if self.unit == target {
            return Ok(self.clone());
        }

        let factor = self.unit.factor_to(target);
        Dimensions::new(
            self.length * factor,
            self.width * factor,
            self.height * factor,
            target,
        )
    }
}

impl ValueObject for Dimensions {
    fn equality_components(&self) -> Vec<EqualityComponent> {
        vec![
            self.length.into(),
            self.width.into(),
            self.height.into(),
            EqualityComponent::Tag(self.unit.tag()),
        ]
    }
}

crate::impl_structural_equality!(Dimensions);

impl core::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let one_dp = |v: Decimal| {
            let mut v = v.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            v.rescale(1);
            v
        };
        write!(
            f,
            "{} × {} × {} {}",
            one_dp(self.length),
            one_dp(self.width),
            one_dp(self.height),
            self.unit.abbreviation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn construction_boundary() {
        assert!(Dimensions::in_centimeters(dec!(0), dec!(1), dec!(1)).is_err());
        assert!(Dimensions::in_centimeters(dec!(1), dec!(-1), dec!(1)).is_err());
        assert!(Dimensions::in_centimeters(dec!(1), dec!(1), dec!(0.01)).is_ok());
    }

    #[test]
    fn invalid_component_names_the_field() {
        let err = Dimensions::in_inches(dec!(1), dec!(1), dec!(0)).unwrap_err();
        assert_eq!(err.field(), Some("height"));
    }

    #[test]
    fn components_are_rounded_to_two_places() {
        let d = Dimensions::in_centimeters(dec!(10.004), dec!(2.125), dec!(3.135)).unwrap();
        assert_eq!(d.length(), dec!(10.00));
        assert_eq!(d.width(), dec!(2.12));
        assert_eq!(d.height(), dec!(3.14));
    }

    #[test]
    fn component_rounding_to_zero_is_rejected() {
        assert!(Dimensions::in_meters(dec!(0.001), dec!(1), dec!(1)).is_err());
    }

    #[test]
    fn oversized_components_are_rejected() {
        let err = Dimensions::in_centimeters(Decimal::MAX / dec!(2), dec!(1), dec!(1)).unwrap_err();
        assert_eq!(err.field(), Some("length"));
        let ten_billion = Decimal::from(10_000_000_000i64);
        assert!(Dimensions::in_centimeters(ten_billion, ten_billion, ten_billion).is_err());
        assert!(Dimensions::in_centimeters(dec!(1), dec!(1), Decimal::MAX).is_err());
    }

    #[test]
    fn largest_box_keeps_derived_measures_in_range() {
        let d = Dimensions::in_centimeters(MAX_COMPONENT, MAX_COMPONENT, MAX_COMPONENT).unwrap();
        assert_eq!(d.volume(), Decimal::from_i128_with_scale(10i128.pow(27), 0));
        assert_eq!(d.girth(), Decimal::from(4_000_000_000i64));
        assert!(d.is_oversized());
        assert!(d.volumetric_weight(Decimal::new(1, 10)).is_err());
        assert!(d.convert_to(DimensionUnit::Inches).is_ok());

        // Growing past the bound in the target unit fails instead of overflowing.
        let err = d.convert_to(DimensionUnit::Millimeters).unwrap_err();
        assert_eq!(err.field(), Some("length"));
        let metres = Dimensions::in_meters(MAX_COMPONENT, dec!(1), dec!(1)).unwrap();
        assert!(metres.convert_to(DimensionUnit::Millimeters).is_err());
    }

    #[test]
    fn derived_measures() {
        let d = Dimensions::in_centimeters(dec!(50), dec!(40), dec!(30)).unwrap();
        assert_eq!(d.volume(), dec!(60000));
        assert_eq!(d.volume_in_liters(), dec!(60));
        assert_eq!(d.girth(), dec!(140));
        assert_eq!(d.length_plus_girth(), dec!(190));
        assert_eq!(d.default_volumetric_weight(), dec!(12));
        assert_eq!(d.volumetric_weight(dec!(6000)).unwrap(), dec!(10));
        assert!(d.volumetric_weight(dec!(0)).is_err());
    }

    #[test]
    fn oversize_thresholds_for_inches() {
        // girth 120, length + girth 160: within both limits
        let d = Dimensions::in_inches(dec!(40), dec!(30), dec!(30)).unwrap();
        assert!(!d.is_oversized());

        // length + girth 170 > 165
        let d = Dimensions::in_inches(dec!(40), dec!(30), dec!(35)).unwrap();
        assert!(d.is_oversized());

        // a single side over 96
        let d = Dimensions::in_inches(dec!(97), dec!(1), dec!(1)).unwrap();
        assert!(d.is_oversized());

        // exactly at the limits is not oversized
        let d = Dimensions::in_inches(dec!(96), dec!(17.25), dec!(17.25)).unwrap();
        assert_eq!(d.length_plus_girth(), dec!(165));
        assert!(!d.is_oversized());
    }

    #[test]
    fn oversize_thresholds_for_centimeters() {
        assert!(Dimensions::in_centimeters(dec!(245), dec!(1), dec!(1)).unwrap().is_oversized());
        assert!(Dimensions::in_centimeters(dec!(100), dec!(60), dec!(60)).unwrap().is_oversized());
        assert!(!Dimensions::in_centimeters(dec!(100), dec!(50), dec!(50)).unwrap().is_oversized());
    }

    #[test]
    fn meters_and_millimeters_are_never_oversized() {
        assert!(!Dimensions::in_meters(dec!(10), dec!(10), dec!(10)).unwrap().is_oversized());
        assert!(!Dimensions::in_millimeters(dec!(9000), dec!(9000), dec!(9000)).unwrap().is_oversized());
    }

    #[test]
    fn convert_to_same_unit_is_identity() {
        let d = Dimensions::in_inches(dec!(1.5), dec!(2), dec!(3)).unwrap();
        assert_eq!(d.convert_to(DimensionUnit::Inches).unwrap(), d);
    }

    #[test]
    fn convert_inches_to_centimeters() {
        let d = Dimensions::in_inches(dec!(10), dec!(5), dec!(1)).unwrap();
        let cm = d.convert_to(DimensionUnit::Centimeters).unwrap();
        assert_eq!(cm.length(), dec!(25.40));
        assert_eq!(cm.width(), dec!(12.70));
        assert_eq!(cm.height(), dec!(2.54));
        assert_eq!(cm.unit(), DimensionUnit::Centimeters);
    }

    #[test]
    fn convert_meters_to_millimeters() {
        let d = Dimensions::in_meters(dec!(1.25), dec!(0.5), dec!(2)).unwrap();
        let mm = d.convert_to(DimensionUnit::Millimeters).unwrap();
        assert_eq!(mm.length(), dec!(1250));
        assert_eq!(mm.width(), dec!(500));
        assert_eq!(mm.height(), dec!(2000));
    }

    #[test]
    fn equality_is_by_components_and_unit() {
        let a = Dimensions::in_centimeters(dec!(1), dec!(2), dec!(3)).unwrap();
        let b = Dimensions::in_centimeters(dec!(1.00), dec!(2.0), dec!(3)).unwrap();
        let c = Dimensions::in_inches(dec!(1), dec!(2), dec!(3)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_uses_one_decimal_and_abbreviation() {
        let d = Dimensions::in_centimeters(dec!(10), dec!(2.25), dec!(3.14)).unwrap();
        assert_eq!(d.to_string(), "10.0 × 2.3 × 3.1 cm");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn component() -> impl Strategy<Value = Decimal> {
            (1i64..1_000_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
        }

        /// Pairs where the intermediate unit is at least as fine as the source,
        /// so the intermediate rounding cannot lose a hundredth of the source unit.
        fn finer_pair() -> impl Strategy<Value = (DimensionUnit, DimensionUnit)> {
            prop_oneof![
                Just((DimensionUnit::Inches, DimensionUnit::Centimeters)),
                Just((DimensionUnit::Inches, DimensionUnit::Millimeters)),
                Just((DimensionUnit::Meters, DimensionUnit::Centimeters)),
                Just((DimensionUnit::Meters, DimensionUnit::Millimeters)),
                Just((DimensionUnit::Meters, DimensionUnit::Inches)),
                Just((DimensionUnit::Centimeters, DimensionUnit::Millimeters)),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn round_trip_stays_within_a_hundredth(
                l in component(),
                w in component(),
                h in component(),
                (from, via) in finer_pair(),
            ) {
                let original = Dimensions::new(l, w, h, from).unwrap();
                let back = original.convert_to(via).unwrap().convert_to(from).unwrap();

                let tolerance = Decimal::new(1, 2);
                prop_assert!((back.length() - original.length()).abs() <= tolerance);
                prop_assert!((back.width() - original.width()).abs() <= tolerance);
                prop_assert!((back.height() - original.height()).abs() <= tolerance);
                prop_assert_eq!(back.unit(), from);
            }

            #[test]
            fn conversion_preserves_positivity(
                l in 100i64..1_000_000,
                w in 100i64..1_000_000,
                h in 100i64..1_000_000,
            ) {
                let (l, w, h) = (Decimal::new(l, 2), Decimal::new(w, 2), Decimal::new(h, 2));
                let d = Dimensions::in_centimeters(l, w, h).unwrap();
                for unit in [DimensionUnit::Millimeters, DimensionUnit::Inches] {
                    let converted = d.convert_to(unit).unwrap();
                    prop_assert!(converted.length() > Decimal::ZERO);
                    prop_assert!(converted.width() > Decimal::ZERO);
                    prop_assert!(converted.height() > Decimal::ZERO);
                }
            }
        }
    }
}
