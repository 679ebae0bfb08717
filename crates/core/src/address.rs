//! Postal address value object.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::{EqualityComponent, ValueObject};

const STREET_MAX: usize = 100;
const CITY_MAX: usize = 50;
const STATE_MAX: usize = 50;
const POSTAL_CODE_MAX: usize = 20;
const COUNTRY_MAX: usize = 50;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Shipping,
    Billing,
}

impl AddressType {
    fn tag(self) -> &'static str {
        match self {
            AddressType::Shipping => "shipping",
            AddressType::Billing => "billing",
        }
    }
}

/// Unvalidated address input; turned into an [`Address`] by [`Address::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressFields {
    pub street1: String,
    #[serde(default)]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, rename = "type")]
    pub address_type: AddressType,
}

/// A validated postal address. Every string is trimmed; comparisons ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AddressFields")]
pub struct Address {
    street1: String,
    street2: Option<String>,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    #[serde(rename = "type")]
    address_type: AddressType,
}

impl TryFrom<AddressFields> for Address {
    type Error = DomainError;

    fn try_from(value: AddressFields) -> Result<Self, Self::Error> {
        Address::new(value)
    }
}

fn required(value: &str, field: &'static str, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    check_length(trimmed, field, max)
}

fn optional(value: Option<&str>, field: &'static str, max: usize) -> DomainResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => check_length(trimmed, field, max).map(Some),
    }
}

fn check_length(trimmed: &str, field: &'static str, max: usize) -> DomainResult<String> {
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("cannot exceed {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_uppercase() == b.to_uppercase()
}

impl Address {
    pub fn new(fields: AddressFields) -> DomainResult<Self> {
        Ok(Self {
            street1: required(&fields.street1, "street1", STREET_MAX)?,
            street2: optional(fields.street2.as_deref(), "street2", STREET_MAX)?,
            city: required(&fields.city, "city", CITY_MAX)?,
            state: required(&fields.state, "state", STATE_MAX)?,
            postal_code: required(&fields.postal_code, "postal_code", POSTAL_CODE_MAX)?,
            country: required(&fields.country, "country", COUNTRY_MAX)?,
            address_type: fields.address_type,
        })
    }

    pub fn shipping(
        street1: &str,
        city: &str,
        state: &str,
        postal_code: &str,
        country: &str,
    ) -> DomainResult<Self> {
        Self::new(AddressFields {
            street1: street1.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            postal_code: postal_code.to_string(),
            country: country.to_string(),
            ..AddressFields::default()
        })
    }

    pub fn billing(
        street1: &str,
        city: &str,
        state: &str,
        postal_code: &str,
        country: &str,
    ) -> DomainResult<Self> {
        Self::new(AddressFields {
            street1: street1.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            postal_code: postal_code.to_string(),
            country: country.to_string(),
            street2: None,
            address_type: AddressType::Billing,
        })
    }

    /// A copy of this address with a second street line.
    pub fn with_street2(&self, street2: &str) -> DomainResult<Self> {
        Ok(Self {
            street2: optional(Some(street2), "street2", STREET_MAX)?,
            ..self.clone()
        })
    }

    pub fn street1(&self) -> &str {
        &self.street1
    }

    pub fn street2(&self) -> Option<&str> {
        self.street2.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn single_line(&self) -> String {
        let mut parts = vec![self.street1.as_str()];
        if let Some(street2) = &self.street2 {
            parts.push(street2);
        }
        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]);
        parts.join(", ")
    }

    pub fn multi_line(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.street1);
        out.push('\n');
        if let Some(street2) = &self.street2 {
            out.push_str(street2);
            out.push('\n');
        }
        out.push_str(&format!("{}, {} {}\n", self.city, self.state, self.postal_code));
        out.push_str(&self.country);
        out
    }

    pub fn is_domestic(&self, country_code: &str) -> bool {
        eq_ignore_case(&self.country, country_code)
    }

    pub fn is_valid_for_shipping(&self) -> bool {
        !self.street1.is_empty() && !self.city.is_empty() && !self.country.is_empty()
    }

    /// Case-insensitive location comparison, ignoring the address type.
    ///
    /// Loose matching skips `street2`; strict matching compares it too, with a
    /// missing line treated as the empty string.
    pub fn matches(&self, other: &Address, strict: bool) -> bool {
        let core = eq_ignore_case(&self.street1, &other.street1)
            && eq_ignore_case(&self.city, &other.city)
            && eq_ignore_case(&self.state, &other.state)
            && eq_ignore_case(&self.postal_code, &other.postal_code)
            && eq_ignore_case(&self.country, &other.country);

        if !strict {
            return core;
        }

        core && eq_ignore_case(
            self.street2.as_deref().unwrap_or_default(),
            other.street2.as_deref().unwrap_or_default(),
        )
    }
}

impl ValueObject for Address {
    fn equality_components(&self) -> Vec<EqualityComponent> {
        vec![
            self.street1.to_uppercase().into(),
            self.street2
                .as_deref()
                .unwrap_or_default()
                .to_uppercase()
                .into(),
            self.city.to_uppercase().into(),
            self.state.to_uppercase().into(),
            self.postal_code.to_uppercase().into(),
            self.country.to_uppercase().into(),
            EqualityComponent::Tag(self.address_type.tag()),
        ]
    }
}

crate::impl_structural_equality!(Address);

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.single_line())
    }
}
