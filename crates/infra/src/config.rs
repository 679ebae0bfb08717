//! Environment-based configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `CATALOG_DEFAULT_CURRENCY` | `USD` |
//! | `CATALOG_DOMESTIC_COUNTRY` | `US` |
//! | `CATALOG_VOLUMETRIC_DIVISOR` | `5000` |
//! | `CATALOG_LOG_FILTER` | `info` |
//! | `CATALOG_LOG_JSON` | `false` |
//!
//! Unset variables fall back to their default with a warning; set but
//! malformed variables are an error.

use std::str::FromStr;

use catalog_core::DEFAULT_VOLUMETRIC_DIVISOR;
use catalog_observability::LogSettings;
use catalog_products::ShippingPolicy;
use rust_decimal::Decimal;
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "CATALOG_DEFAULT_CURRENCY";
pub const DOMESTIC_COUNTRY: &str = "CATALOG_DOMESTIC_COUNTRY";
pub const VOLUMETRIC_DIVISOR: &str = "CATALOG_VOLUMETRIC_DIVISOR";
pub const LOG_FILTER: &str = "CATALOG_LOG_FILTER";
pub const LOG_JSON: &str = "CATALOG_LOG_JSON";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    default_currency: String,
    shipping: ShippingPolicy,
    log: LogSettings,
}

impl CatalogConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value (or `None` when unset).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str, default: &str| -> String {
            match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => {
                    tracing::warn!(key, default, "configuration variable not set; using default");
                    default.to_string()
                }
            }
        };

        let default_currency = parse_currency(&read(DEFAULT_CURRENCY, "USD"))?;

        let divisor_default = DEFAULT_VOLUMETRIC_DIVISOR.to_string();
        let divisor_raw = read(VOLUMETRIC_DIVISOR, &divisor_default);
        let divisor = Decimal::from_str(&divisor_raw)
            .map_err(|e| ConfigError::invalid(VOLUMETRIC_DIVISOR, e.to_string()))?;

        let shipping = ShippingPolicy::new(divisor, &read(DOMESTIC_COUNTRY, "US"))
            .map_err(|e| ConfigError::invalid(VOLUMETRIC_DIVISOR, e.to_string()))?;

        let log = LogSettings {
            filter: read(LOG_FILTER, "info"),
            json: parse_bool(LOG_JSON, &read(LOG_JSON, "false"))?,
        };

        Ok(Self {
            default_currency,
            shipping,
            log,
        })
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub fn shipping_policy(&self) -> &ShippingPolicy {
        &self.shipping
    }

    pub fn log_settings(&self) -> &LogSettings {
        &self.log
    }
}

fn parse_currency(raw: &str) -> Result<String, ConfigError> {
    if raw.len() != 3 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::invalid(
            DEFAULT_CURRENCY,
            format!("'{raw}' is not a three-letter currency code"),
        ));
    }
    Ok(raw.to_ascii_uppercase())
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("'{other}' is not a boolean"))),
    }
}
