use crate::core::currency::Currency;
use crate::error::{Result, SettleError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning for a settlement run.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// overrides:
///
/// ```
/// use split_engine::config::SettlementConfig;
///
/// let config: SettlementConfig =
///     serde_json::from_str(r#"{ "currency": { "code": "JPY", "symbol": "¥", "scale": 0 } }"#)
///         .unwrap();
/// assert_eq!(config.scale(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Currency whose minor unit transfer amounts are rounded to.
    pub currency: Currency,
    /// Two remaining amounts closer than this are treated as equal, and
    /// balances smaller than this are treated as already settled.
    pub epsilon: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            epsilon: Decimal::new(1, 9),
        }
    }
}

impl SettlementConfig {
    pub fn with_currency(currency: Currency) -> Self {
        Self {
            currency,
            ..Default::default()
        }
    }

    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettleError::Config(format!("reading {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SettleError::Config(format!("parsing {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epsilon < Decimal::ZERO {
            return Err(SettleError::Config(format!(
                "epsilon must not be negative, got {}",
                self.epsilon
            )));
        }
        if self.currency.scale() > 10 {
            return Err(SettleError::Config(format!(
                "currency scale {} is out of range (0..=10)",
                self.currency.scale()
            )));
        }
        Ok(())
    }

    /// Config for a run assembled from the command line, highest priority
    /// first: an explicit currency code, a config file, then the currency
    /// code stored with the group.
    pub fn resolve(
        currency_code: Option<&str>,
        config_file: Option<SettlementConfig>,
        group_currency: Option<&str>,
    ) -> Self {
        let from_file = config_file.is_some();
        let mut config = config_file.unwrap_or_default();
        match (currency_code, group_currency) {
            (Some(code), _) => config.currency = Currency::from_code(code),
            (None, Some(code)) if !from_file => config.currency = Currency::from_code(code),
            _ => {}
        }
        config
    }

    pub fn scale(&self) -> u32 {
        self.currency.scale()
    }

    /// Round an amount to the currency's minor unit.
    pub fn round(&self, amount: Decimal) -> Decimal {
        self.currency.round(amount)
    }

    /// Largest amount that may stay unmatched after settlement: half a minor unit.
    pub fn residual_tolerance(&self) -> Decimal {
        self.currency.minor_unit() / Decimal::TWO
    }
}
