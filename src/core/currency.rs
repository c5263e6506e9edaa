use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display currency for a group.
///
/// Only one currency is used per group. It decides the minor unit
/// (`scale` decimal places) that transfer amounts are rounded to and how
/// amounts are rendered for people.
///
/// # Examples
///
/// ```
/// use split_engine::core::currency::Currency;
/// use rust_decimal_macros::dec;
///
/// let usd = Currency::usd();
/// assert_eq!(usd.format(dec!(1234.5)), "$1,234.50");
///
/// let jpy = Currency::from_code("JPY");
/// assert_eq!(jpy.format(dec!(15000.4)), "¥15,000");
/// ```
///
/// Deserializes from a bare code (`"JPY"`) or an object in which `symbol`
/// and `scale` default to those of the code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CurrencySpec")]
pub struct Currency {
    code: String,
    symbol: String,
    /// Decimal places of the minor unit (2 for cents, 0 for yen).
    scale: u32,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, scale: u32) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            scale,
        }
    }

    pub fn usd() -> Self {
        Self::new("USD", "$", 2)
    }

    pub fn eur() -> Self {
        Self::new("EUR", "€", 2)
    }

    pub fn jpy() -> Self {
        Self::new("JPY", "¥", 0)
    }

    /// Look up a known currency by ISO code.
    ///
    /// Unknown codes use the code itself as symbol and two decimal places.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Self::usd(),
            "EUR" => Self::eur(),
            "JPY" => Self::jpy(),
            "GBP" => Self::new("GBP", "£", 2),
            other => Self::new(other, format!("{} ", other), 2),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Round to the minor unit, half away from zero.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero)
    }

    /// One minor unit (0.01 for cents).
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }

    /// Render an amount with symbol and thousands separators.
    pub fn format(&self, amount: Decimal) -> String {
        let mut rounded = self.round(amount);
        rounded.rescale(self.scale);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match frac_part {
            Some(frac) => format!("{}{}{}.{}", sign, self.symbol, grouped, frac),
            None => format!("{}{}{}", sign, self.symbol, grouped),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CurrencySpec {
    Code(String),
    Detailed {
        code: String,
        symbol: Option<String>,
        scale: Option<u32>,
    },
}

impl From<CurrencySpec> for Currency {
    fn from(spec: CurrencySpec) -> Self {
        match spec {
            CurrencySpec::Code(code) => Currency::from_code(&code),
            CurrencySpec::Detailed {
                code,
                symbol,
                scale,
            } => {
                let known = Currency::from_code(&code);
                Currency {
                    symbol: symbol.unwrap_or(known.symbol),
                    scale: scale.unwrap_or(known.scale),
                    code: known.code,
                }
            }
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
