//! Conversion of server-side decimal strings into integer minor units.
//!
//! The server sends every amount as a decimal string next to a currency code
//! (`"-12.5000"` + `"usd"`, `"5.391445130000000000"` + `"ETH"`). This module
//! turns the pair into a [`MonetaryAmount`] holding the amount as an integer
//! number of minor units of a known [`Currency`].
//!
//! Precision policy: no rounding. An amount may carry more fraction digits than
//! its currency defines only when the extra digits are zeros.
//!
//! Fiat codes use their ISO 4217 minor units. Crypto balances come over the
//! wire with 18 fraction digits whatever the token's native precision, so
//! every crypto code is scaled to 18 digits and a server balance always
//! converts without loss.

use std::fmt;

use api_types::{crypto::Crypto, transaction::Transaction};
use thiserror::Error;

/// Errors raised while parsing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),
    #[error("unknown currency: {0:?}")]
    UnknownCurrency(String),
    #[error("amount {amount:?} has more than {digits} fraction digits for {code}")]
    ExcessPrecision {
        amount: String,
        code: &'static str,
        digits: u8,
    },
    #[error("amount out of range: {0:?}")]
    OutOfRange(String),
}

/// Whether a code is an ISO 4217 currency or a crypto ticker.
///
/// Crypto amounts display without trailing fraction zeros.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

/// A currency from the reference table.
///
/// `fraction_digits()` is the number of decimal digits between major and
/// minor units: USD has 2 (`10.50 USD` ⇄ `1050`), JPY has 0, crypto codes
/// have 18.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Currency {
    code: &'static str,
    fraction_digits: u8,
    kind: CurrencyKind,
}

const fn fiat(code: &'static str, fraction_digits: u8) -> Currency {
    Currency {
        code,
        fraction_digits,
        kind: CurrencyKind::Fiat,
    }
}

const fn crypto(code: &'static str) -> Currency {
    Currency {
        code,
        fraction_digits: CRYPTO_WIRE_DIGITS,
        kind: CurrencyKind::Crypto,
    }
}

const CRYPTO_WIRE_DIGITS: u8 = 18;

const CURRENCIES: &[Currency] = &[
    fiat("AED", 2),
    fiat("ARS", 2),
    fiat("AUD", 2),
    fiat("BDT", 2),
    fiat("BGN", 2),
    fiat("BHD", 3),
    fiat("BIF", 0),
    fiat("BRL", 2),
    fiat("CAD", 2),
    fiat("CHF", 2),
    fiat("CLF", 4),
    fiat("CLP", 0),
    fiat("CNY", 2),
    fiat("COP", 2),
    fiat("CZK", 2),
    fiat("DJF", 0),
    fiat("DKK", 2),
    fiat("EGP", 2),
    fiat("EUR", 2),
    fiat("GBP", 2),
    fiat("GNF", 0),
    fiat("HKD", 2),
    fiat("HUF", 2),
    fiat("IDR", 2),
    fiat("ILS", 2),
    fiat("INR", 2),
    fiat("IQD", 3),
    fiat("ISK", 0),
    fiat("JOD", 3),
    fiat("JPY", 0),
    fiat("KES", 2),
    fiat("KMF", 0),
    fiat("KRW", 0),
    fiat("KWD", 3),
    fiat("LKR", 2),
    fiat("LYD", 3),
    fiat("MXN", 2),
    fiat("MYR", 2),
    fiat("NGN", 2),
    fiat("NOK", 2),
    fiat("NZD", 2),
    fiat("OMR", 3),
    fiat("PEN", 2),
    fiat("PHP", 2),
    fiat("PKR", 2),
    fiat("PLN", 2),
    fiat("PYG", 0),
    fiat("QAR", 2),
    fiat("RON", 2),
    fiat("RUB", 2),
    fiat("RWF", 0),
    fiat("SAR", 2),
    fiat("SEK", 2),
    fiat("SGD", 2),
    fiat("THB", 2),
    fiat("TND", 3),
    fiat("TRY", 2),
    fiat("TWD", 2),
    fiat("UAH", 2),
    fiat("UGX", 0),
    fiat("USD", 2),
    fiat("UYU", 2),
    fiat("VND", 0),
    fiat("VUV", 0),
    fiat("XAF", 0),
    fiat("XOF", 0),
    fiat("XPF", 0),
    fiat("ZAR", 2),
    crypto("ADA"),
    crypto("ALGO"),
    crypto("ATOM"),
    crypto("AVAX"),
    crypto("BCH"),
    crypto("BTC"),
    crypto("DAI"),
    crypto("DASH"),
    crypto("DOGE"),
    crypto("DOT"),
    crypto("ETC"),
    crypto("ETH"),
    crypto("LINK"),
    crypto("LTC"),
    crypto("MATIC"),
    crypto("SOL"),
    crypto("UNI"),
    crypto("USDC"),
    crypto("USDT"),
    crypto("XLM"),
    crypto("XRP"),
    crypto("XTZ"),
    crypto("ZEC"),
];

impl Currency {
    /// Looks a code up in the reference table, ignoring case and surrounding
    /// whitespace.
    pub fn find(code: &str) -> Option<Currency> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .find(|currency| currency.code.eq_ignore_ascii_case(code))
            .copied()
    }

    /// Canonical (uppercase) currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.code
    }

    #[must_use]
    pub const fn fraction_digits(self) -> u8 {
        self.fraction_digits
    }

    #[must_use]
    pub const fn kind(self) -> CurrencyKind {
        self.kind
    }

    const fn scale(self) -> u128 {
        10u128.pow(self.fraction_digits as u32)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl TryFrom<&str> for Currency {
    type Error = CurrencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Currency::find(value).ok_or_else(|| CurrencyError::UnknownCurrency(value.to_string()))
    }
}

/// A decimal numeral split into its parts: sign, integer digits, fraction digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DecimalParts<'a> {
    pub negative: bool,
    pub integer: &'a str,
    pub fraction: &'a str,
}

/// Splits `[+-]digits[.digits]` (either side of the point may be empty, but
/// not both). Returns `None` for anything else.
pub(crate) fn split_decimal(text: &str) -> Option<DecimalParts<'_>> {
    let trimmed = text.trim();
    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let (integer, fraction) = match rest.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (rest, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(integer) || !digits(fraction) {
        return None;
    }

    Some(DecimalParts {
        negative,
        integer,
        fraction,
    })
}

/// An amount of money as a signed integer number of minor units.
///
/// ```rust
/// use lunchmoney::money::parse_amount;
///
/// let amount = parse_amount("-12.5", "usd").unwrap();
/// assert_eq!(amount.minor(), -1250);
/// assert_eq!(amount.currency().code(), "USD");
/// assert_eq!(amount.to_string(), "-12.50 USD");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonetaryAmount {
    minor: i128,
    currency: Currency,
}

impl MonetaryAmount {
    /// Raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i128 {
        self.minor
    }

    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// Parses a decimal numeral in `currency`.
    ///
    /// Accepts an optional leading `+`/`-`, rejects exponents, thousands
    /// separators and fraction digits beyond the currency's scale unless
    /// those are zeros.
    pub fn parse(text: &str, currency: Currency) -> Result<Self, CurrencyError> {
        let malformed = || CurrencyError::MalformedAmount(text.to_string());
        let out_of_range = || CurrencyError::OutOfRange(text.to_string());

        let parts = split_decimal(text).ok_or_else(malformed)?;
        let digits = usize::from(currency.fraction_digits);

        let fraction = if parts.fraction.len() > digits {
            let (kept, extra) = parts.fraction.split_at(digits);
            if extra.bytes().any(|b| b != b'0') {
                return Err(CurrencyError::ExcessPrecision {
                    amount: text.to_string(),
                    code: currency.code,
                    digits: currency.fraction_digits,
                });
            }
            kept
        } else {
            parts.fraction
        };

        let integer: u128 = if parts.integer.is_empty() {
            0
        } else {
            parts.integer.parse().map_err(|_| out_of_range())?
        };
        let fraction_minor: u128 = if fraction.is_empty() {
            0
        } else {
            let padding = 10u128.pow((digits - fraction.len()) as u32);
            fraction
                .parse::<u128>()
                .map_err(|_| malformed())?
                * padding
        };

        let magnitude = integer
            .checked_mul(currency.scale())
            .and_then(|v| v.checked_add(fraction_minor))
            .and_then(|v| i128::try_from(v).ok())
            .ok_or_else(out_of_range)?;

        let minor = if parts.negative {
            magnitude.checked_neg().ok_or_else(out_of_range)?
        } else {
            magnitude
        };

        Ok(Self { minor, currency })
    }

    /// Amount in major units, with exactly `fraction_digits` decimals.
    pub fn to_major_string(self) -> String {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let scale = self.currency.scale();
        let major = abs / scale;
        match self.currency.fraction_digits {
            0 => format!("{sign}{major}"),
            digits => {
                let minor = abs % scale;
                format!("{sign}{major}.{minor:0width$}", width = usize::from(digits))
            }
        }
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.to_major_string();
        let major = match self.currency.kind {
            CurrencyKind::Fiat => major.as_str(),
            CurrencyKind::Crypto if major.contains('.') => {
                major.trim_end_matches('0').trim_end_matches('.')
            }
            CurrencyKind::Crypto => major.as_str(),
        };
        write!(f, "{major} {}", self.currency.code)
    }
}

/// Parses `amount` as a decimal numeral denominated in `currency`.
///
/// The currency is resolved first, so an unknown code is reported even when
/// the amount is malformed too.
pub fn parse_amount(amount: &str, currency: &str) -> Result<MonetaryAmount, CurrencyError> {
    let currency = Currency::try_from(currency)?;
    MonetaryAmount::parse(amount, currency)
}

/// Records that carry an amount next to its currency code.
pub trait ParsedAmount {
    fn parsed_amount(&self) -> Result<MonetaryAmount, CurrencyError>;
}

impl ParsedAmount for Transaction {
    fn parsed_amount(&self) -> Result<MonetaryAmount, CurrencyError> {
        parse_amount(&self.amount, &self.currency)
    }
}

impl ParsedAmount for Crypto {
    fn parsed_amount(&self) -> Result<MonetaryAmount, CurrencyError> {
        parse_amount(&self.balance, &self.currency)
    }
}
