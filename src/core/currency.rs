//! The closed catalogue of supported currencies.

use crate::core::error::FxError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn currency(code: &'static str, name: &'static str, symbol: &'static str) -> Currency {
    Currency { code, name, symbol }
}

pub const SUPPORTED_CURRENCIES: [Currency; 32] = [
    currency("USD", "United States Dollar", "$"),
    currency("EUR", "Euro", "€"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("GBP", "British Pound Sterling", "£"),
    currency("AUD", "Australian Dollar", "A$"),
    currency("CAD", "Canadian Dollar", "CA$"),
    currency("CHF", "Swiss Franc", "CHF"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("SEK", "Swedish Krona", "kr"),
    currency("NZD", "New Zealand Dollar", "NZ$"),
    currency("MXN", "Mexican Peso", "Mex$"),
    currency("SGD", "Singapore Dollar", "S$"),
    currency("HKD", "Hong Kong Dollar", "HK$"),
    currency("NOK", "Norwegian Krone", "kr"),
    currency("KRW", "South Korean Won", "₩"),
    currency("TRY", "Turkish Lira", "₺"),
    currency("RUB", "Russian Ruble", "₽"),
    currency("INR", "Indian Rupee", "₹"),
    currency("BRL", "Brazilian Real", "R$"),
    currency("ZAR", "South African Rand", "R"),
    currency("SAR", "Saudi Riyal", "﷼"),
    currency("AED", "UAE Dirham", "د.إ"),
    currency("EGP", "Egyptian Pound", "E£"),
    currency("QAR", "Qatari Riyal", "ر.ق"),
    currency("KWD", "Kuwaiti Dinar", "د.ك"),
    currency("BHD", "Bahraini Dinar", ".د.ب"),
    currency("OMR", "Omani Rial", "ر.ع."),
    currency("JOD", "Jordanian Dinar", "د.أ"),
    currency("MAD", "Moroccan Dirham", "د.م."),
    currency("TND", "Tunisian Dinar", "د.ت"),
    currency("DZD", "Algerian Dinar", "د.ج"),
    currency("IQD", "Iraqi Dinar", "ع.د"),
];

/// A code from [`SUPPORTED_CURRENCIES`]. Values can only be obtained by parsing
/// or from the catalogue, so every `CurrencyCode` is a supported one.
///
/// Ordering follows catalogue position rather than the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode(&'static str);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode("USD");
    pub const EUR: CurrencyCode = CurrencyCode("EUR");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn info(&self) -> &'static Currency {
        &SUPPORTED_CURRENCIES[self.position()]
    }

    /// Iterates every supported code in catalogue order.
    pub fn all() -> impl Iterator<Item = CurrencyCode> {
        SUPPORTED_CURRENCIES.iter().map(|c| CurrencyCode(c.code))
    }

    fn position(&self) -> usize {
        SUPPORTED_CURRENCIES
            .iter()
            .position(|c| c.code == self.0)
            .unwrap_or(usize::MAX)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        SUPPORTED_CURRENCIES
            .iter()
            .find(|c| c.code == wanted)
            .map(|c| CurrencyCode(c.code))
            .ok_or_else(|| FxError::invalid(format!("Unsupported currency code: {s}")))
    }
}

impl PartialOrd for CurrencyCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CurrencyCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Currency used when a locale has no mapping.
pub const FALLBACK_LOCAL_CURRENCY: CurrencyCode = CurrencyCode::USD;

const LOCALE_CURRENCIES: [(&str, &str); 23] = [
    ("en-US", "USD"),
    ("en-GB", "GBP"),
    ("en-CA", "CAD"),
    ("en-AU", "AUD"),
    ("de-DE", "EUR"),
    ("fr-FR", "EUR"),
    ("es-ES", "EUR"),
    ("it-IT", "EUR"),
    ("ja-JP", "JPY"),
    ("ko-KR", "KRW"),
    ("zh-CN", "CNY"),
    ("ar-SA", "SAR"),
    ("ar-AE", "AED"),
    ("ar-EG", "EGP"),
    ("ar-QA", "QAR"),
    ("ar-KW", "KWD"),
    ("ar-BH", "BHD"),
    ("ar-OM", "OMR"),
    ("ar-JO", "JOD"),
    ("ar-MA", "MAD"),
    ("ar-TN", "TND"),
    ("ar-DZ", "DZD"),
    ("ar-IQ", "IQD"),
];

/// Maps a locale tag (`en-GB`, or POSIX style `en_GB.UTF-8`) to its local currency.
///
/// An unknown region falls back to the first entry sharing the language, so
/// `de_AT` maps to EUR through `de-DE`.
pub fn currency_for_locale(locale: &str) -> CurrencyCode {
    let tag = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-")
        .to_ascii_lowercase();
    let language_prefix = format!("{}-", tag.split('-').next().unwrap_or_default());

    LOCALE_CURRENCIES
        .iter()
        .find(|(l, _)| l.eq_ignore_ascii_case(&tag))
        .or_else(|| {
            LOCALE_CURRENCIES
                .iter()
                .find(|(l, _)| l.to_ascii_lowercase().starts_with(&language_prefix))
        })
        .and_then(|(_, code)| code.parse().ok())
        .unwrap_or(FALLBACK_LOCAL_CURRENCY)
}
