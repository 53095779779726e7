//! USD-anchored rate table and the cross-rate resolver built on it.

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

const BUILTIN_RATES: [(&str, f64); 32] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("JPY", 157.0),
    ("GBP", 0.79),
    ("AUD", 1.50),
    ("CAD", 1.37),
    ("CHF", 0.90),
    ("CNY", 7.25),
    ("SEK", 10.40),
    ("NZD", 1.62),
    ("MXN", 17.00),
    ("SGD", 1.35),
    ("HKD", 7.80),
    ("NOK", 10.50),
    ("KRW", 1370.0),
    ("TRY", 32.0),
    ("RUB", 90.0),
    ("INR", 83.0),
    ("BRL", 5.10),
    ("ZAR", 18.50),
    ("SAR", 3.75),
    ("AED", 3.67),
    ("EGP", 47.00),
    ("QAR", 3.64),
    ("KWD", 0.31),
    ("BHD", 0.38),
    ("OMR", 0.38),
    ("JOD", 0.71),
    ("MAD", 10.00),
    ("TND", 3.10),
    ("DZD", 135.00),
    ("IQD", 1310.0),
];

static BUILTIN: LazyLock<RateTable> = LazyLock::new(|| {
    let entries = BUILTIN_RATES
        .iter()
        .filter_map(|(code, rate)| code.parse().ok().map(|c| (c, *rate)));
    RateTable {
        rates: entries.collect(),
    }
});

/// Units of each currency per 1 USD. Immutable once built; USD is always exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    /// The mock table shipped with the binary.
    pub fn builtin() -> &'static RateTable {
        &BUILTIN
    }

    /// Validates and builds a table. A missing USD entry is added as 1.
    pub fn new(entries: impl IntoIterator<Item = (CurrencyCode, f64)>) -> Result<Self, FxError> {
        let mut rates = BTreeMap::new();
        for (code, rate) in entries {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(FxError::CorruptRateTable {
                    code: code.to_string(),
                    rate,
                });
            }
            if code == CurrencyCode::USD && rate != 1.0 {
                return Err(FxError::CorruptRateTable {
                    code: code.to_string(),
                    rate,
                });
            }
            rates.insert(code, rate);
        }
        rates.entry(CurrencyCode::USD).or_insert(1.0);
        Ok(Self { rates })
    }

    pub fn usd_rate(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Resolves cross rates for a base given as text. Unknown codes are unresolvable.
    pub fn resolve(&self, base: &str) -> Result<CrossRates, FxError> {
        let code = base
            .parse::<CurrencyCode>()
            .map_err(|_| FxError::UnresolvableBaseCurrency {
                base: base.to_string(),
            })?;
        self.cross_rates(code)
    }

    /// `CrossRates[c] = RateTable[c] / RateTable[base]` for every code in the table.
    pub fn cross_rates(&self, base: CurrencyCode) -> Result<CrossRates, FxError> {
        let base_rate = match self.usd_rate(base) {
            Some(rate) => rate,
            None if base == CurrencyCode::USD => 1.0,
            None => {
                return Err(FxError::UnresolvableBaseCurrency {
                    base: base.to_string(),
                });
            }
        };
        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(FxError::CorruptRateTable {
                code: base.to_string(),
                rate: base_rate,
            });
        }

        let mut rates = BTreeMap::new();
        for target in CurrencyCode::all() {
            let Some(target_rate) = self.usd_rate(target) else {
                warn!(%target, "No USD rate in table, skipping");
                continue;
            };
            let cross = target_rate / base_rate;
            if !cross.is_finite() || cross <= 0.0 {
                return Err(FxError::CorruptRateTable {
                    code: target.to_string(),
                    rate: cross,
                });
            }
            rates.insert(target, cross);
        }
        debug!(%base, count = rates.len(), "Resolved cross rates");

        Ok(CrossRates { base, rates })
    }
}

/// Units of each target currency per 1 unit of `base`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRates {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl CrossRates {
    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn get(&self, target: CurrencyCode) -> Option<f64> {
        self.rates.get(&target).copied()
    }

    pub fn convert(&self, amount: f64, target: CurrencyCode) -> Option<f64> {
        self.get(target).map(|rate| amount * rate)
    }

    /// Pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn small_table() -> RateTable {
        RateTable::new([
            (CurrencyCode::USD, 1.0),
            (CurrencyCode::EUR, 0.92),
            (code("JPY"), 157.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_covers_catalogue() {
        let table = RateTable::builtin();
        assert_eq!(table.len(), 32);
        assert_eq!(table.usd_rate(CurrencyCode::USD), Some(1.0));
        assert_eq!(table.usd_rate(code("IQD")), Some(1310.0));
    }

    #[test]
    fn test_usd_base_returns_table_exactly() {
        let table = RateTable::builtin();
        let rates = table.resolve("USD").unwrap();
        for c in CurrencyCode::all() {
            assert_eq!(rates.get(c), table.usd_rate(c), "mismatch for {c}");
        }
    }

    #[test]
    fn test_usd_target_is_inverse_of_base_rate() {
        let table = RateTable::builtin();
        for b in CurrencyCode::all() {
            let rates = table.cross_rates(b).unwrap();
            let expected = 1.0 / table.usd_rate(b).unwrap();
            assert_eq!(rates.get(CurrencyCode::USD), Some(expected), "base {b}");
        }
    }

    #[test]
    fn test_cross_rates_are_consistent() {
        let table = RateTable::builtin();
        for b in CurrencyCode::all() {
            let rates = table.cross_rates(b).unwrap();
            let base_rate = table.usd_rate(b).unwrap();
            for (t, rate) in rates.iter() {
                let expected = table.usd_rate(t).unwrap();
                assert!(
                    (rate * base_rate - expected).abs() <= expected * 1e-12,
                    "{b}->{t}: {rate}"
                );
            }
        }
    }

    #[test]
    fn test_eur_base_on_small_table() {
        let rates = small_table().resolve("EUR").unwrap();
        assert_eq!(rates.base(), CurrencyCode::EUR);
        assert_eq!(rates.len(), 3);
        assert!((rates.get(CurrencyCode::USD).unwrap() - 1.0870).abs() < 1e-4);
        assert_eq!(rates.get(CurrencyCode::EUR), Some(1.0));
        assert!((rates.get(code("JPY")).unwrap() - 170.652).abs() < 1e-3);
    }

    #[test]
    fn test_absent_targets_are_omitted() {
        let rates = small_table().resolve("USD").unwrap();
        assert!(rates.get(code("GBP")).is_none());
        let order: Vec<_> = rates.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, vec!["USD", "EUR", "JPY"]);
    }

    #[test]
    fn test_unknown_base_is_unresolvable() {
        let err = RateTable::builtin().resolve("ZZZ").unwrap_err();
        assert_eq!(
            err,
            FxError::UnresolvableBaseCurrency {
                base: "ZZZ".to_string()
            }
        );
    }

    #[test]
    fn test_supported_base_missing_from_table_is_unresolvable() {
        let err = small_table().resolve("GBP").unwrap_err();
        assert!(matches!(err, FxError::UnresolvableBaseCurrency { .. }));
    }

    #[test]
    fn test_usd_is_added_when_missing() {
        let table = RateTable::new([(CurrencyCode::EUR, 0.5)]).unwrap();
        assert_eq!(table.usd_rate(CurrencyCode::USD), Some(1.0));
        let rates = table.resolve("usd").unwrap();
        assert_eq!(rates.get(CurrencyCode::EUR), Some(0.5));
    }

    #[test]
    fn test_zero_and_non_finite_rates_are_corrupt() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = RateTable::new([(CurrencyCode::EUR, bad)]).unwrap_err();
            assert!(matches!(err, FxError::CorruptRateTable { .. }), "{bad}");
        }
    }

    #[test]
    fn test_usd_must_be_one() {
        let err = RateTable::new([(CurrencyCode::USD, 2.0)]).unwrap_err();
        assert!(matches!(err, FxError::CorruptRateTable { ref code, .. } if code == "USD"));
    }

    #[test]
    fn test_overflowing_division_is_corrupt() {
        let table = RateTable::new([(CurrencyCode::EUR, 1e-300), (code("JPY"), 1e300)]).unwrap();
        let err = table.resolve("EUR").unwrap_err();
        assert!(matches!(err, FxError::CorruptRateTable { ref code, .. } if code == "JPY"));
    }

    #[test]
    fn test_convert() {
        let rates = small_table().resolve("USD").unwrap();
        assert_eq!(rates.convert(100.0, CurrencyCode::EUR), Some(92.0));
        assert_eq!(rates.convert(100.0, code("GBP")), None);
    }

    #[test]
    fn test_serializes_as_object() {
        let rates = small_table().resolve("USD").unwrap();
        let json = serde_json::to_value(&rates).unwrap();
        assert_eq!(json["base"], "USD");
        assert_eq!(json["rates"]["EUR"], 0.92);
    }
}
