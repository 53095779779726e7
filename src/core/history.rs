//! Synthetic rate history: a bounded random walk that ends near the current rate.

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::rates::RateTable;
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Peak-to-peak width of the daily perturbation, as a fraction of the current rate (±5%).
const FLUCTUATION_SPAN: f64 = 0.1;
/// Downward drift reached by the newest point, as a fraction of the current rate.
const TREND_FACTOR: f64 = 0.005;
/// Longest series `generate` accepts: ten years of daily points.
pub const MAX_HISTORY_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// What to do when the target currency has no rate in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatePolicy {
    /// Report `UnresolvableTargetCurrency`.
    #[default]
    Fail,
    /// Chart around a 1:1 rate. The resulting series is not a real rate.
    AssumeParity,
}

/// Source of "today" for dating generated series.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Generates `days` points ending at `today`, oldest first.
///
/// Each point is the current `base`→`target` rate perturbed uniformly within ±5%,
/// minus a linear trend term that grows toward the present, rounded to 4 decimals.
/// Output is random; callers should only rely on the envelope.
pub fn generate<R: Rng + ?Sized>(
    table: &RateTable,
    base: &str,
    target: &str,
    days: u32,
    today: NaiveDate,
    policy: MissingRatePolicy,
    rng: &mut R,
) -> Result<Vec<HistoricalPoint>, FxError> {
    if days == 0 {
        return Err(FxError::invalid("days must be a positive integer"));
    }
    if days > MAX_HISTORY_DAYS {
        return Err(FxError::invalid(format!(
            "days must be at most {MAX_HISTORY_DAYS}, got {days}"
        )));
    }
    if today.checked_sub_days(Days::new(u64::from(days - 1))).is_none() {
        return Err(FxError::invalid(format!(
            "{days} days before {today} is out of range"
        )));
    }
    let target_code: CurrencyCode = target
        .parse()
        .map_err(|_| FxError::invalid(format!("Unknown target currency: {target}")))?;

    let rates = table.resolve(base)?;
    let current_rate = match (rates.get(target_code), policy) {
        (Some(rate), _) => rate,
        (None, MissingRatePolicy::AssumeParity) => {
            warn!(%base, %target, "No current rate, charting around 1.0");
            1.0
        }
        (None, MissingRatePolicy::Fail) => {
            return Err(FxError::UnresolvableTargetCurrency {
                base: rates.base().to_string(),
                target: target_code.to_string(),
            });
        }
    };

    let days_f = f64::from(days);
    let mut points = Vec::with_capacity(days as usize);
    for i in (0..days).rev() {
        let date = today
            .checked_sub_days(Days::new(u64::from(i)))
            .ok_or_else(|| FxError::invalid(format!("{days} days before {today} is out of range")))?;

        let fluctuation = rng.gen_range(-0.5_f64..0.5) * FLUCTUATION_SPAN * current_rate;
        let trend = f64::from(days - 1 - i) * (TREND_FACTOR * current_rate) / days_f;
        let rate = round4(current_rate + fluctuation - trend);

        points.push(HistoricalPoint { date, rate });
    }
    debug!(%base, %target, days, current_rate, "Generated synthetic history");

    Ok(points)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    fn run(base: &str, target: &str, days: u32) -> Result<Vec<HistoricalPoint>, FxError> {
        let mut rng = StdRng::seed_from_u64(7);
        generate(
            RateTable::builtin(),
            base,
            target,
            days,
            today(),
            MissingRatePolicy::Fail,
            &mut rng,
        )
    }

    fn assert_in_envelope(points: &[HistoricalPoint], current: f64) {
        let slack = 0.00005;
        for p in points {
            assert!(
                p.rate >= current * 0.94 - slack && p.rate <= current * 1.06 + slack,
                "{} outside envelope of {current}",
                p.rate
            );
            assert!(p.rate >= 0.0);
        }
    }

    #[test]
    fn test_exact_count_and_consecutive_dates() {
        for days in [1, 7, 30, 366] {
            let points = run("USD", "EUR", days).unwrap();
            assert_eq!(points.len(), days as usize);
            assert_eq!(points.last().unwrap().date, today());
            for pair in points.windows(2) {
                assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
            }
        }
    }

    #[test]
    fn test_dates_cross_month_boundary() {
        let points = run("USD", "EUR", 3).unwrap();
        let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-29", "2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn test_rates_stay_within_envelope() {
        let table = RateTable::builtin();
        for (base, target) in [("USD", "EUR"), ("EUR", "JPY"), ("GBP", "INR"), ("JPY", "USD")] {
            let current = table.resolve(base).unwrap().get(target.parse().unwrap()).unwrap();
            let mut rng = rand::thread_rng();
            for _ in 0..20 {
                let points = generate(
                    table,
                    base,
                    target,
                    30,
                    today(),
                    MissingRatePolicy::Fail,
                    &mut rng,
                )
                .unwrap();
                assert_in_envelope(&points, current);
            }
        }
    }

    #[test]
    fn test_extreme_draws_stay_within_envelope() {
        let current = 0.92;
        // StepRng yielding zero bits draws the low end of the range, all ones the high end.
        for mut rng in [StepRng::new(0, 0), StepRng::new(u64::MAX, 0)] {
            let points = generate(
                RateTable::builtin(),
                "USD",
                "EUR",
                10,
                today(),
                MissingRatePolicy::Fail,
                &mut rng,
            )
            .unwrap();
            assert_in_envelope(&points, current);
        }
    }

    #[test]
    fn test_low_draws_trend_downward() {
        let mut rng = StepRng::new(0, 0);
        let points = generate(
            RateTable::builtin(),
            "USD",
            "EUR",
            10,
            today(),
            MissingRatePolicy::Fail,
            &mut rng,
        )
        .unwrap();
        // Same perturbation every day, so only the trend term moves the series.
        assert!(points.first().unwrap().rate > points.last().unwrap().rate);
        assert!((points[0].rate - 0.874).abs() < 1e-4);
    }

    #[test]
    fn test_rates_are_rounded_to_four_decimals() {
        for p in run("EUR", "JPY", 30).unwrap() {
            assert!(((p.rate * 10_000.0).round() - p.rate * 10_000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_days_is_invalid() {
        assert!(matches!(run("USD", "EUR", 0), Err(FxError::InvalidArgument(_))));
    }

    #[test]
    fn test_days_above_maximum_are_invalid() {
        assert!(matches!(run("USD", "EUR", u32::MAX), Err(FxError::InvalidArgument(_))));
        assert!(matches!(
            run("USD", "EUR", MAX_HISTORY_DAYS + 1),
            Err(FxError::InvalidArgument(_))
        ));
        let longest = run("USD", "EUR", MAX_HISTORY_DAYS).unwrap();
        assert_eq!(longest.len(), MAX_HISTORY_DAYS as usize);
    }

    #[test]
    fn test_range_before_earliest_date_is_invalid() {
        let near_min = NaiveDate::MIN.checked_add_days(Days::new(3)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let result = generate(
            RateTable::builtin(),
            "USD",
            "EUR",
            10,
            near_min,
            MissingRatePolicy::Fail,
            &mut rng,
        );
        assert!(matches!(result, Err(FxError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_target_is_invalid() {
        assert!(matches!(run("USD", "ZZZ", 7), Err(FxError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_base_is_unresolvable() {
        assert!(matches!(
            run("ZZZ", "EUR", 7),
            Err(FxError::UnresolvableBaseCurrency { .. })
        ));
    }

    #[test]
    fn test_missing_target_rate_fails_by_default() {
        let table = RateTable::new([(CurrencyCode::EUR, 0.92)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(&table, "USD", "GBP", 7, today(), MissingRatePolicy::Fail, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            FxError::UnresolvableTargetCurrency {
                base: "USD".to_string(),
                target: "GBP".to_string()
            }
        );
    }

    #[test]
    fn test_missing_target_rate_assumes_parity_when_asked() {
        // Opt-in fallback: the chart is centered on a fabricated 1:1 rate.
        let table = RateTable::new([(CurrencyCode::EUR, 0.92)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let points = generate(
            &table,
            "USD",
            "GBP",
            7,
            today(),
            MissingRatePolicy::AssumeParity,
            &mut rng,
        )
        .unwrap();
        assert_eq!(points.len(), 7);
        assert_in_envelope(&points, 1.0);
    }

    #[test]
    fn test_point_serializes_with_iso_date() {
        let point = HistoricalPoint {
            date: today(),
            rate: 0.9213,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-02","rate":0.9213}"#);
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: MissingRatePolicy = serde_yaml::from_str("assume_parity").unwrap();
        assert_eq!(policy, MissingRatePolicy::AssumeParity);
    }
}
