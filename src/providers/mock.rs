use crate::core::error::FxError;
use crate::core::history::{self, Clock, HistoricalPoint, MissingRatePolicy, SystemClock};
use crate::core::provider::RateProvider;
use crate::core::rates::{CrossRates, RateTable};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Serves rates from a static table, pausing first to mimic a network round trip.
pub struct MockRateProvider {
    table: Arc<RateTable>,
    latency: Duration,
    policy: MissingRatePolicy,
    clock: Arc<dyn Clock>,
}

impl MockRateProvider {
    pub fn new(table: Arc<RateTable>) -> Self {
        MockRateProvider {
            table,
            latency: Duration::ZERO,
            policy: MissingRatePolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Rates wait `latency`; history waits 1.4 × `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_policy(mut self, policy: MissingRatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn simulate_latency(&self, latency: Duration) {
        if !latency.is_zero() {
            debug!(?latency, "Simulating network delay");
            tokio::time::sleep(latency).await;
        }
    }

    fn generate_history(
        &self,
        base: &str,
        target: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, FxError> {
        let mut rng = rand::thread_rng();
        history::generate(
            &self.table,
            base,
            target,
            days,
            self.clock.today(),
            self.policy,
            &mut rng,
        )
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    #[instrument(name = "MockRatesFetch", skip(self))]
    async fn fetch_rates(&self, base: &str) -> Result<CrossRates, FxError> {
        self.simulate_latency(self.latency).await;
        self.table.resolve(base)
    }

    #[instrument(name = "MockHistoryFetch", skip(self))]
    async fn fetch_history(
        &self,
        base: &str,
        target: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, FxError> {
        self.simulate_latency(self.latency.mul_f64(1.4)).await;
        self.generate_history(base, target, days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::history::FixedClock;
    use chrono::NaiveDate;

    fn provider() -> MockRateProvider {
        MockRateProvider::new(Arc::new(RateTable::builtin().clone()))
    }

    #[tokio::test]
    async fn test_fetch_rates() {
        let rates = provider().fetch_rates("GBP").await.unwrap();
        assert_eq!(rates.base().as_str(), "GBP");
        assert_eq!(rates.get(CurrencyCode::EUR), Some(0.92 / 0.79));
    }

    #[tokio::test]
    async fn test_fetch_rates_unknown_base() {
        let err = provider().fetch_rates("XYZ").await.unwrap_err();
        assert!(matches!(err, FxError::UnresolvableBaseCurrency { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let provider = provider().with_latency(Duration::from_millis(500));
        let start = tokio::time::Instant::now();

        provider.fetch_rates("USD").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));

        provider.fetch_history("USD", "EUR", 7).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test]
    async fn test_fetch_history_uses_clock() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let provider = provider().with_clock(Arc::new(FixedClock(today)));

        let points = provider.fetch_history("EUR", "USD", 30).await.unwrap();
        assert_eq!(points.len(), 30);
        assert_eq!(points[29].date, today);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 12, 3).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_history_applies_policy() {
        let table = Arc::new(RateTable::new([(CurrencyCode::EUR, 0.92)]).unwrap());

        let strict = MockRateProvider::new(Arc::clone(&table));
        assert!(matches!(
            strict.fetch_history("USD", "JPY", 7).await,
            Err(FxError::UnresolvableTargetCurrency { .. })
        ));

        let lenient = MockRateProvider::new(table).with_policy(MissingRatePolicy::AssumeParity);
        let points = lenient.fetch_history("USD", "JPY", 7).await.unwrap();
        assert!(points.iter().all(|p| (0.9..=1.1).contains(&p.rate)));
    }
}
