//! Rate source abstraction

use crate::core::error::FxError;
use crate::core::history::HistoricalPoint;
use crate::core::rates::CrossRates;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<CrossRates, FxError>;

    async fn fetch_history(
        &self,
        base: &str,
        target: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, FxError>;
}
