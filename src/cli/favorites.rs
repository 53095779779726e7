use super::ui;
use crate::core::favorites::Favorites;
use crate::core::{CrossRates, CurrencyCode, FxError, RateProvider};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;

pub fn display_as_table(
    favorites: &Favorites,
    rates: &HashMap<CurrencyCode, Result<CrossRates, FxError>>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);

    for pair in favorites.pairs() {
        let rate = rates
            .get(&pair.from)
            .and_then(|r| r.as_ref().ok())
            .and_then(|r| r.get(pair.to));
        table.add_row(vec![
            Cell::new(pair),
            Cell::new(pair.from.info().name),
            Cell::new(pair.to.info().name),
            rate.map_or_else(ui::na_cell, ui::rate_cell),
        ]);
    }

    format!(
        "{}\n\n{table}",
        ui::style_text("Favorite pairs", ui::StyleType::Title)
    )
}

pub async fn run(provider: &dyn RateProvider, favorites: &Favorites) -> Result<()> {
    if favorites.is_empty() {
        println!("No favorite pairs saved yet. Add some under `favorites` in the config file.");
        return Ok(());
    }

    let mut bases: Vec<CurrencyCode> = favorites.pairs().iter().map(|p| p.from).collect();
    bases.sort();
    bases.dedup();

    let rate_futures = bases.into_iter().map(|base| async move {
        let rates = provider.fetch_rates(base.as_str()).await;
        if let Err(e) = &rates {
            warn!(%base, error = %e, "Could not resolve favorite rates");
        }
        (base, rates)
    });
    let rates: HashMap<_, _> = ui::with_spinner("Fetching exchange rates...", join_all(rate_futures))
        .await
        .into_iter()
        .collect();

    println!("{}", display_as_table(favorites, &rates));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use crate::core::favorites::FavoritePair;
    use crate::providers::mock::MockRateProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pair(from: &str, to: &str) -> FavoritePair {
        FavoritePair {
            from: from.parse().unwrap(),
            to: to.parse().unwrap(),
        }
    }

    struct CountingProvider {
        inner: MockRateProvider,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateProvider for CountingProvider {
        async fn fetch_rates(&self, base: &str) -> Result<CrossRates, FxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_rates(base).await
        }

        async fn fetch_history(
            &self,
            base: &str,
            target: &str,
            days: u32,
        ) -> Result<Vec<crate::core::HistoricalPoint>, FxError> {
            self.inner.fetch_history(base, target, days).await
        }
    }

    #[tokio::test]
    async fn test_rates_resolved_once_per_base() {
        let provider = CountingProvider {
            inner: MockRateProvider::new(Arc::new(RateTable::builtin().clone())),
            calls: AtomicUsize::new(0),
        };
        let favorites =
            Favorites::from_pairs([pair("USD", "EUR"), pair("USD", "JPY"), pair("GBP", "JPY")])
                .unwrap();

        run(&provider, &favorites).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_display_as_table() {
        let table = RateTable::builtin();
        let favorites = Favorites::from_pairs([pair("USD", "EUR"), pair("SAR", "AED")]).unwrap();
        let rates = HashMap::from([
            (CurrencyCode::USD, table.cross_rates(CurrencyCode::USD)),
            (
                "SAR".parse().unwrap(),
                Err(FxError::UnresolvableBaseCurrency {
                    base: "SAR".to_string(),
                }),
            ),
        ]);

        let output = display_as_table(&favorites, &rates);
        assert!(output.contains("USD/EUR"));
        assert!(output.contains("0.9200"));
        assert!(output.contains("SAR/AED"));
        assert!(output.contains("N/A"));
    }
}
