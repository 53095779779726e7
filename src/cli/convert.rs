use super::ui;
use crate::core::{CrossRates, CurrencyCode, FxError, RateProvider};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
    pub rate: f64,
    pub converted: f64,
}

impl Conversion {
    /// Converts `amount` of the rates' base into `to`.
    pub fn new(rates: &CrossRates, amount: f64, to: CurrencyCode) -> Result<Self, FxError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(FxError::InvalidArgument(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        let from = rates.base();
        let rate = rates
            .get(to)
            .ok_or_else(|| FxError::UnresolvableTargetCurrency {
                base: from.to_string(),
                target: to.to_string(),
            })?;
        Ok(Self {
            from,
            to,
            amount,
            rate,
            converted: amount * rate,
        })
    }

    pub fn display(&self) -> String {
        let from = self.from.info();
        let to = self.to.info();
        let converted = format!("{}{:.2}", to.symbol, self.converted);

        format!(
            "{:.2} {} ({}) =\n{}\n{}\n\n{}",
            self.amount,
            from.name,
            from.symbol,
            ui::style_text(&converted, ui::StyleType::TotalValue),
            to.name,
            ui::style_text(
                &format!("1 {} = {} {}", self.from, ui::format_rate(self.rate), self.to),
                ui::StyleType::Subtle
            ),
        )
    }
}

pub async fn run(
    provider: &dyn RateProvider,
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<()> {
    let rates = ui::with_spinner(
        "Fetching exchange rates...",
        provider.fetch_rates(from.as_str()),
    )
    .await?;
    let conversion = Conversion::new(&rates, amount, to)?;

    println!("{}", conversion.display());
    println!(
        "{}",
        ui::style_text(
            &format!("Last updated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
