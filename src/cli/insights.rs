use super::ui;
use crate::core::assistant::{InsightKind, Insights, fetch_insights};
use crate::core::{AiCapability, CurrencyCode, CurrencyPair, RateProvider};
use anyhow::Result;
use tracing::error;

pub const AI_DISABLED: &str = "AI features are disabled. Set GEMINI_API_KEY or providers.gemini.api_key to enable them.";
const NO_SUGGESTIONS: &str = "Could not fetch AI suggestions at this time.";

pub fn display(pair: CurrencyPair, rate: f64, insights: &Insights) -> String {
    let mut output = format!(
        "{}  1 {} = {} {}\n",
        ui::style_text(&pair.to_string(), ui::StyleType::Title),
        pair.from,
        ui::format_rate(rate),
        pair.to
    );

    for (kind, result) in [
        (InsightKind::MarketTrend, &insights.trend),
        (InsightKind::RateOutlook, &insights.outlook),
        (InsightKind::AlertSuggestion, &insights.alert),
    ] {
        let body = match result {
            Ok(text) => text.clone(),
            Err(_) => ui::style_text(NO_SUGGESTIONS, ui::StyleType::Error),
        };
        output.push_str(&format!(
            "\n{}\n{body}\n",
            ui::style_text(&kind.to_string(), ui::StyleType::TotalLabel)
        ));
    }
    output
}

pub async fn run(
    provider: &dyn RateProvider,
    ai: &AiCapability,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<()> {
    let Some(assistant) = ai.client() else {
        println!("{AI_DISABLED}");
        return Ok(());
    };

    let rates = ui::with_spinner(
        "Fetching exchange rates...",
        provider.fetch_rates(from.as_str()),
    )
    .await?;
    let rate = rates
        .get(to)
        .ok_or_else(|| crate::core::FxError::UnresolvableTargetCurrency {
            base: from.to_string(),
            target: to.to_string(),
        })?;

    let pair = CurrencyPair { from, to };
    let insights = ui::with_spinner(
        "Asking the AI assistant...",
        fetch_insights(assistant.as_ref(), pair, rate),
    )
    .await;

    for (kind, result) in [
        (InsightKind::MarketTrend, &insights.trend),
        (InsightKind::RateOutlook, &insights.outlook),
        (InsightKind::AlertSuggestion, &insights.alert),
    ] {
        if let Err(e) = result {
            error!(%pair, %kind, error = %e, "AI insight request failed");
        }
    }

    println!("{}", display(pair, rate, &insights));
    Ok(())
}
