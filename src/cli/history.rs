use super::ui;
use crate::core::{CurrencyCode, HistoricalPoint, RateProvider};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the series with each day's change against the first point.
pub fn display_as_table(from: CurrencyCode, to: CurrencyCode, points: &[HistoricalPoint]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("{from}/{to}")),
        ui::header_cell("Change"),
    ]);

    let first = points.first().map(|p| p.rate);
    for point in points {
        let change = match first {
            Some(first) if first > 0.0 => ui::change_cell((point.rate - first) / first * 100.0),
            _ => ui::na_cell(),
        };
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m-%d")),
            ui::rate_cell(point.rate),
            change,
        ]);
    }

    let mut output = format!(
        "{} day history for {}\n\n{table}",
        points.len(),
        ui::style_text(&format!("{from}/{to}"), ui::StyleType::Title)
    );

    let rates = points.iter().map(|p| p.rate);
    if let (Some(low), Some(high)) = (
        rates.clone().reduce(f64::min),
        rates.clone().reduce(f64::max),
    ) {
        let average = rates.sum::<f64>() / points.len() as f64;
        output.push_str(&format!(
            "\n\n{} {}  {} {}  {} {}",
            ui::style_text("Low:", ui::StyleType::TotalLabel),
            ui::format_rate(low),
            ui::style_text("High:", ui::StyleType::TotalLabel),
            ui::format_rate(high),
            ui::style_text("Average:", ui::StyleType::TotalLabel),
            ui::format_rate(average),
        ));
    }
    output
}

pub async fn run(
    provider: &dyn RateProvider,
    from: CurrencyCode,
    to: CurrencyCode,
    days: u32,
    json: bool,
) -> Result<()> {
    let points = ui::with_spinner(
        "Fetching rate history...",
        provider.fetch_history(from.as_str(), to.as_str(), days),
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        println!("{}", display_as_table(from, to, &points));
    }
    Ok(())
}
