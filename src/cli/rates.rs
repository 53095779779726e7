use super::ui;
use crate::core::{CrossRates, CurrencyCode, RateProvider};
use anyhow::Result;
use comfy_table::Cell;

impl CrossRates {
    pub fn display_as_table(&self) -> String {
        let base = self.base();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Currency"),
            ui::header_cell("Symbol"),
            ui::header_cell(&format!("Rate (per 1 {base})")),
        ]);

        for (code, rate) in self.iter() {
            let info = code.info();
            table.add_row(vec![
                Cell::new(code),
                Cell::new(info.name),
                Cell::new(info.symbol),
                ui::rate_cell(rate),
            ]);
        }

        let title = format!("{} ({base})", base.info().name);
        format!(
            "Exchange rates for {}\n\n{table}",
            ui::style_text(&title, ui::StyleType::Title)
        )
    }
}

pub async fn run(provider: &dyn RateProvider, base: CurrencyCode, json: bool) -> Result<()> {
    let rates = ui::with_spinner(
        "Fetching exchange rates...",
        provider.fetch_rates(base.as_str()),
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
    } else {
        println!("{}", rates.display_as_table());
    }
    Ok(())
}
