use super::ui;
use crate::core::expenses::{ExpenseItem, ExpenseSheet};
use crate::core::{CrossRates, CurrencyCode, RateProvider};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the sheet and its total converted into `target`.
pub fn display_as_table(sheet: &ExpenseSheet, rates: &CrossRates, target: CurrencyCode) -> String {
    let currency = sheet.currency();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Expense"),
        ui::header_cell(&format!("Amount ({currency})")),
        ui::header_cell(&format!("Amount ({target})")),
    ]);

    for item in sheet.items() {
        let converted = rates
            .convert(item.amount, target)
            .map_or_else(ui::na_cell, ui::amount_cell);
        table.add_row(vec![
            Cell::new(&item.name),
            ui::amount_cell(item.amount),
            converted,
        ]);
    }

    let mut output = format!(
        "Travel expenses in {}\n\n{table}",
        ui::style_text(currency.info().name, ui::StyleType::Title)
    );

    output.push_str(&format!(
        "\n\nTotal ({}): {}",
        ui::style_text(currency.as_str(), ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", sheet.total()), ui::StyleType::TotalValue)
    ));

    let converted = match sheet.converted_total(rates, target) {
        Some(total) => ui::style_text(
            &format!("{}{total:.2}", target.info().symbol),
            ui::StyleType::TotalValue,
        ),
        None => ui::style_text(
            &format!("Could not convert to {target}. Rate unavailable."),
            ui::StyleType::Error,
        ),
    };
    output.push_str(&format!(
        "\nTotal ({}): {converted}",
        ui::style_text(target.as_str(), ui::StyleType::TotalLabel),
    ));
    output
}

pub async fn run(
    provider: &dyn RateProvider,
    from: CurrencyCode,
    to: CurrencyCode,
    items: &[ExpenseItem],
) -> Result<()> {
    let mut sheet = ExpenseSheet::new(from);
    for item in items {
        sheet.push(item.clone());
    }

    let rates = ui::with_spinner(
        "Fetching exchange rates...",
        provider.fetch_rates(from.as_str()),
    )
    .await?;

    println!("{}", display_as_table(&sheet, &rates, to));
    Ok(())
}
