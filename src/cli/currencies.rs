use super::ui;
use crate::core::RateTable;
use crate::core::currency::CurrencyCode;
use comfy_table::Cell;

/// Lists the supported currencies with their USD rate from `table`.
pub fn display_as_table(table: &RateTable) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
        ui::header_cell("Per 1 USD"),
    ]);

    for code in CurrencyCode::all() {
        let info = code.info();
        let rate = match table.usd_rate(code) {
            Some(rate) => ui::rate_cell(rate),
            None => ui::na_cell(),
        };
        output.add_row(vec![
            Cell::new(code),
            Cell::new(info.name),
            Cell::new(info.symbol),
            rate,
        ]);
    }
    output.to_string()
}

pub fn run(table: &RateTable) {
    println!("{}", display_as_table(table));
}
