use super::ui;
use crate::core::catalog::get_currencies;
use crate::core::config::AppConfig;
use crate::core::currency::{Currency, CurrencyCatalog};
use crate::store;
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

pub fn display_as_table(currencies: &[Currency], default_currency: Option<&str>) -> String {
    let base = default_currency.unwrap_or("default");
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Code"),
        ui::header_cell(&format!("Rate (per {base})")),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.name),
            Cell::new(&currency.iso4217),
            ui::rate_cell(currency.conversion_rate),
        ]);
    }
    table.to_string()
}

pub fn list(config: &AppConfig, catalog: &dyn CurrencyCatalog) -> Result<()> {
    let currencies = get_currencies(config, catalog)?;
    if currencies.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No active currencies to update. Add one with `xru add`.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }
    println!(
        "{}",
        display_as_table(&currencies, config.default_currency.as_deref())
    );
    Ok(())
}

pub fn add(
    catalog: &dyn CurrencyCatalog,
    iso4217: &str,
    name: &str,
    rate: Option<Decimal>,
) -> Result<()> {
    let currency = store::add_currency(catalog, iso4217, name, rate.unwrap_or(Decimal::ONE))?;
    println!(
        "Added {} ({})",
        ui::style_text(&currency.name, ui::StyleType::TotalLabel),
        currency.iso4217
    );
    Ok(())
}

pub fn deactivate(catalog: &dyn CurrencyCatalog, iso4217: &str) -> Result<()> {
    store::deactivate_currency(catalog, iso4217)?;
    println!("Deactivated {}", iso4217.to_uppercase());
    Ok(())
}
