use super::ui;
use crate::core::config::AppConfig;
use crate::core::rates::RateMap;
use crate::fetcher::RateFetcher;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_as_table(rates: &RateMap, base: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell(&format!("Rate (per {base})")),
    ]);
    for (code, rate) in rates {
        table.add_row(vec![Cell::new(code), ui::rate_cell(*rate)]);
    }
    table.to_string()
}

/// Fetches and prints the latest rates without touching the catalog.
pub async fn run(config: &AppConfig, fetcher: &RateFetcher) -> Result<()> {
    let settings = config.provider_settings();
    let Some(base) = settings.default_currency() else {
        anyhow::bail!("No default_currency set in configuration");
    };

    let pb = ui::new_spinner("Fetching latest rates...");
    let result = fetcher.get_latest_rates(&settings).await;
    pb.finish_and_clear();
    let rates = result?;

    if rates.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No rates available against {base}"),
                ui::StyleType::Error
            )
        );
        return Ok(());
    }

    println!(
        "Latest rates: {}\n",
        ui::style_text(&base, ui::StyleType::Title)
    );
    println!("{}", display_as_table(&rates, &base));
    Ok(())
}
