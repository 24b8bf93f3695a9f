use super::ui;
use crate::core::config::AppConfig;
use crate::core::currency::CurrencyCatalog;
use crate::fetcher::RateFetcher;
use crate::updater::{self, UpdateReport};
use anyhow::Result;
use comfy_table::Cell;

impl UpdateReport {
    pub fn display_as_table(&self) -> String {
        let base = self.default_currency.as_deref().unwrap_or("default");
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Code"),
            ui::header_cell(&format!("Old rate (per {base})")),
            ui::header_cell("New rate"),
            ui::header_cell("Status"),
        ]);

        for change in &self.changes {
            let id = &change.currency.id;
            let status = match &self.saved {
                None => ui::status_cell("Dry run", true),
                Some(saved) if saved.updated.contains(id) => ui::status_cell("Updated", true),
                Some(saved) if saved.missing.contains(id) => ui::status_cell("Missing", false),
                Some(saved) if saved.rejected.contains(id) => {
                    ui::status_cell("Rejected", false)
                }
                Some(_) => ui::status_cell("Failed", false),
            };
            table.add_row(vec![
                Cell::new(&change.currency.name),
                Cell::new(&change.currency.iso4217),
                ui::rate_cell(change.currency.conversion_rate),
                ui::rate_cell(change.new_rate),
                status,
            ]);
        }

        let mut output = table.to_string();
        if !self.unpriced.is_empty() {
            output.push_str(&format!(
                "\n\n{} {}",
                ui::style_text("No rate available for:", ui::StyleType::Error),
                self.unpriced.join(", ")
            ));
        }
        if let Some(saved) = &self.saved {
            for (id, reason) in &saved.failed {
                output.push_str(&format!(
                    "\n{}",
                    ui::style_text(&format!("{id}: {reason}"), ui::StyleType::Subtle)
                ));
            }
        }
        output
    }
}

pub async fn run(
    config: &AppConfig,
    catalog: &dyn CurrencyCatalog,
    fetcher: &RateFetcher,
    dry_run: bool,
) -> Result<()> {
    let settings = config.provider_settings();

    let pb = ui::new_spinner("Updating conversion rates...");
    let result = updater::update_rates(config, catalog, fetcher, &settings, dry_run).await;
    pb.finish_and_clear();
    let report = result?;

    if report.changes.is_empty() {
        println!(
            "{}",
            ui::style_text("Nothing to update.", ui::StyleType::Subtle)
        );
        if !report.unpriced.is_empty() {
            println!("No rate available for: {}", report.unpriced.join(", "));
        }
        return Ok(());
    }

    println!("{}", report.display_as_table());
    if let Some(saved) = &report.saved {
        let summary = format!("{} of {} updated", saved.updated.len(), report.changes.len());
        let style_type = if saved.is_complete() {
            ui::StyleType::Success
        } else {
            ui::StyleType::Error
        };
        println!("\n{}", ui::style_text(&summary, style_type));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::currency::Currency;
    use crate::core::writer::SaveReport;
    use crate::updater::{RateChange, UpdateReport};
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_as_table() {
        let report = UpdateReport {
            default_currency: Some("USD".to_string()),
            changes: vec![
                RateChange {
                    currency: Currency::new("a", "Euro", "EUR", dec!(0.9)),
                    new_rate: dec!(0.9091),
                },
                RateChange {
                    currency: Currency::new("b", "Japanese Yen", "JPY", dec!(150)),
                    new_rate: dec!(118.18),
                },
            ],
            unpriced: vec!["XAU".to_string()],
            saved: Some(SaveReport {
                updated: vec!["a".to_string()],
                missing: vec!["b".to_string()],
                ..Default::default()
            }),
        };

        let output = report.display_as_table();

        assert!(output.contains("Old rate (per USD)"));
        assert!(output.contains("Updated"));
        assert!(output.contains("Missing"));
        assert!(output.contains("XAU"));
    }
}
