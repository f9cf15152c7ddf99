use super::ui;
use crate::core::pairs::{PairEntry, PairList};
use crate::core::{ConversionError, ConversionResult, RateSource};
use crate::service::CurrencyService;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use tracing::{debug, info};

/// A configured pair and the outcome of converting it.
pub struct PairRow {
    pub entry: PairEntry,
    pub result: Result<ConversionResult, ConversionError>,
}

/// Converts every configured pair concurrently.
pub async fn convert_all<S: RateSource>(
    service: &CurrencyService<S>,
    entries: &[PairEntry],
) -> Vec<PairRow> {
    let pb = ui::new_progress_bar(entries.len() as u64);
    pb.set_message("Fetching rates...");

    let futures = entries.iter().map(|entry| {
        let pb_clone = pb.clone();
        async move {
            let result = service.convert(entry.amount, &entry.from, &entry.to).await;
            pb_clone.inc(1);
            PairRow {
                entry: entry.clone(),
                result,
            }
        }
    });

    let rows = join_all(futures).await;
    pb.finish_and_clear();
    rows
}

pub fn display_as_table(rows: &[PairRow]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Converted"),
        ui::header_cell("Status"),
        ui::header_cell("Updated"),
    ]);

    for row in rows {
        let entry = &row.entry;
        let ok = row.result.as_ref().ok();
        let error = row.result.as_ref().err().map(|e| e.to_string());

        table.add_row(vec![
            Cell::new(format!("{} -> {}", entry.from, entry.to)),
            ui::format_optional_cell(Some(entry.amount), |a| ui::format_money(a, &entry.from)),
            ui::format_optional_cell(ok.map(|r| r.rate), |r| format!("{r:.4}")),
            ui::format_optional_cell(ok.map(|r| r.converted), |c| ui::format_money(c, &entry.to)),
            ui::status_cell(error.as_deref()),
            ui::format_optional_cell(ok.map(|r| r.updated_at), |t| {
                t.format("%H:%M:%S").to_string()
            }),
        ]);
    }

    table.to_string()
}

pub async fn list<S: RateSource>(service: &CurrencyService<S>, pairs: &PairList) -> Result<()> {
    if pairs.entries().is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No pairs configured. Add one with `fxconv pairs add <FROM> <TO>`.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let rows = convert_all(service, pairs.entries()).await;
    let failed = rows.iter().filter(|r| r.result.is_err()).count();
    debug!("Converted {} pairs, {} failed", rows.len(), failed);

    println!("{}", display_as_table(&rows));
    if failed > 0 {
        println!(
            "\n{}",
            ui::style_text(
                &format!("{failed} of {} pairs failed to convert", rows.len()),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}

pub fn add(pairs: &mut PairList, from: &str, to: &str, amount: f64) -> Result<()> {
    let amount = super::convert::validate_amount(amount)?;
    let entry = PairEntry::new(from, to, amount);
    info!("Adding pair {} -> {}", entry.from, entry.to);
    pairs.add(entry)?;
    println!("Saved {} -> {}", from.to_uppercase(), to.to_uppercase());
    Ok(())
}

pub fn remove(pairs: &mut PairList, from: &str, to: &str) -> Result<()> {
    if pairs.remove(from, to)? {
        println!("Removed {} -> {}", from.to_uppercase(), to.to_uppercase());
    } else {
        anyhow::bail!(
            "Pair {} -> {} is not configured",
            from.to_uppercase(),
            to.to_uppercase()
        );
    }
    Ok(())
}
