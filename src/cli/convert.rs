use super::ui;
use crate::core::{ConversionResult, RateSource};
use crate::service::CurrencyService;
use anyhow::{Result, bail};

/// Rejects amounts the service would otherwise multiply blindly.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be a positive number, got {amount}");
    }
    Ok(amount)
}

impl ConversionResult {
    pub fn display(&self) -> String {
        format!(
            "{} = {}\n{}",
            ui::format_money(self.amount, &self.from),
            ui::style_text(
                &ui::format_money(self.converted, &self.to),
                ui::StyleType::TotalValue
            ),
            ui::style_text(
                &format!(
                    "1 {} = {} {} (updated {})",
                    self.from,
                    self.rate,
                    self.to,
                    self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                ui::StyleType::Subtle
            )
        )
    }
}

pub async fn run<S: RateSource>(
    service: &CurrencyService<S>,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    let amount = validate_amount(amount)?;
    let result = service.convert(amount, from, to).await?;
    println!("{}", result.display());
    Ok(())
}
