use super::ui;
use crate::core::RateSource;
use crate::service::CurrencyService;
use anyhow::Result;

const CODES_PER_ROW: usize = 10;

pub fn display_codes(base: &str, codes: &[String]) -> String {
    let mut output = format!(
        "Currencies ({}): {}\n\n",
        ui::style_text(base, ui::StyleType::TotalLabel),
        codes.len()
    );
    let rows: Vec<String> = codes
        .chunks(CODES_PER_ROW)
        .map(|chunk| chunk.join("  "))
        .collect();
    output.push_str(&rows.join("\n"));
    output
}

pub async fn run<S: RateSource>(service: &CurrencyService<S>, base: &str) -> Result<()> {
    let codes = service.load_currencies(Some(base)).await?;
    println!("{}", display_codes(base, &codes));
    Ok(())
}
