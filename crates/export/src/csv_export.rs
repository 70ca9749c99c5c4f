use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;

use models::BudgetItem;

/// Summary figures for one scenario column of the export.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSummary {
    pub runway: f64,
    pub burn: f64,
    pub monthly_spend: f64,
    pub one_time_spend: f64,
    pub price_increase: f64,
}

fn fmt_runway(runway: f64) -> String {
    if runway.is_finite() {
        format!("{:.1}", runway)
    } else {
        "Infinity".to_string()
    }
}

/// Builds the runway-forecast CSV: a summary block comparing base case and
/// current scenario, a blank separator row, then the two 25-month series
/// labeled M0 through M24.
pub fn forecast_csv(
    base: &ScenarioSummary,
    current: &ScenarioSummary,
    base_series: &[f64],
    current_series: &[f64],
) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(["Metric", "Base Case", "Current Scenario"])?;
    writer.write_record([
        "Runway (months)".to_string(),
        fmt_runway(base.runway),
        fmt_runway(current.runway),
    ])?;
    writer.write_record([
        "Monthly Burn (₹)".to_string(),
        format!("{:.0}", base.burn),
        format!("{:.0}", current.burn),
    ])?;
    writer.write_record([
        "Monthly Spend (₹)".to_string(),
        format!("{:.0}", base.monthly_spend),
        format!("{:.0}", current.monthly_spend),
    ])?;
    writer.write_record([
        "One-time Spend (₹)".to_string(),
        format!("{:.0}", base.one_time_spend),
        format!("{:.0}", current.one_time_spend),
    ])?;
    writer.write_record([
        "Price Change (%)".to_string(),
        format!("{:.1}", base.price_increase),
        format!("{:.1}", current.price_increase),
    ])?;

    writer.write_record(["", "", ""])?;

    writer.write_record(["Month", "Base Forecast", "Current Forecast"])?;
    for (month, (base_value, current_value)) in
        base_series.iter().zip(current_series.iter()).enumerate()
    {
        writer.write_record([
            format!("M{month}"),
            format!("{:.2}", base_value),
            format!("{:.2}", current_value),
        ])?;
    }

    let bytes = writer.into_inner().context("flush csv writer")?;
    Ok(String::from_utf8(bytes).context("csv output is not utf-8")?)
}

/// Export filename for a given date, e.g. `runway-forecast-2025-08-06.csv`.
pub fn csv_filename(date: NaiveDate) -> String {
    format!("runway-forecast-{}.csv", date.format("%Y-%m-%d"))
}

pub fn write_forecast_csv(
    out_path: &Path,
    base: &ScenarioSummary,
    current: &ScenarioSummary,
    base_series: &[f64],
    current_series: &[f64],
) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let csv = forecast_csv(base, current, base_series, current_series)?;
    fs::write(out_path, csv).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct BudgetRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    budgeted: Option<String>,
    #[serde(default)]
    actual: Option<String>,
    #[serde(default)]
    month: Option<String>,
}

/// Reads budget lines from a CSV file. Numeric fields that fail to parse
/// default to 0, missing categories default to "Other", missing months to
/// `default_month` — bad rows degrade instead of failing the import.
pub fn import_budget_csv(path: &Path, default_month: &str) -> Result<Vec<BudgetItem>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let mut items = Vec::new();
    for row in reader.deserialize::<BudgetRow>() {
        let row = match row {
            Ok(row) => row,
            Err(_) => continue,
        };
        let parse_amount = |field: &Option<String>| -> f64 {
            field
                .as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        items.push(BudgetItem {
            id: row
                .id
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| (items.len() + 1).to_string()),
            category: row
                .category
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Other".to_string()),
            budgeted: parse_amount(&row.budgeted),
            actual: parse_amount(&row.actual),
            month: row
                .month
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default_month.to_string()),
        });
    }
    Ok(items)
}
