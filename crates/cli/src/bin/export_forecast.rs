use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use export::{csv_filename, write_forecast_csv, ScenarioSummary};
use forecast_engine::{load_scenario_file, project};
use models::FinancialInputs;

#[derive(Parser, Debug)]
#[command(
    name = "export-forecast",
    about = "Export a runway forecast CSV comparing the base case with a scenario."
)]
struct Args {
    /// Path to the scenario JSON file (baseline, inputs, headcount)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Output path; defaults to runway-forecast-<date>.csv in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = load_scenario_file(&args.scenario).context("load scenario")?;
    let base_result = project(&file.baseline, &FinancialInputs::default(), &[]);
    let current_result = project(&file.baseline, &file.inputs, &file.headcount);

    let base = ScenarioSummary {
        runway: base_result.runway,
        burn: base_result.burn,
        monthly_spend: 0.0,
        one_time_spend: 0.0,
        price_increase: 0.0,
    };
    let current = ScenarioSummary {
        runway: current_result.runway,
        burn: current_result.burn,
        monthly_spend: file.inputs.monthly_spend,
        one_time_spend: file.inputs.one_time_spend,
        price_increase: file.inputs.price_increase,
    };

    let out_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(csv_filename(Local::now().date_naive())));

    write_forecast_csv(
        &out_path,
        &base,
        &current,
        &base_result.forecast_data,
        &current_result.forecast_data,
    )
    .context("write forecast csv")?;

    println!("Exported forecast CSV: {}", out_path.display());
    if current_result.runway.is_finite() {
        println!(
            "Current scenario: runway {:.1} months at burn {:.0}/month",
            current_result.runway, current_result.burn
        );
    } else {
        println!("Current scenario is cash-flow positive; runway is unbounded");
    }
    Ok(())
}
