use anyhow::{Context, Result};
use chrono::Local;
use forecast_engine::{load_scenario_file, project, write_forecast_json, ForecastDocument};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let scenario = env::args()
        .position(|a| a == "--scenario")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or("scenario.json".to_string());
    let out = env::args()
        .position(|a| a == "--out")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or("forecast/forecast.json".to_string());

    let scenario_path = PathBuf::from(&scenario);
    let out_path = PathBuf::from(&out);

    println!(
        "Running forecast...\n  scenario: {}\n  output  : {}",
        scenario_path.display(),
        out_path.display()
    );

    let file = load_scenario_file(&scenario_path).context("load scenario")?;
    let result = project(&file.baseline, &file.inputs, &file.headcount);

    let doc = ForecastDocument {
        generated_at: Local::now().to_rfc3339(),
        baseline: file.baseline,
        inputs: file.inputs,
        headcount: file.headcount,
        result,
    };
    write_forecast_json(&doc, &out_path).context("write forecast.json")?;

    if doc.result.runway.is_finite() {
        println!(
            "Done. Runway {:.1} months at burn {:.0}/month",
            doc.result.runway, doc.result.burn
        );
    } else {
        println!("Done. Cash-flow positive; runway is unbounded");
    }
    Ok(())
}
