use std::collections::HashMap;
use std::{fs, path::PathBuf, process};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use alerts::{AlertEngine, AlertRule, Severity};

#[derive(Parser, Debug)]
#[command(name = "check-alerts", about = "Evaluate alert rules against a metrics snapshot.")]
struct Args {
    /// Path to a JSON object of metric name -> current value
    #[arg(short, long)]
    metrics: PathBuf,

    /// Optional JSON array of alert rules; defaults to the stock CFO rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Optional JSON object of metric name -> historical values
    #[arg(long)]
    historical: Option<PathBuf>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let txt =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let current: HashMap<String, f64> = read_json(&args.metrics)?;
    let historical: Option<HashMap<String, Vec<f64>>> = match &args.historical {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let mut engine = match &args.rules {
        Some(path) => {
            let rules: Vec<AlertRule> = read_json(path)?;
            AlertEngine::new(rules)
        }
        None => AlertEngine::with_default_rules(),
    };

    let triggered = engine.check_metrics(&current, historical.as_ref(), Utc::now());
    println!("Triggered {} alerts:", triggered.len());
    for event in &triggered {
        println!("- {:?}: {}", event.severity, event.message);
    }

    if triggered.iter().any(|e| e.severity == Severity::Critical) {
        process::exit(1);
    }
    Ok(())
}
