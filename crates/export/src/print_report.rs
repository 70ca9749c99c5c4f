use models::Scenario;

fn fmt_runway(runway: f64) -> String {
    if runway.is_finite() {
        format!("{:.1} months", runway)
    } else {
        "Unlimited".to_string()
    }
}

/// Renders the printable report as a standalone HTML document. The PDF step
/// itself happens in the user's print dialog; this only builds the page that
/// gets handed to it.
pub fn print_report_html(
    currency_symbol: &str,
    runway: f64,
    burn: f64,
    scenarios: &[Scenario],
) -> String {
    let mut scenario_rows = String::new();
    for scenario in scenarios {
        scenario_rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td></tr>\n",
            scenario.name,
            fmt_runway(scenario.result.runway)
        ));
    }
    let scenario_section = if scenarios.is_empty() {
        String::new()
    } else {
        format!(
            "  <h2>Saved Scenarios</h2>\n  <table>\n    <thead><tr><th>Scenario</th><th>Runway</th></tr></thead>\n    <tbody>\n{scenario_rows}    </tbody>\n  </table>\n"
        )
    };

    format!(
        "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
  <meta charset=\"utf-8\">\n\
  <title>Runway Forecast Report</title>\n\
  <style>\n\
    body {{ font-family: sans-serif; margin: 2rem; }}\n\
    table {{ border-collapse: collapse; }}\n\
    td, th {{ border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }}\n\
  </style>\n\
</head>\n\
<body>\n\
  <h1>Runway Forecast Report</h1>\n\
  <p>Estimated runway: <strong>{runway}</strong></p>\n\
  <p>Monthly burn: <strong>{currency_symbol}{burn:.0}</strong></p>\n\
{scenario_section}\
</body>\n\
</html>\n",
        runway = fmt_runway(runway),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{FinancialBaseline, FinancialInputs, ForecastResult};

    fn scenario(name: &str, runway: f64) -> Scenario {
        Scenario {
            name: name.to_string(),
            baseline: FinancialBaseline::default(),
            inputs: FinancialInputs::default(),
            headcount: vec![],
            result: ForecastResult {
                runway,
                burn: 100_000.0,
                forecast_data: vec![0.0; 25],
            },
        }
    }

    #[test]
    fn test_report_contains_summary_and_scenarios() {
        let html = print_report_html(
            "₹",
            12.5,
            400_000.0,
            &[scenario("Scenario A", 12.5), scenario("Scenario B", f64::INFINITY)],
        );
        assert!(html.contains("<strong>12.5 months</strong>"));
        assert!(html.contains("₹400000"));
        assert!(html.contains("Scenario A"));
        assert!(html.contains("<td>Unlimited</td>"));
    }

    #[test]
    fn test_report_without_scenarios_omits_table() {
        let html = print_report_html("₹", 8.0, 250_000.0, &[]);
        assert!(!html.contains("Saved Scenarios"));
        assert!(html.contains("8.0 months"));
    }
}
