use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use models::{FinancialBaseline, FinancialInputs, ForecastResult, HeadcountRole};

/// Number of projected months after month 0; the series always holds
/// `FORECAST_MONTHS + 1` entries.
pub const FORECAST_MONTHS: usize = 24;

/// Projects a month-by-month cash balance from a baseline, a set of scenario
/// adjustments and a headcount plan.
///
/// The returned series has exactly 25 entries (months 0..=24), each floored
/// at zero. The internal balance is NOT floored between iterations: once the
/// unclamped balance goes negative the displayed series sits at zero while
/// the deficit keeps compounding underneath, so a later revenue swing has to
/// climb back through the hole before the curve lifts off the floor again.
///
/// Two deliberately different headcount treatments coexist here. The monthly
/// loop only charges roles whose `start_month` is strictly less than the
/// month being computed (a hire starting in month 3 first burdens month 4).
/// The headline `burn` and `runway` figures charge every role's salary
/// unconditionally, matching what the dashboard summary cards show.
pub fn project(
    baseline: &FinancialBaseline,
    inputs: &FinancialInputs,
    headcount: &[HeadcountRole],
) -> ForecastResult {
    let effective_revenue = baseline.monthly_revenue * (1.0 + inputs.price_increase / 100.0);

    let mut balance = baseline.bank_balance - inputs.one_time_spend;
    let mut forecast_data = Vec::with_capacity(FORECAST_MONTHS + 1);
    forecast_data.push(balance.max(0.0));

    for month in 1..=FORECAST_MONTHS {
        let headcount_cost: f64 = headcount
            .iter()
            .filter(|r| r.start_month < month as i32)
            .map(|r| r.salary)
            .sum();
        let monthly_burn =
            baseline.monthly_costs + inputs.monthly_spend + headcount_cost - effective_revenue;
        balance -= monthly_burn;
        forecast_data.push(balance.max(0.0));
    }

    let total_salaries: f64 = headcount.iter().map(|r| r.salary).sum();
    let burn = baseline.monthly_costs + inputs.monthly_spend + total_salaries - effective_revenue;
    let runway = if burn > 0.0 {
        ((baseline.bank_balance - inputs.one_time_spend) / burn).max(0.0)
    } else {
        f64::INFINITY
    };

    ForecastResult {
        runway,
        burn,
        forecast_data,
    }
}

/// Months of cash left at the given burn rate; infinite when burn is zero or
/// negative (net positive cash flow).
pub fn runway_months(cash_balance: f64, monthly_burn: f64) -> f64 {
    if monthly_burn <= 0.0 {
        return f64::INFINITY;
    }
    cash_balance / monthly_burn
}

/// One case of a scenario comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScenarioCase {
    pub cash_balance: f64,
    pub monthly_burn: f64,
    pub monthly_revenue: f64,
}

impl ScenarioCase {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            cash_balance: self.cash_balance * factor,
            monthly_burn: self.monthly_burn * factor,
            monthly_revenue: self.monthly_revenue * factor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    #[serde(flatten)]
    pub case: ScenarioCase,
    pub runway_months: f64,
}

/// Base / optimistic / pessimistic comparison around a single base case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub base_case: ScenarioOutcome,
    pub optimistic: ScenarioOutcome,
    pub pessimistic: ScenarioOutcome,
}

pub const DEFAULT_OPTIMISTIC_MULTIPLIER: f64 = 1.2;
pub const DEFAULT_PESSIMISTIC_MULTIPLIER: f64 = 0.8;

/// Scales the base case up and down by the given multipliers and computes the
/// runway for each resulting case.
pub fn analyze_scenarios(
    base_case: ScenarioCase,
    optimistic_multiplier: f64,
    pessimistic_multiplier: f64,
) -> ScenarioAnalysis {
    let outcome = |case: ScenarioCase| ScenarioOutcome {
        runway_months: runway_months(case.cash_balance, case.monthly_burn),
        case,
    };
    ScenarioAnalysis {
        base_case: outcome(base_case),
        optimistic: outcome(base_case.scaled(optimistic_multiplier)),
        pessimistic: outcome(base_case.scaled(pessimistic_multiplier)),
    }
}

/// On-disk scenario description consumed by the forecast bin and the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub baseline: FinancialBaseline,
    #[serde(default)]
    pub inputs: FinancialInputs,
    #[serde(default)]
    pub headcount: Vec<HeadcountRole>,
}

pub fn load_scenario_file(path: &Path) -> Result<ScenarioFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading scenario file: {}", path.display()))?;
    let scenario: ScenarioFile = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing scenario JSON in {}", path.display()))?;
    Ok(scenario)
}

/// Forecast document written by the generator bin.
#[derive(Debug, Serialize)]
pub struct ForecastDocument {
    pub generated_at: String,
    pub baseline: FinancialBaseline,
    pub inputs: FinancialInputs,
    pub headcount: Vec<HeadcountRole>,
    pub result: ForecastResult,
}

pub fn write_forecast_json(doc: &ForecastDocument, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(out_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_baseline() -> FinancialBaseline {
        FinancialBaseline {
            bank_balance: 5_000_000.0,
            monthly_revenue: 800_000.0,
            monthly_costs: 1_200_000.0,
        }
    }

    fn zero_inputs() -> FinancialInputs {
        FinancialInputs::default()
    }

    fn role(salary: f64, start_month: i32) -> HeadcountRole {
        HeadcountRole {
            id: format!("r-{start_month}"),
            role: "Engineer".to_string(),
            salary,
            start_month,
        }
    }

    #[test]
    fn series_has_25_non_negative_entries() {
        let result = project(&test_baseline(), &zero_inputs(), &[]);
        assert_eq!(result.forecast_data.len(), 25);
        assert!(result.forecast_data.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn worked_example_matches_dashboard_figures() {
        let result = project(&test_baseline(), &zero_inputs(), &[]);
        assert!((result.burn - 400_000.0).abs() < 0.01);
        assert!((result.runway - 12.5).abs() < 0.01);
        assert!((result.forecast_data[1] - 4_600_000.0).abs() < 0.01);
    }

    #[test]
    fn month_zero_is_balance_minus_one_time_spend() {
        let inputs = FinancialInputs {
            one_time_spend: 750_000.0,
            ..Default::default()
        };
        let result = project(&test_baseline(), &inputs, &[]);
        assert!((result.forecast_data[0] - 4_250_000.0).abs() < 0.01);
    }

    #[test]
    fn month_zero_floors_at_zero_on_oversized_one_time_spend() {
        let inputs = FinancialInputs {
            one_time_spend: 9_000_000.0,
            ..Default::default()
        };
        let result = project(&test_baseline(), &inputs, &[]);
        assert_eq!(result.forecast_data[0], 0.0);
        // Runway still divides the unclamped (negative) starting balance,
        // clamped to the non-negative domain of the displayed scalar.
        assert_eq!(result.runway, 0.0);
    }

    #[test]
    fn burning_series_is_non_increasing_and_stays_floored() {
        let result = project(&test_baseline(), &zero_inputs(), &[]);
        let mut floored = false;
        for pair in result.forecast_data.windows(2) {
            assert!(pair[1] <= pair[0] + 0.01);
            if pair[1] == 0.0 {
                floored = true;
            }
            if floored {
                assert_eq!(pair[1], 0.0);
            }
        }
        // 5M at 400k/month runs out inside the 24-month horizon.
        assert_eq!(*result.forecast_data.last().unwrap(), 0.0);
    }

    #[test]
    fn price_increase_can_make_runway_infinite() {
        let inputs = FinancialInputs {
            price_increase: 100.0, // revenue 1.6M > costs 1.2M
            ..Default::default()
        };
        let result = project(&test_baseline(), &inputs, &[]);
        assert!(result.runway.is_infinite());
        assert!(result.burn < 0.0);
        // With negative burn the series grows without an upper cap.
        assert!(result.forecast_data[24] > result.forecast_data[0]);
    }

    #[test]
    fn role_start_month_uses_strict_tie_break() {
        let baseline = FinancialBaseline {
            bank_balance: 1_000_000.0,
            monthly_revenue: 0.0,
            monthly_costs: 0.0,
        };
        let hire = role(10_000.0, 3);
        let result = project(&baseline, &zero_inputs(), &[hire]);
        // Months 1..=3 see no headcount cost; month 4 is the first burdened.
        assert!((result.forecast_data[3] - 1_000_000.0).abs() < 0.01);
        assert!((result.forecast_data[4] - 990_000.0).abs() < 0.01);
        assert!((result.forecast_data[5] - 980_000.0).abs() < 0.01);
    }

    #[test]
    fn display_burn_counts_every_role_regardless_of_start() {
        let baseline = FinancialBaseline {
            bank_balance: 1_000_000.0,
            monthly_revenue: 0.0,
            monthly_costs: 50_000.0,
        };
        // Starts near the end of the horizon: barely touches the series but
        // is fully counted in the headline burn.
        let hire = role(100_000.0, 20);
        let result = project(&baseline, &zero_inputs(), &[hire]);
        assert!((result.burn - 150_000.0).abs() < 0.01);
        // Month 1 only carries the baseline costs.
        assert!((result.forecast_data[1] - 950_000.0).abs() < 0.01);
    }

    #[test]
    fn negative_start_month_counts_from_month_one() {
        let baseline = FinancialBaseline {
            bank_balance: 500_000.0,
            monthly_revenue: 0.0,
            monthly_costs: 0.0,
        };
        let hire = role(10_000.0, -2);
        let result = project(&baseline, &zero_inputs(), &[hire]);
        assert!((result.forecast_data[1] - 490_000.0).abs() < 0.01);
    }

    #[test]
    fn projection_is_pure() {
        let baseline = test_baseline();
        let inputs = FinancialInputs {
            monthly_spend: 25_000.0,
            one_time_spend: 100_000.0,
            price_increase: 5.0,
        };
        let headcount = vec![role(80_000.0, 2), role(120_000.0, 6)];
        let a = project(&baseline, &inputs, &headcount);
        let b = project(&baseline, &inputs, &headcount);
        assert_eq!(a.forecast_data, b.forecast_data);
        assert_eq!(a.runway, b.runway);
        assert_eq!(a.burn, b.burn);
    }

    #[test]
    fn runway_months_guards_division() {
        assert!((runway_months(500_000.0, 50_000.0) - 10.0).abs() < 0.01);
        assert!(runway_months(500_000.0, 0.0).is_infinite());
        assert!(runway_months(500_000.0, -10_000.0).is_infinite());
    }

    #[test]
    fn scenario_analysis_scales_both_ways() {
        let base = ScenarioCase {
            cash_balance: 500_000.0,
            monthly_burn: 50_000.0,
            monthly_revenue: 80_000.0,
        };
        let analysis = analyze_scenarios(
            base,
            DEFAULT_OPTIMISTIC_MULTIPLIER,
            DEFAULT_PESSIMISTIC_MULTIPLIER,
        );
        assert!((analysis.base_case.runway_months - 10.0).abs() < 0.01);
        // Balance and burn scale together, so runway is unchanged.
        assert!((analysis.optimistic.runway_months - 10.0).abs() < 0.01);
        assert!((analysis.optimistic.case.cash_balance - 600_000.0).abs() < 0.01);
        assert!((analysis.pessimistic.case.monthly_burn - 40_000.0).abs() < 0.01);
    }
}
