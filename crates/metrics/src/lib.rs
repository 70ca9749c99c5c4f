use std::collections::HashMap;

use serde::Serialize;

use models::{BudgetItem, CashFlowItem, FlowDirection, TrendDirection};

/// Classification of a budget line against the dashboard's coloring
/// thresholds: more than 10% over is flagged, more than 10% under is flagged
/// the other way, everything between reads as on track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OverBudget,
    UnderBudget,
    OnTrack,
}

pub fn variance_percent(actual: f64, budgeted: f64) -> f64 {
    if budgeted == 0.0 {
        return 0.0;
    }
    (actual - budgeted) / budgeted * 100.0
}

pub fn classify_variance(variance: f64) -> BudgetStatus {
    if variance > 10.0 {
        BudgetStatus::OverBudget
    } else if variance < -10.0 {
        BudgetStatus::UnderBudget
    } else {
        BudgetStatus::OnTrack
    }
}

/// Status of a single budget line. None when nothing was budgeted: the
/// variance is undefined there and must not be colored.
pub fn budget_status(item: &BudgetItem) -> Option<BudgetStatus> {
    if item.budgeted == 0.0 {
        return None;
    }
    Some(classify_variance(item.variance()))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryBudget {
    pub budgeted: f64,
    pub actual: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetAnalysis {
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub total_variance: f64,
    pub categories: HashMap<String, CategoryBudget>,
}

/// Rolls budget lines up per category and computes the variance of each
/// rollup and of the grand total.
pub fn analyze_budget(items: &[BudgetItem]) -> BudgetAnalysis {
    let mut categories: HashMap<String, CategoryBudget> = HashMap::new();
    let mut total_budgeted = 0.0;
    let mut total_actual = 0.0;

    for item in items {
        let entry = categories.entry(item.category.clone()).or_default();
        entry.budgeted += item.budgeted;
        entry.actual += item.actual;
        total_budgeted += item.budgeted;
        total_actual += item.actual;
    }

    for cat in categories.values_mut() {
        if cat.budgeted > 0.0 {
            cat.variance = (cat.actual - cat.budgeted) / cat.budgeted * 100.0;
        }
    }

    let total_variance = if total_budgeted > 0.0 {
        (total_actual - total_budgeted) / total_budgeted * 100.0
    } else {
        0.0
    };

    BudgetAnalysis {
        total_budgeted,
        total_actual,
        total_variance,
        categories,
    }
}

/// Signed totals per category label: inflows count positive, outflows count
/// as negative magnitudes.
pub fn category_totals(items: &[CashFlowItem]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for item in items {
        *totals.entry(item.category.clone()).or_insert(0.0) += item.adjusted_amount();
    }
    totals
}

/// Average monthly outflow over the given window.
pub fn burn_rate(items: &[CashFlowItem], months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let total_outflow: f64 = items
        .iter()
        .filter(|i| i.direction == FlowDirection::Outflow)
        .map(|i| i.adjusted_amount())
        .sum();
    total_outflow.abs() / months as f64
}

/// Monthly recurring revenue: recurring inflows only.
pub fn monthly_recurring_revenue(items: &[CashFlowItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.direction == FlowDirection::Inflow && i.recurring)
        .map(|i| i.adjusted_amount())
        .sum()
}

pub fn gross_margin(revenue: f64, cogs: f64) -> f64 {
    if revenue == 0.0 {
        return 0.0;
    }
    (revenue - cogs) / revenue * 100.0
}

pub fn customer_acquisition_cost(marketing_spend: f64, new_customers: u32) -> f64 {
    if new_customers == 0 {
        return 0.0;
    }
    marketing_spend / new_customers as f64
}

pub fn burn_multiple(net_burn: f64, net_new_arr: f64) -> f64 {
    if net_new_arr == 0.0 {
        return f64::INFINITY;
    }
    net_burn / net_new_arr
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub change_percent: f64,
}

/// Percent change between the last two observations. Changes under 1% in
/// magnitude read as stable; a zero previous value yields a zero change.
pub fn trend(values: &[f64]) -> TrendSummary {
    if values.len() < 2 {
        return TrendSummary {
            direction: TrendDirection::Stable,
            change_percent: 0.0,
        };
    }
    let latest = values[values.len() - 1];
    let previous = values[values.len() - 2];
    let change = if previous == 0.0 {
        0.0
    } else {
        (latest - previous) / previous * 100.0
    };
    let direction = if change.abs() < 1.0 {
        TrendDirection::Stable
    } else if change > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };
    TrendSummary {
        direction,
        change_percent: change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget_item(category: &str, budgeted: f64, actual: f64) -> BudgetItem {
        BudgetItem {
            id: format!("{category}-{budgeted}"),
            category: category.to_string(),
            budgeted,
            actual,
            month: "2025-01".to_string(),
        }
    }

    fn flow(
        category: &str,
        amount: f64,
        direction: FlowDirection,
        recurring: bool,
    ) -> CashFlowItem {
        CashFlowItem {
            id: format!("{category}-{amount}"),
            description: category.to_string(),
            amount,
            category: category.to_string(),
            direction,
            date: "2025-01-01".to_string(),
            recurring,
        }
    }

    #[test]
    fn test_variance_classification_thresholds() {
        assert_eq!(classify_variance(10.1), BudgetStatus::OverBudget);
        assert_eq!(classify_variance(10.0), BudgetStatus::OnTrack);
        assert_eq!(classify_variance(-10.0), BudgetStatus::OnTrack);
        assert_eq!(classify_variance(-10.1), BudgetStatus::UnderBudget);
        assert_eq!(classify_variance(0.0), BudgetStatus::OnTrack);
    }

    #[test]
    fn test_budget_status_undefined_for_zero_budget() {
        let item = budget_item("Marketing", 0.0, 5_000.0);
        assert!(budget_status(&item).is_none());

        let item = budget_item("Marketing", 10_000.0, 12_000.0);
        assert_eq!(budget_status(&item), Some(BudgetStatus::OverBudget));
    }

    #[test]
    fn test_budget_analysis_rolls_up_categories() {
        let items = vec![
            budget_item("Personnel", 50_000.0, 52_000.0),
            budget_item("Personnel", 10_000.0, 8_000.0),
            budget_item("Marketing", 15_000.0, 12_000.0),
        ];
        let analysis = analyze_budget(&items);

        assert!((analysis.total_budgeted - 75_000.0).abs() < 0.01);
        assert!((analysis.total_actual - 72_000.0).abs() < 0.01);
        assert!((analysis.total_variance - -4.0).abs() < 0.01);

        let personnel = &analysis.categories["Personnel"];
        assert!((personnel.budgeted - 60_000.0).abs() < 0.01);
        assert!((personnel.actual - 60_000.0).abs() < 0.01);
        assert!(personnel.variance.abs() < 0.01);

        let marketing = &analysis.categories["Marketing"];
        assert!((marketing.variance - -20.0).abs() < 0.01);
    }

    #[test]
    fn test_category_totals_sign_convention() {
        let items = vec![
            flow("Revenue", 75_000.0, FlowDirection::Inflow, true),
            flow("Personnel", 50_000.0, FlowDirection::Outflow, true),
            flow("Personnel", 5_000.0, FlowDirection::Outflow, false),
        ];
        let totals = category_totals(&items);
        assert!((totals["Revenue"] - 75_000.0).abs() < 0.01);
        assert!((totals["Personnel"] + 55_000.0).abs() < 0.01);
    }

    #[test]
    fn test_burn_rate_averages_outflows_only() {
        let items = vec![
            flow("Revenue", 75_000.0, FlowDirection::Inflow, true),
            flow("Personnel", 90_000.0, FlowDirection::Outflow, true),
        ];
        assert!((burn_rate(&items, 3) - 30_000.0).abs() < 0.01);
        assert_eq!(burn_rate(&items, 0), 0.0);
    }

    #[test]
    fn test_mrr_counts_recurring_inflows_only() {
        let items = vec![
            flow("Subscriptions", 75_000.0, FlowDirection::Inflow, true),
            flow("One-off deal", 30_000.0, FlowDirection::Inflow, false),
            flow("Salaries", 50_000.0, FlowDirection::Outflow, true),
        ];
        assert!((monthly_recurring_revenue(&items) - 75_000.0).abs() < 0.01);
    }

    #[test]
    fn test_ratio_metrics_guard_their_denominators() {
        assert!((gross_margin(100_000.0, 30_000.0) - 70.0).abs() < 0.01);
        assert_eq!(gross_margin(0.0, 30_000.0), 0.0);

        assert!((customer_acquisition_cost(12_000.0, 80) - 150.0).abs() < 0.01);
        assert_eq!(customer_acquisition_cost(12_000.0, 0), 0.0);

        assert!((burn_multiple(200_000.0, 100_000.0) - 2.0).abs() < 0.01);
        assert!(burn_multiple(200_000.0, 0.0).is_infinite());
    }

    #[test]
    fn test_trend_stability_band() {
        let summary = trend(&[100.0, 100.5]);
        assert_eq!(summary.direction, TrendDirection::Stable);

        let summary = trend(&[100.0, 105.0]);
        assert_eq!(summary.direction, TrendDirection::Up);
        assert!((summary.change_percent - 5.0).abs() < 0.01);

        let summary = trend(&[100.0, 90.0]);
        assert_eq!(summary.direction, TrendDirection::Down);
    }

    #[test]
    fn test_trend_degenerate_inputs() {
        assert_eq!(trend(&[]).direction, TrendDirection::Stable);
        assert_eq!(trend(&[42.0]).direction, TrendDirection::Stable);

        let summary = trend(&[0.0, 50.0]);
        assert_eq!(summary.change_percent, 0.0);
        assert_eq!(summary.direction, TrendDirection::Stable);
    }
}
