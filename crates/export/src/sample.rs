use serde::Serialize;

use models::{BudgetItem, CashFlowItem, FlowDirection, Kpi, TrendDirection};

/// Deterministic demo fixtures served by the sample-data endpoint.
#[derive(Debug, Serialize)]
pub struct SampleData {
    pub budget_data: Vec<BudgetItem>,
    pub cash_flow_data: Vec<CashFlowItem>,
    pub kpi_data: Vec<Kpi>,
}

impl SampleData {
    pub fn generate() -> Self {
        Self {
            budget_data: sample_budget(),
            cash_flow_data: sample_cash_flow(),
            kpi_data: sample_kpis(),
        }
    }
}

pub fn sample_budget() -> Vec<BudgetItem> {
    let rows = [
        ("1", "Personnel", 50_000.0, 52_000.0),
        ("2", "Marketing", 15_000.0, 12_000.0),
        ("3", "Operations", 8_000.0, 8_500.0),
        ("4", "R&D", 20_000.0, 18_000.0),
    ];
    rows.into_iter()
        .map(|(id, category, budgeted, actual)| BudgetItem {
            id: id.to_string(),
            category: category.to_string(),
            budgeted,
            actual,
            month: "2025-01".to_string(),
        })
        .collect()
}

pub fn sample_cash_flow() -> Vec<CashFlowItem> {
    let rows = [
        (
            "1",
            "Monthly Subscriptions",
            75_000.0,
            "Revenue",
            FlowDirection::Inflow,
            "2025-01-01",
            true,
        ),
        (
            "2",
            "Salaries",
            50_000.0,
            "Personnel",
            FlowDirection::Outflow,
            "2025-01-01",
            true,
        ),
        (
            "3",
            "Office Rent",
            5_000.0,
            "Operations",
            FlowDirection::Outflow,
            "2025-01-01",
            true,
        ),
        (
            "4",
            "Marketing Campaign",
            12_000.0,
            "Marketing",
            FlowDirection::Outflow,
            "2025-01-15",
            false,
        ),
    ];
    rows.into_iter()
        .map(
            |(id, description, amount, category, direction, date, recurring)| CashFlowItem {
                id: id.to_string(),
                description: description.to_string(),
                amount,
                category: category.to_string(),
                direction,
                date: date.to_string(),
                recurring,
            },
        )
        .collect()
}

pub fn sample_kpis() -> Vec<Kpi> {
    vec![
        Kpi {
            id: "1".to_string(),
            name: "Monthly Recurring Revenue".to_string(),
            value: 75_000.0,
            target: 80_000.0,
            unit: "₹".to_string(),
            trend: TrendDirection::Up,
            change: 5.2,
        },
        Kpi {
            id: "2".to_string(),
            name: "Customer Acquisition Cost".to_string(),
            value: 150.0,
            target: 120.0,
            unit: "₹".to_string(),
            trend: TrendDirection::Down,
            change: -8.1,
        },
        Kpi {
            id: "3".to_string(),
            name: "Gross Margin".to_string(),
            value: 68.5,
            target: 70.0,
            unit: "%".to_string(),
            trend: TrendDirection::Stable,
            change: 0.3,
        },
        Kpi {
            id: "4".to_string(),
            name: "Cash Runway".to_string(),
            value: 14.2,
            target: 18.0,
            unit: "months".to_string(),
            trend: TrendDirection::Down,
            change: -2.1,
        },
    ]
}
