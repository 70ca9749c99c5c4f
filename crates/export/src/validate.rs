use serde::Serialize;

use models::{BudgetItem, CashFlowItem, Kpi};

/// Result of a consistency pass over imported data. Errors block the import,
/// warnings are shown but do not.
#[derive(Debug, Default, Serialize)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

pub fn validate(
    budget_items: &[BudgetItem],
    cash_flow_items: &[CashFlowItem],
    kpis: &[Kpi],
) -> Validation {
    let mut out = Validation::default();

    for item in budget_items {
        if item.category.is_empty() {
            out.errors
                .push(format!("Budget item {} missing category", item.id));
        }
        if item.budgeted < 0.0 {
            out.warnings
                .push(format!("Budget item {} has negative budgeted amount", item.id));
        }
    }

    for item in cash_flow_items {
        if item.amount <= 0.0 {
            out.warnings.push(format!(
                "Cash flow item {} has zero or negative amount",
                item.id
            ));
        }
    }

    for kpi in kpis {
        if kpi.name.is_empty() {
            out.errors.push(format!("KPI item {} missing name", kpi.id));
        }
        if kpi.target <= 0.0 {
            out.warnings
                .push(format!("KPI item {} has zero or negative target", kpi.id));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_budget, sample_cash_flow, sample_kpis};
    use models::{FlowDirection, TrendDirection};

    #[test]
    fn test_sample_data_is_clean() {
        let validation = validate(&sample_budget(), &sample_cash_flow(), &sample_kpis());
        assert!(validation.is_clean());
    }

    #[test]
    fn test_validation_flags_bad_rows() {
        let budget = vec![BudgetItem {
            id: "b1".to_string(),
            category: String::new(),
            budgeted: -100.0,
            actual: 0.0,
            month: "2025-01".to_string(),
        }];
        let cash_flow = vec![CashFlowItem {
            id: "c1".to_string(),
            description: "refund".to_string(),
            amount: 0.0,
            category: "Other".to_string(),
            direction: FlowDirection::Inflow,
            date: "2025-01-01".to_string(),
            recurring: false,
        }];
        let kpis = vec![Kpi {
            id: "k1".to_string(),
            name: String::new(),
            value: 1.0,
            target: 0.0,
            unit: "%".to_string(),
            trend: TrendDirection::Stable,
            change: 0.0,
        }];

        let validation = validate(&budget, &cash_flow, &kpis);
        assert_eq!(validation.errors.len(), 2);
        assert_eq!(validation.warnings.len(), 3);
        assert!(validation.errors[0].contains("b1"));
        assert!(validation.warnings[1].contains("c1"));
    }
}
