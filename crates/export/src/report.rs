use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use metrics::{analyze_budget, BudgetAnalysis};
use models::{BudgetItem, CashFlowItem, FlowDirection, Kpi};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowSummary {
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_flow: f64,
}

/// Comprehensive report document: the JSON body behind the export button.
#[derive(Debug, Serialize)]
pub struct FinancialReport {
    pub generated_at: String,
    pub budget_analysis: BudgetAnalysis,
    pub kpi_summary: Vec<Kpi>,
    pub cash_flow_summary: CashFlowSummary,
    pub active_alerts: usize,
}

pub fn financial_report(
    budget_items: &[BudgetItem],
    kpis: &[Kpi],
    cash_flow_items: &[CashFlowItem],
    active_alerts: usize,
    generated_at: String,
) -> FinancialReport {
    let total_inflow: f64 = cash_flow_items
        .iter()
        .filter(|i| i.direction == FlowDirection::Inflow)
        .map(|i| i.adjusted_amount())
        .sum();
    let total_outflow: f64 = cash_flow_items
        .iter()
        .filter(|i| i.direction == FlowDirection::Outflow)
        .map(|i| i.adjusted_amount().abs())
        .sum();
    let net_flow: f64 = cash_flow_items.iter().map(|i| i.adjusted_amount()).sum();

    FinancialReport {
        generated_at,
        budget_analysis: analyze_budget(budget_items),
        kpi_summary: kpis.to_vec(),
        cash_flow_summary: CashFlowSummary {
            total_inflow: round2(total_inflow),
            total_outflow: round2(total_outflow),
            net_flow: round2(net_flow),
        },
        active_alerts,
    }
}

pub fn write_report_json(report: &FinancialReport, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(out_path, json).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_budget, sample_cash_flow, sample_kpis};

    #[test]
    fn test_report_cash_flow_summary() {
        let report = financial_report(
            &sample_budget(),
            &sample_kpis(),
            &sample_cash_flow(),
            2,
            "2025-01-31T12:00:00Z".to_string(),
        );

        // Sample data: one 75k inflow against 50k + 5k + 12k outflows.
        assert!((report.cash_flow_summary.total_inflow - 75_000.0).abs() < 0.01);
        assert!((report.cash_flow_summary.total_outflow - 67_000.0).abs() < 0.01);
        assert!((report.cash_flow_summary.net_flow - 8_000.0).abs() < 0.01);
        assert_eq!(report.active_alerts, 2);
        assert_eq!(report.kpi_summary.len(), 4);
        assert!(report.budget_analysis.total_budgeted > 0.0);
    }

    #[test]
    fn test_report_writes_parseable_json() {
        let report = financial_report(
            &sample_budget(),
            &sample_kpis(),
            &sample_cash_flow(),
            0,
            "2025-01-31T12:00:00Z".to_string(),
        );
        let dir = std::env::temp_dir().join("export-report-test");
        let path = dir.join("report.json");
        write_report_json(&report, &path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["active_alerts"], 0);
        assert!(value["budget_analysis"]["categories"]["Personnel"].is_object());
    }
}
