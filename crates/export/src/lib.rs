pub mod csv_export;
pub mod print_report;
pub mod report;
pub mod sample;
pub mod validate;

pub use csv_export::{csv_filename, forecast_csv, import_budget_csv, write_forecast_csv, ScenarioSummary};
pub use print_report::print_report_html;
pub use report::{financial_report, write_report_json, CashFlowSummary, FinancialReport};
pub use sample::{sample_budget, sample_cash_flow, sample_kpis, SampleData};
pub use validate::{validate, Validation};
