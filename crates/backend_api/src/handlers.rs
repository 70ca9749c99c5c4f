use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use alerts::{AlertEngine, AlertEvent, AlertSummary};
use export::{
    csv_filename, financial_report, forecast_csv, print_report_html, validate, SampleData,
    ScenarioSummary, Validation,
};
use forecast_engine::{
    analyze_scenarios, project, runway_months, ScenarioAnalysis, ScenarioCase,
    DEFAULT_OPTIMISTIC_MULTIPLIER, DEFAULT_PESSIMISTIC_MULTIPLIER,
};
use models::{
    BudgetItem, CashFlowItem, FinancialBaseline, FinancialInputs, ForecastResult, HeadcountRole,
    Kpi, Scenario,
};

use crate::{error::ApiError, repository::ScenarioRepository, Result};

/// Shared state behind every handler: the scenario store, the alert engine
/// and the display currency.
#[derive(Clone)]
pub struct AppState {
    pub scenarios: Arc<dyn ScenarioRepository>,
    pub alerts: Arc<RwLock<AlertEngine>>,
    pub currency_symbol: String,
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "planning-dashboard-api"
    }))
}

#[derive(Debug, Deserialize)]
pub struct RunwayRequest {
    #[serde(default)]
    pub cash_balance: f64,
    #[serde(default)]
    pub monthly_burn: f64,
}

#[derive(Debug, Serialize)]
pub struct RunwayResponse {
    /// Serialized as null when the runway is unbounded
    pub runway_months: f64,
    pub cash_balance: f64,
    pub monthly_burn: f64,
    pub calculated_at: String,
}

/// POST /api/calculate/runway
/// Months of cash left at the given burn rate
pub async fn calculate_runway(Json(req): Json<RunwayRequest>) -> Result<impl IntoResponse> {
    Ok(Json(RunwayResponse {
        runway_months: runway_months(req.cash_balance, req.monthly_burn),
        cash_balance: req.cash_balance,
        monthly_burn: req.monthly_burn,
        calculated_at: Utc::now().to_rfc3339(),
    }))
}

fn default_optimistic() -> f64 {
    DEFAULT_OPTIMISTIC_MULTIPLIER
}

fn default_pessimistic() -> f64 {
    DEFAULT_PESSIMISTIC_MULTIPLIER
}

#[derive(Debug, Deserialize)]
pub struct ScenarioAnalysisRequest {
    pub base_case: ScenarioCase,
    #[serde(default = "default_optimistic")]
    pub optimistic_multiplier: f64,
    #[serde(default = "default_pessimistic")]
    pub pessimistic_multiplier: f64,
}

#[derive(Debug, Serialize)]
pub struct ScenarioAnalysisResponse {
    pub scenarios: ScenarioAnalysis,
    pub calculated_at: String,
}

/// POST /api/calculate/scenario-analysis
/// Base / optimistic / pessimistic comparison for a base case
pub async fn scenario_analysis(
    Json(req): Json<ScenarioAnalysisRequest>,
) -> Result<impl IntoResponse> {
    let scenarios = analyze_scenarios(
        req.base_case,
        req.optimistic_multiplier,
        req.pessimistic_multiplier,
    );
    Ok(Json(ScenarioAnalysisResponse {
        scenarios,
        calculated_at: Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub baseline: FinancialBaseline,
    #[serde(default)]
    pub inputs: FinancialInputs,
    #[serde(default)]
    pub headcount: Vec<HeadcountRole>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    #[serde(flatten)]
    pub result: ForecastResult,
    pub calculated_at: String,
}

/// POST /api/forecast
/// Full 25-month runway projection for a scenario
pub async fn run_forecast(Json(req): Json<ForecastRequest>) -> Result<impl IntoResponse> {
    let result = project(&req.baseline, &req.inputs, &req.headcount);
    Ok(Json(ForecastResponse {
        result,
        calculated_at: Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BudgetAnalysisRequest {
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
}

/// POST /api/budget/analyze
/// Variance rollup per category and for the grand total
pub async fn analyze_budget(Json(req): Json<BudgetAnalysisRequest>) -> Result<impl IntoResponse> {
    let analysis = metrics::analyze_budget(&req.budget_items);
    Ok(Json(serde_json::json!({
        "analysis": analysis,
        "calculated_at": Utc::now().to_rfc3339(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct CheckAlertsRequest {
    #[serde(default)]
    pub current_metrics: HashMap<String, f64>,
    #[serde(default)]
    pub historical_metrics: Option<HashMap<String, Vec<f64>>>,
}

#[derive(Debug, Serialize)]
pub struct CheckAlertsResponse {
    pub triggered_alerts: Vec<AlertEvent>,
    pub alert_summary: AlertSummary,
    pub checked_at: String,
}

/// POST /api/alerts/check
/// Evaluates the rule set against the posted metric values
pub async fn check_alerts(
    State(state): State<AppState>,
    Json(req): Json<CheckAlertsRequest>,
) -> Result<impl IntoResponse> {
    let now = Utc::now();
    let mut engine = state.alerts.write().await;
    let triggered = engine.check_metrics(&req.current_metrics, req.historical_metrics.as_ref(), now);
    Ok(Json(CheckAlertsResponse {
        triggered_alerts: triggered,
        alert_summary: engine.summary(),
        checked_at: now.to_rfc3339(),
    }))
}

/// GET /api/alerts/summary
pub async fn alert_summary(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let engine = state.alerts.read().await;
    Ok(Json(engine.summary()))
}

/// POST /api/alerts/:id/acknowledge
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse> {
    let mut engine = state.alerts.write().await;
    if !engine.acknowledge(&event_id) {
        return Err(ApiError::AlertEventNotFound(event_id));
    }
    Ok(Json(serde_json::json!({
        "success": true,
        "event_id": event_id,
        "acknowledged_at": Utc::now().to_rfc3339(),
    })))
}

/// GET /api/data/sample
/// Demo fixtures for an empty dashboard
pub async fn sample_data() -> impl IntoResponse {
    Json(SampleData::generate())
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub budget_data: Vec<BudgetItem>,
    #[serde(default)]
    pub cash_flow_data: Vec<CashFlowItem>,
    #[serde(default)]
    pub kpi_data: Vec<Kpi>,
}

/// POST /api/data/validate
pub async fn validate_data(Json(req): Json<ValidateRequest>) -> Json<Validation> {
    Json(validate(&req.budget_data, &req.cash_flow_data, &req.kpi_data))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub cash_flow_items: Vec<CashFlowItem>,
}

/// POST /api/export/report
/// Comprehensive JSON report including the current active alert count
pub async fn export_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<impl IntoResponse> {
    let active_alerts = state.alerts.read().await.active_events().len();
    let report = financial_report(
        &req.budget_items,
        &req.kpis,
        &req.cash_flow_items,
        active_alerts,
        Utc::now().to_rfc3339(),
    );
    Ok(Json(report))
}

/// POST /api/export/csv
/// Runway forecast CSV comparing the base case (no adjustments) against the
/// posted scenario; served as a file download
pub async fn export_csv(Json(req): Json<ForecastRequest>) -> Result<impl IntoResponse> {
    let base_result = project(&req.baseline, &FinancialInputs::default(), &[]);
    let current_result = project(&req.baseline, &req.inputs, &req.headcount);

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
        monthly_spend: req.inputs.monthly_spend,
        one_time_spend: req.inputs.one_time_spend,
        price_increase: req.inputs.price_increase,
    };

    let csv = forecast_csv(
        &base,
        &current,
        &base_result.forecast_data,
        &current_result.forecast_data,
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let filename = csv_filename(Utc::now().date_naive());
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"")
            .parse()
            .unwrap(),
    );
    Ok((headers, csv))
}

/// POST /api/export/print
/// Printable HTML report with the current runway figures and every saved
/// scenario; the browser's print dialog handles the PDF step
pub async fn export_print(
    State(state): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<Html<String>> {
    let result = project(&req.baseline, &req.inputs, &req.headcount);
    let scenarios = state.scenarios.list_scenarios().await?;
    Ok(Html(print_report_html(
        &state.currency_symbol,
        result.runway,
        result.burn,
        &scenarios,
    )))
}

#[derive(Debug, Deserialize)]
pub struct SaveScenarioRequest {
    pub name: String,
    #[serde(default)]
    pub baseline: FinancialBaseline,
    #[serde(default)]
    pub inputs: FinancialInputs,
    #[serde(default)]
    pub headcount: Vec<HeadcountRole>,
}

/// POST /api/scenarios
/// Runs the projection and stores the named snapshot in memory
pub async fn save_scenario(
    State(state): State<AppState>,
    Json(req): Json<SaveScenarioRequest>,
) -> Result<impl IntoResponse> {
    let result = project(&req.baseline, &req.inputs, &req.headcount);
    let scenario = Scenario {
        name: req.name,
        baseline: req.baseline,
        inputs: req.inputs,
        headcount: req.headcount,
        result,
    };
    state.scenarios.save_scenario(scenario.clone()).await?;
    Ok(Json(scenario))
}

/// GET /api/scenarios
pub async fn list_scenarios(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let scenarios = state.scenarios.list_scenarios().await?;
    Ok(Json(scenarios))
}
