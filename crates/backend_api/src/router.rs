use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: AppState) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Calculations
        .route("/api/calculate/runway", post(handlers::calculate_runway))
        .route(
            "/api/calculate/scenario-analysis",
            post(handlers::scenario_analysis),
        )
        .route("/api/forecast", post(handlers::run_forecast))
        .route("/api/budget/analyze", post(handlers::analyze_budget))
        // Alerts
        .route("/api/alerts/check", post(handlers::check_alerts))
        .route("/api/alerts/summary", get(handlers::alert_summary))
        .route(
            "/api/alerts/:id/acknowledge",
            post(handlers::acknowledge_alert),
        )
        // Data helpers
        .route("/api/data/sample", get(handlers::sample_data))
        .route("/api/data/validate", post(handlers::validate_data))
        // Exports
        .route("/api/export/report", post(handlers::export_report))
        .route("/api/export/csv", post(handlers::export_csv))
        .route("/api/export/print", post(handlers::export_print))
        // Saved scenarios
        .route(
            "/api/scenarios",
            post(handlers::save_scenario).get(handlers::list_scenarios),
        )
        // Add shared state
        .with_state(state)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
