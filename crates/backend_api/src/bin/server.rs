use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use alerts::AlertEngine;
use backend_api::{run_server, AppState, InMemoryScenarioRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse environment variables (with sane defaults)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);

    // Optional settings file provides the display currency; everything else
    // works without one.
    let settings = settings_loader::settings_or_defaults(settings_path.as_ref())?;

    println!("Planning Dashboard API Server");
    println!("=============================");
    println!("Listening on: {}:{}", host, port);
    match &settings_path {
        Some(path) => println!("Settings: {}", path.display()),
        None => println!("Settings: defaults (no settings.json found)"),
    }
    println!();

    let state = AppState {
        scenarios: Arc::new(InMemoryScenarioRepository::new()),
        alerts: Arc::new(RwLock::new(AlertEngine::with_default_rules())),
        currency_symbol: settings.currency_symbol,
    };

    // Start the server
    run_server(state, &host, port).await?;

    Ok(())
}
