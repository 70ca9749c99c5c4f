use async_trait::async_trait;
use models::Scenario;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

/// Repository trait for saved scenarios
/// This abstraction allows swapping the in-memory store for a persistent one
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    async fn save_scenario(&self, scenario: Scenario) -> Result<()>;
    async fn list_scenarios(&self) -> Result<Vec<Scenario>>;
    async fn fetch_scenario(&self, name: &str) -> Result<Scenario>;
    async fn clear(&self);
}

/// Session-scoped store: scenarios live only as long as the process and are
/// lost on restart, matching the dashboard's in-memory semantics.
#[derive(Default)]
pub struct InMemoryScenarioRepository {
    scenarios: Arc<RwLock<Vec<Scenario>>>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    /// Saving under an existing name overwrites that scenario.
    async fn save_scenario(&self, scenario: Scenario) -> Result<()> {
        let mut scenarios = self.scenarios.write().await;
        if let Some(existing) = scenarios.iter_mut().find(|s| s.name == scenario.name) {
            *existing = scenario;
        } else {
            scenarios.push(scenario);
        }
        Ok(())
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        Ok(self.scenarios.read().await.clone())
    }

    async fn fetch_scenario(&self, name: &str) -> Result<Scenario> {
        self.scenarios
            .read()
            .await
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| ApiError::ScenarioNotFound(name.to_string()))
    }

    async fn clear(&self) {
        self.scenarios.write().await.clear();
    }
}
