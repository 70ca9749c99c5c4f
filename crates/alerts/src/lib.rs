use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Alert rule engine for dashboard metrics.
/// Rules fire on the rising edge of condition satisfaction, rate-limited by
/// a per-rule cooldown.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertCondition {
    /// Metric value strictly below the threshold
    Below { threshold: f64 },

    /// Metric value strictly above the threshold
    Above { threshold: f64 },

    /// Metric value within 0.01 of the threshold
    Equals { threshold: f64 },

    /// Percent change from the previous observation at or below the
    /// threshold (negative thresholds express a decline)
    ChangePercent { threshold: f64 },
}

impl AlertCondition {
    pub fn threshold(&self) -> f64 {
        match self {
            AlertCondition::Below { threshold }
            | AlertCondition::Above { threshold }
            | AlertCondition::Equals { threshold }
            | AlertCondition::ChangePercent { threshold } => *threshold,
        }
    }

    /// Evaluates the condition for a current value, with the metric's history
    /// available for change-based conditions.
    fn is_satisfied(&self, current: f64, history: Option<&[f64]>) -> bool {
        match self {
            AlertCondition::Below { threshold } => current < *threshold,
            AlertCondition::Above { threshold } => current > *threshold,
            AlertCondition::Equals { threshold } => (current - threshold).abs() < 0.01,
            AlertCondition::ChangePercent { threshold } => {
                let Some(previous) = history.and_then(|h| h.last()).copied() else {
                    return false;
                };
                if previous == 0.0 {
                    return false;
                }
                let change = (current - previous) / previous * 100.0;
                change <= *threshold
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    pub name: String,
    pub metric: String,
    pub condition: AlertCondition,
    pub severity: Severity,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub email_enabled: bool,
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    /// Minimum time between firings of this rule
    #[serde(default)]
    pub cooldown_minutes: i64,
    #[serde(default)]
    pub last_triggered: Option<DateTime<Utc>>,
    /// Whether the condition held at the previous evaluation; firings happen
    /// only on the false-to-true transition
    #[serde(skip)]
    satisfied: bool,
}

fn default_true() -> bool {
    true
}

impl AlertRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        metric: impl Into<String>,
        condition: AlertCondition,
        severity: Severity,
        cooldown_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metric: metric.into(),
            condition,
            severity,
            enabled: true,
            email_enabled: true,
            push_enabled: true,
            cooldown_minutes,
            last_triggered: None,
            satisfied: false,
        }
    }

    fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        match self.last_triggered {
            Some(last) => now - last < Duration::minutes(self.cooldown_minutes),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: String,
    pub rule_id: String,
    pub triggered_at: DateTime<Utc>,
    pub metric_value: f64,
    pub threshold_value: f64,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertSummary {
    pub total_rules: usize,
    pub enabled_rules: usize,
    pub total_events: usize,
    pub active_events: usize,
    pub acknowledged_events: usize,
    pub resolved_events: usize,
    pub severity_breakdown: SeverityBreakdown,
    pub last_check: Option<DateTime<Utc>>,
}

/// Delivery channel for triggered alerts. Failures are logged and swallowed;
/// a broken channel never surfaces as a user-facing error.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &AlertEvent, rule: &AlertRule) -> anyhow::Result<()>;
}

pub struct AlertEngine {
    rules: Vec<AlertRule>,
    events: Vec<AlertEvent>,
    handlers: HashMap<String, Box<dyn Notifier>>,
    last_check: Option<DateTime<Utc>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl AlertEngine {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self {
            rules,
            events: Vec::new(),
            handlers: HashMap::new(),
            last_check: None,
        }
    }

    /// Engine preloaded with the stock CFO rule set.
    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    pub fn events(&self) -> &[AlertEvent] {
        &self.events
    }

    /// Adds a rule, replacing any existing rule with the same id.
    pub fn add_rule(&mut self, rule: AlertRule) {
        if let Some(pos) = self.rules.iter().position(|r| r.id == rule.id) {
            tracing::warn!(rule_id = %rule.id, "replacing existing alert rule");
            self.rules.remove(pos);
        }
        tracing::info!(rule_id = %rule.id, name = %rule.name, "added alert rule");
        self.rules.push(rule);
    }

    pub fn remove_rule(&mut self, rule_id: &str) -> bool {
        match self.rules.iter().position(|r| r.id == rule_id) {
            Some(pos) => {
                let rule = self.rules.remove(pos);
                tracing::info!(rule_id = %rule.id, "removed alert rule");
                true
            }
            None => {
                tracing::warn!(rule_id, "alert rule not found");
                false
            }
        }
    }

    pub fn register_notifier(&mut self, channel: impl Into<String>, handler: Box<dyn Notifier>) {
        let channel = channel.into();
        tracing::info!(%channel, "registered notification handler");
        self.handlers.insert(channel, handler);
    }

    /// Evaluates every enabled rule against the current metric values.
    ///
    /// A rule fires only when all of the following hold: its metric is
    /// present, its condition is satisfied, the condition was NOT satisfied
    /// at the previous evaluation (rising edge), and the cooldown since its
    /// last firing has elapsed. Time comes in as an argument so callers and
    /// tests control the clock.
    pub fn check_metrics(
        &mut self,
        current: &HashMap<String, f64>,
        historical: Option<&HashMap<String, Vec<f64>>>,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        self.last_check = Some(now);
        let mut triggered = Vec::new();

        for rule in &mut self.rules {
            if !rule.enabled {
                continue;
            }
            let Some(&value) = current.get(&rule.metric) else {
                continue;
            };
            let history = historical.and_then(|h| h.get(&rule.metric)).map(|v| &v[..]);
            let satisfied = rule.condition.is_satisfied(value, history);
            let rising_edge = satisfied && !rule.satisfied;
            rule.satisfied = satisfied;

            if !rising_edge || rule.in_cooldown(now) {
                continue;
            }

            let event = build_event(rule, value, now);
            rule.last_triggered = Some(now);
            tracing::info!(rule_id = %rule.id, message = %event.message, "alert triggered");
            dispatch(&self.handlers, &event, rule);
            triggered.push(event);
        }

        self.events.extend(triggered.iter().cloned());
        triggered
    }

    pub fn active_events(&self) -> Vec<&AlertEvent> {
        self.events.iter().filter(|e| !e.resolved).collect()
    }

    pub fn acknowledge(&mut self, event_id: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.acknowledged = true;
                tracing::info!(event_id, "alert acknowledged");
                true
            }
            None => false,
        }
    }

    pub fn resolve(&mut self, event_id: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.resolved = true;
                event.acknowledged = true;
                tracing::info!(event_id, "alert resolved");
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> AlertSummary {
        let active: Vec<&AlertEvent> = self.active_events();
        let mut breakdown = SeverityBreakdown::default();
        for event in &active {
            match event.severity {
                Severity::Critical => breakdown.critical += 1,
                Severity::High => breakdown.high += 1,
                Severity::Medium => breakdown.medium += 1,
                Severity::Low => breakdown.low += 1,
            }
        }
        AlertSummary {
            total_rules: self.rules.len(),
            enabled_rules: self.rules.iter().filter(|r| r.enabled).count(),
            total_events: self.events.len(),
            active_events: active.len(),
            acknowledged_events: self
                .events
                .iter()
                .filter(|e| e.acknowledged && !e.resolved)
                .count(),
            resolved_events: self.events.iter().filter(|e| e.resolved).count(),
            severity_breakdown: breakdown,
            last_check: self.last_check,
        }
    }
}

fn build_event(rule: &AlertRule, value: f64, now: DateTime<Utc>) -> AlertEvent {
    let message = match &rule.condition {
        AlertCondition::Below { threshold } => format!(
            "{}: {} is {:.2}, below threshold of {:.2}",
            rule.name, rule.metric, value, threshold
        ),
        AlertCondition::Above { threshold } => format!(
            "{}: {} is {:.2}, above threshold of {:.2}",
            rule.name, rule.metric, value, threshold
        ),
        AlertCondition::ChangePercent { threshold } => format!(
            "{}: {} changed by {:.1}% to {:.2}",
            rule.name, rule.metric, threshold, value
        ),
        AlertCondition::Equals { .. } => format!(
            "{}: {} triggered with value {:.2}",
            rule.name, rule.metric, value
        ),
    };
    AlertEvent {
        id: format!("{}_{}", rule.id, now.format("%Y%m%d_%H%M%S")),
        rule_id: rule.id.clone(),
        triggered_at: now,
        metric_value: value,
        threshold_value: rule.condition.threshold(),
        severity: rule.severity,
        message,
        acknowledged: false,
        resolved: false,
    }
}

fn dispatch(handlers: &HashMap<String, Box<dyn Notifier>>, event: &AlertEvent, rule: &AlertRule) {
    let channels = [("email", rule.email_enabled), ("push", rule.push_enabled)];
    for (channel, enabled) in channels {
        if !enabled {
            continue;
        }
        if let Some(handler) = handlers.get(channel) {
            if let Err(err) = handler.notify(event, rule) {
                tracing::warn!(%channel, error = %err, "notification delivery failed");
            }
        }
    }
}

/// Stock CFO rule set shipped with the dashboard.
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            "runway_critical",
            "Cash Runway Critical",
            "cash_runway_months",
            AlertCondition::Below { threshold: 3.0 },
            Severity::Critical,
            30,
        ),
        AlertRule::new(
            "runway_warning",
            "Cash Runway Warning",
            "cash_runway_months",
            AlertCondition::Below { threshold: 6.0 },
            Severity::High,
            60,
        ),
        AlertRule::new(
            "burn_rate_high",
            "High Burn Rate",
            "monthly_burn_rate",
            AlertCondition::Above {
                threshold: 100_000.0,
            },
            Severity::Medium,
            120,
        ),
        AlertRule::new(
            "revenue_decline",
            "Revenue Decline",
            "monthly_revenue",
            AlertCondition::ChangePercent { threshold: -10.0 },
            Severity::High,
            60,
        ),
        AlertRule::new(
            "cash_balance_low",
            "Low Cash Balance",
            "cash_balance",
            AlertCondition::Below {
                threshold: 250_000.0,
            },
            Severity::High,
            120,
        ),
        AlertRule::new(
            "budget_overspend",
            "Budget Overspend",
            "budget_variance_percent",
            AlertCondition::Above { threshold: 15.0 },
            Severity::Medium,
            180,
        ),
        AlertRule::new(
            "cac_high",
            "High Customer Acquisition Cost",
            "customer_acquisition_cost",
            AlertCondition::Above { threshold: 200.0 },
            Severity::Medium,
            240,
        ),
        AlertRule::new(
            "gross_margin_low",
            "Low Gross Margin",
            "gross_margin_percent",
            AlertCondition::Below { threshold: 60.0 },
            Severity::Medium,
            180,
        ),
    ]
}
