use serde::{Deserialize, Serialize};

/// Fixed reference point for a projection: the company's position before any
/// scenario adjustments are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FinancialBaseline {
    pub bank_balance: f64,
    pub monthly_revenue: f64,
    pub monthly_costs: f64,
}

/// User-adjustable scenario parameters. Any field may be negative; a negative
/// `monthly_spend` models a recurring saving, a negative `price_increase` a
/// price cut. Absent fields deserialize to 0 so malformed input degrades
/// silently instead of erroring.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FinancialInputs {
    #[serde(default)]
    pub monthly_spend: f64,
    #[serde(default)]
    pub one_time_spend: f64,
    /// Percentage applied multiplicatively to baseline revenue (10 = +10%).
    #[serde(default)]
    pub price_increase: f64,
}

/// A planned hire: a recurring monthly cost from `start_month` onward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadcountRole {
    pub id: String,
    #[serde(default)]
    pub role: String,
    pub salary: f64,
    pub start_month: i32,
}

impl HeadcountRole {
    /// Default values used when a role is created from the UI.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: String::new(),
            salary: 100_000.0,
            start_month: 0,
        }
    }
}

/// Owned list of planned hires. Ids are unique; no other ordering invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadcountPlan {
    pub roles: Vec<HeadcountRole>,
}

impl HeadcountPlan {
    pub fn add(&mut self, id: impl Into<String>) -> &mut HeadcountRole {
        self.roles.push(HeadcountRole::new(id));
        self.roles.last_mut().unwrap()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut HeadcountRole> {
        self.roles.iter_mut().find(|r| r.id == id)
    }

    /// Removes the role with the given id, returning whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| r.id != id);
        self.roles.len() != before
    }
}

/// Output of a projection run.
///
/// `runway` is months until cash-out at the display burn rate, infinite when
/// burn is non-positive. `forecast_data` holds exactly 25 monthly balances
/// (month 0 through 24), each floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub runway: f64,
    pub burn: f64,
    pub forecast_data: Vec<f64>,
}

/// A named snapshot of scenario state, held only in memory for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub baseline: FinancialBaseline,
    pub inputs: FinancialInputs,
    #[serde(default)]
    pub headcount: Vec<HeadcountRole>,
    pub result: ForecastResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: String,
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    pub month: String,
}

impl BudgetItem {
    /// Variance of actual versus budgeted, in percent. Returns 0 when nothing
    /// was budgeted; classification against thresholds must guard that case.
    pub fn variance(&self) -> f64 {
        if self.budgeted == 0.0 {
            return 0.0;
        }
        (self.actual - self.budgeted) / self.budgeted * 100.0
    }

    /// Share of the budget consumed so far, in percent.
    pub fn progress(&self) -> f64 {
        if self.budgeted == 0.0 {
            return 0.0;
        }
        self.actual / self.budgeted * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowItem {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub direction: FlowDirection,
    pub date: String,
    #[serde(default)]
    pub recurring: bool,
}

impl CashFlowItem {
    /// Signed amount: inflows positive, outflows stored as negative magnitude.
    pub fn adjusted_amount(&self) -> f64 {
        match self.direction {
            FlowDirection::Inflow => self.amount.abs(),
            FlowDirection::Outflow => -self.amount.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Excellent,
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub unit: String,
    pub trend: TrendDirection,
    pub change: f64,
}

impl Kpi {
    pub fn progress_percentage(&self) -> f64 {
        if self.target == 0.0 {
            return 0.0;
        }
        self.value / self.target * 100.0
    }

    pub fn performance_status(&self) -> PerformanceStatus {
        let progress = self.progress_percentage();
        if progress >= 90.0 {
            PerformanceStatus::Excellent
        } else if progress >= 70.0 {
            PerformanceStatus::Good
        } else {
            PerformanceStatus::NeedsImprovement
        }
    }
}

// Settings models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub base_currency: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub baseline: Option<FinancialBaseline>,
    #[serde(default)]
    pub inputs: Option<FinancialInputs>,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}
