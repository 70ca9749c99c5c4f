//! Timer-driven dashboard simulations (metric jitter, rotating insight text)
//! reworked as explicit scheduled tasks. The clock and the randomness are
//! both injected, so tests freeze time and seed the noise instead of racing
//! wall-clock timers.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seconds between alert-value jitter ticks.
pub const ALERT_JITTER_SECS: i64 = 5;
/// Seconds between insight rotations.
pub const INSIGHT_ROTATION_SECS: i64 = 15;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests.
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

struct ScheduledTask {
    name: String,
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

/// Fixed-interval task registry. Tasks fire when their interval has elapsed
/// since the last firing; the first tick after registration always fires.
/// Each tick is last-write-wins on whatever state the callback mutates; there
/// is no catch-up for missed intervals.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, interval: Duration) {
        self.tasks.push(ScheduledTask {
            name: name.into(),
            interval,
            last_run: None,
        });
    }

    /// Names of tasks due at `now`, marking them as run. Ordering follows
    /// registration order.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut fired = Vec::new();
        for task in &mut self.tasks {
            let due = match task.last_run {
                Some(last) => now - last >= task.interval,
                None => true,
            };
            if due {
                task.last_run = Some(now);
                fired.push(task.name.clone());
            }
        }
        fired
    }

    /// Drops every task. Call on teardown so nothing fires against state that
    /// no longer exists.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Bounded relative noise around a metric value, driven by a seeded RNG so a
/// given seed replays the same sequence.
pub struct MetricJitter {
    rng: ChaCha8Rng,
    amplitude: f64,
}

impl MetricJitter {
    /// `amplitude` is the maximum relative deviation per tick (0.05 = ±5%).
    pub fn new(seed: u64, amplitude: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            amplitude,
        }
    }

    pub fn perturb(&mut self, value: f64) -> f64 {
        let factor = 1.0 + self.rng.gen_range(-self.amplitude..=self.amplitude);
        value * factor
    }
}

/// Rotates through a fixed list of insight strings, wrapping around.
pub struct InsightRotator {
    insights: Vec<String>,
    index: usize,
}

impl InsightRotator {
    pub fn new(insights: Vec<String>) -> Self {
        Self { insights, index: 0 }
    }

    pub fn with_default_insights() -> Self {
        Self::new(DEFAULT_INSIGHTS.iter().map(|s| s.to_string()).collect())
    }

    pub fn current(&self) -> &str {
        &self.insights[self.index]
    }

    pub fn advance(&mut self) -> &str {
        self.index = (self.index + 1) % self.insights.len();
        self.current()
    }
}

/// Canned placeholder insights shown on the dashboard; rotated, not computed.
pub const DEFAULT_INSIGHTS: &[&str] = &[
    "Your burn rate increased 8% month-over-month; review discretionary spend.",
    "Hiring two roles next quarter shortens runway by roughly 3 months.",
    "A 5% price increase would extend runway past 18 months.",
    "Marketing spend is tracking 12% under budget this month.",
    "Recurring revenue covers 64% of fixed monthly costs.",
];

pub struct TickOutcome {
    pub jittered_metrics: bool,
    pub rotated_insight: bool,
}

/// The two cosmetic dashboard simulations wired to their stock intervals:
/// alert metric jitter every 5 seconds, insight rotation every 15.
pub struct DashboardSimulation {
    scheduler: Scheduler,
    jitter: MetricJitter,
    insights: InsightRotator,
}

impl DashboardSimulation {
    pub fn new(seed: u64) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.register("alert_jitter", Duration::seconds(ALERT_JITTER_SECS));
        scheduler.register("insight_rotation", Duration::seconds(INSIGHT_ROTATION_SECS));
        Self {
            scheduler,
            jitter: MetricJitter::new(seed, 0.05),
            insights: InsightRotator::with_default_insights(),
        }
    }

    /// Runs whatever is due at `now` against the caller-held metric values.
    pub fn tick(&mut self, now: DateTime<Utc>, metrics: &mut HashMap<String, f64>) -> TickOutcome {
        let fired = self.scheduler.tick(now);
        let jittered = fired.iter().any(|n| n == "alert_jitter");
        let rotated = fired.iter().any(|n| n == "insight_rotation");
        if jittered {
            for value in metrics.values_mut() {
                *value = self.jitter.perturb(*value);
            }
        }
        if rotated {
            self.insights.advance();
        }
        TickOutcome {
            jittered_metrics: jittered,
            rotated_insight: rotated,
        }
    }

    pub fn current_insight(&self) -> &str {
        self.insights.current()
    }

    /// Stops all simulated timers.
    pub fn teardown(&mut self) {
        self.scheduler.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::new(t0());
        assert_eq!(clock.now(), t0());
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), t0() + Duration::seconds(30));
    }

    #[test]
    fn scheduler_fires_on_interval_boundaries() {
        let mut scheduler = Scheduler::new();
        scheduler.register("fast", Duration::seconds(5));
        scheduler.register("slow", Duration::seconds(15));

        // First tick always fires everything.
        assert_eq!(scheduler.tick(t0()), vec!["fast", "slow"]);

        assert!(scheduler.tick(t0() + Duration::seconds(4)).is_empty());
        assert_eq!(scheduler.tick(t0() + Duration::seconds(5)), vec!["fast"]);
        assert_eq!(
            scheduler.tick(t0() + Duration::seconds(15)),
            vec!["fast", "slow"]
        );
    }

    #[test]
    fn cleared_scheduler_never_fires() {
        let mut scheduler = Scheduler::new();
        scheduler.register("fast", Duration::seconds(5));
        scheduler.clear();
        assert!(scheduler.is_empty());
        assert!(scheduler.tick(t0()).is_empty());
    }

    #[test]
    fn jitter_is_reproducible_for_a_seed() {
        let mut a = MetricJitter::new(42, 0.05);
        let mut b = MetricJitter::new(42, 0.05);
        for _ in 0..10 {
            assert_eq!(a.perturb(1_000.0), b.perturb(1_000.0));
        }

        let mut c = MetricJitter::new(7, 0.05);
        let series_a: Vec<f64> = (0..10).map(|_| a.perturb(1_000.0)).collect();
        let series_c: Vec<f64> = (0..10).map(|_| c.perturb(1_000.0)).collect();
        assert_ne!(series_a, series_c);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let mut jitter = MetricJitter::new(1, 0.05);
        for _ in 0..100 {
            let v = jitter.perturb(1_000.0);
            assert!(v >= 950.0 && v <= 1_050.0);
        }
    }

    #[test]
    fn insight_rotation_wraps() {
        let mut rotator = InsightRotator::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(rotator.current(), "a");
        assert_eq!(rotator.advance(), "b");
        assert_eq!(rotator.advance(), "a");
    }

    #[test]
    fn dashboard_simulation_respects_both_cadences() {
        let clock = ManualClock::new(t0());
        let mut sim = DashboardSimulation::new(42);
        let mut metrics = HashMap::from([("cash_balance".to_string(), 500_000.0)]);

        sim.tick(clock.now(), &mut metrics);
        let after_first = sim.current_insight().to_string();

        // 5 seconds later only the jitter task is due.
        clock.advance(Duration::seconds(5));
        let outcome = sim.tick(clock.now(), &mut metrics);
        assert!(outcome.jittered_metrics);
        assert!(!outcome.rotated_insight);
        assert_eq!(sim.current_insight(), after_first);

        // At 15 seconds both fire and the insight moves on.
        clock.advance(Duration::seconds(10));
        let outcome = sim.tick(clock.now(), &mut metrics);
        assert!(outcome.jittered_metrics);
        assert!(outcome.rotated_insight);
        assert_ne!(sim.current_insight(), after_first);
    }

    #[test]
    fn torn_down_simulation_stops_mutating() {
        let mut sim = DashboardSimulation::new(42);
        let mut metrics = HashMap::from([("cash_balance".to_string(), 500_000.0)]);
        sim.tick(t0(), &mut metrics);

        sim.teardown();
        let before = metrics.clone();
        let outcome = sim.tick(t0() + Duration::seconds(60), &mut metrics);
        assert!(!outcome.jittered_metrics);
        assert!(!outcome.rotated_insight);
        assert_eq!(metrics, before);
    }
}
