//! Synthetic resource metrics for the operator console
//!
//! Holds a small fixed set of named gauges:
//! - CPU usage, memory, network throughput, latency
//! - Bounded recent history per gauge (oldest evicted first)
//! - Randomized-walk update rule driven by an injectable RNG

use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;

use crate::error::{ConsoleError, Result};

pub const CPU_USAGE: &str = "CPU Usage";
pub const MEMORY: &str = "Memory";
pub const NETWORK: &str = "Network";
pub const LATENCY: &str = "Latency";

/// Default number of recent values kept per metric
pub const DEFAULT_HISTORY_CAPACITY: usize = 6;
/// Default bound of the per-tick random delta
pub const DEFAULT_MAX_DELTA: f64 = 3.0;
/// Upper bound of the per-tick delta; keeps the sampled range finite
pub const MAX_DELTA_LIMIT: f64 = 1.0e6;

fn sanitize_delta(d: f64) -> f64 {
    if d.is_finite() { d.abs().min(MAX_DELTA_LIMIT) } else { 0.0 }
}

/// A named numeric gauge with bounded recent history
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    name: String,
    value: f64,
    unit: String,
    history: VecDeque<f64>,
    capacity: usize,
}

impl Metric {
    /// Build a metric; negative values are clamped and history is cut to
    /// the most recent `capacity` entries.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        value: f64,
        history: impl IntoIterator<Item = f64>,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        let mut history: VecDeque<f64> = history.into_iter().map(|v| v.max(0.0)).collect();
        while history.len() > capacity {
            history.pop_front();
        }

        Self {
            name: name.into(),
            value: value.max(0.0),
            unit: unit.into(),
            history,
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recent values, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Largest value in history, used by sparkline renderers
    pub fn history_peak(&self) -> f64 {
        self.history.iter().copied().fold(0.0, f64::max)
    }

    fn record(&mut self, raw: f64) {
        let value = round_one_decimal(raw.max(0.0));
        self.value = value;
        self.history.push_back(value);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Fixed set of metrics, in display order
#[derive(Debug, Clone, Serialize)]
pub struct MetricStore {
    metrics: Vec<Metric>,
    max_delta: f64,
}

impl MetricStore {
    pub fn new(metrics: Vec<Metric>, max_delta: f64) -> Result<Self> {
        for (idx, metric) in metrics.iter().enumerate() {
            if metrics[..idx].iter().any(|m| m.name == metric.name) {
                return Err(ConsoleError::DuplicateMetric(metric.name.clone()));
            }
        }

        Ok(Self { metrics, max_delta: sanitize_delta(max_delta) })
    }

    /// Reference seed: CPU, memory, network and latency gauges
    pub fn seeded(capacity: usize, max_delta: f64) -> Self {
        let metrics = vec![
            Metric::new(CPU_USAGE, "%", 12.0, [8.0, 15.0, 10.0, 13.0, 9.0, 12.0], capacity),
            Metric::new(MEMORY, "GB", 3.2, [2.8, 3.5, 3.1, 2.9, 3.0, 3.2], capacity),
            Metric::new(NETWORK, "Mbps", 42.0, [38.0, 45.0, 40.0, 42.0, 39.0, 42.0], capacity),
            Metric::new(LATENCY, "ms", 28.0, [32.0, 25.0, 30.0, 27.0, 29.0, 28.0], capacity),
        ];

        Self { metrics, max_delta: sanitize_delta(max_delta) }
    }

    /// One random-walk step for every metric
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let max_delta = self.max_delta;
        for metric in &mut self.metrics {
            let delta = if max_delta > 0.0 {
                rng.gen_range(-max_delta..=max_delta)
            } else {
                0.0
            };
            metric.record(metric.value + delta);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_values_stay_non_negative_and_history_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut store = MetricStore::seeded(DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_DELTA);

        for _ in 0..2_000 {
            store.tick(&mut rng);
            for metric in store.iter() {
                assert!(metric.value() >= 0.0, "{} went negative", metric.name());
                assert!(metric.history().len() <= DEFAULT_HISTORY_CAPACITY);
            }
        }
    }

    #[test]
    fn test_history_is_fifo() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut store = MetricStore::seeded(6, DEFAULT_MAX_DELTA);
        let original: Vec<f64> = store.get(CPU_USAGE).unwrap().history().collect();

        let mut produced = Vec::new();
        for _ in 0..2 {
            store.tick(&mut rng);
            produced.push(store.get(CPU_USAGE).unwrap().value());
        }

        let history: Vec<f64> = store.get(CPU_USAGE).unwrap().history().collect();
        assert_eq!(history.len(), 6);
        assert_eq!(&history[..4], &original[2..]);
        assert_eq!(&history[4..], &produced[..]);
    }

    #[test]
    fn test_newest_history_entry_is_current_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut store = MetricStore::seeded(6, DEFAULT_MAX_DELTA);
        store.tick(&mut rng);
        for metric in store.iter() {
            assert_eq!(metric.history().last(), Some(metric.value()));
        }
    }

    #[test]
    fn test_clamps_at_zero_and_rounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let metric = Metric::new("Idle", "%", 0.2, [0.2], 6);
        let mut store = MetricStore::new(vec![metric], 50.0).unwrap();

        for _ in 0..200 {
            store.tick(&mut rng);
            let value = store.get("Idle").unwrap().value();
            assert!(value >= 0.0);
            assert_eq!(value, round_one_decimal(value));
        }
    }

    #[test]
    fn test_out_of_range_delta_never_panics() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.0e308, -1.0e308] {
            let mut store = MetricStore::seeded(6, delta);
            for _ in 0..20 {
                store.tick(&mut rng);
            }
            for metric in store.iter() {
                assert!(metric.value().is_finite() && metric.value() >= 0.0);
            }
        }

        let mut store = MetricStore::seeded(6, f64::NAN);
        store.tick(&mut rng);
        assert_eq!(store.get(NETWORK).unwrap().value(), 42.0);
    }

    #[test]
    fn test_zero_delta_keeps_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut store = MetricStore::seeded(6, 0.0);
        store.tick(&mut rng);
        assert_eq!(store.get(NETWORK).unwrap().value(), 42.0);
    }

    #[test]
    fn test_constructor_trims_history() {
        let metric = Metric::new("Disk", "GB", 1.0, [1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(metric.history().collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(metric.history_peak(), 4.0);
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let a = Metric::new(CPU_USAGE, "%", 1.0, [], 6);
        let b = Metric::new(CPU_USAGE, "%", 2.0, [], 6);
        assert!(matches!(
            MetricStore::new(vec![a, b], 3.0),
            Err(ConsoleError::DuplicateMetric(name)) if name == CPU_USAGE
        ));
    }

    #[test]
    fn test_unknown_metric_is_absent() {
        let store = MetricStore::seeded(6, 3.0);
        assert!(store.get("Temperature").is_none());
        assert_eq!(store.len(), 4);
    }
}
