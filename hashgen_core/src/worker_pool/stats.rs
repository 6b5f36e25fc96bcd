//! Throughput statistics owned by the coordinator

use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Periodic throughput report delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsUpdate {
    /// Completed hashes per second over the last sampling interval
    pub hashes_per_second: u64,
    /// Number of distinct algorithms requested since the engine started
    pub unique_algorithms: usize,
}

/// Callback invoked with each [`StatsUpdate`]
pub type StatsCallback = Box<dyn Fn(StatsUpdate) + Send + 'static>;

#[derive(Debug)]
pub(crate) struct Statistics {
    hashes_since_sample: u64,
    last_sample: Instant,
    last_rate: u64,
    algorithms: HashSet<String>,
}

impl Statistics {
    pub fn new(now: Instant) -> Self {
        Self {
            hashes_since_sample: 0,
            last_sample: now,
            last_rate: 0,
            algorithms: HashSet::new(),
        }
    }

    pub fn record_algorithm(&mut self, algorithm: &str) {
        if !self.algorithms.contains(algorithm) {
            self.algorithms.insert(algorithm.to_string());
        }
    }

    pub fn record_hashes(&mut self, count: usize) {
        self.hashes_since_sample += count as u64;
    }

    pub fn unique_algorithms(&self) -> usize {
        self.algorithms.len()
    }

    /// Close the current sampling window
    ///
    /// Returns an update while hashes are completing, plus one trailing
    /// zero-rate update once activity stops. An idle engine yields nothing.
    pub fn sample(&mut self, now: Instant) -> Option<StatsUpdate> {
        let elapsed = now.saturating_duration_since(self.last_sample);
        self.last_sample = now;
        let count = std::mem::take(&mut self.hashes_since_sample);

        let rate = if elapsed > Duration::ZERO {
            (count as f64 / elapsed.as_secs_f64()).round() as u64
        } else {
            count
        };

        let emit = rate > 0 || self.last_rate > 0;
        self.last_rate = rate;
        emit.then_some(StatsUpdate {
            hashes_per_second: rate,
            unique_algorithms: self.unique_algorithms(),
        })
    }
}
