use std::time::Duration;

use rand::{Rng, rngs::StdRng};
use serde::Deserialize;
use vignettes_animation::InvalidConfiguration;

/// A random interval in milliseconds, both ends inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct Interval {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Interval {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn validate(&self, name: &str) -> Result<(), InvalidConfiguration> {
        if self.min_ms == 0 || self.min_ms > self.max_ms {
            return Err(InvalidConfiguration::scene(format!(
                "{name} interval {}..={} ms is empty or starts at zero",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// Fires repeatedly, waiting a new random interval after every expiry.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Interval,
    remaining: Duration,
}

impl RepeatingTimer {
    /// The timer is armed with a first random wait.
    pub fn new(interval: Interval, rng: &mut StdRng) -> Self {
        Self {
            interval,
            remaining: interval.sample(rng),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Advances the timer and returns how often it expired.
    ///
    /// The time left over after an expiry counts towards the next interval, so long frames don't
    /// drop expiries.
    pub fn advance(&mut self, delta: Duration, rng: &mut StdRng) -> usize {
        let mut delta = delta;
        let mut fired = 0;
        while delta >= self.remaining {
            delta -= self.remaining;
            self.remaining = self.interval.sample(rng);
            fired += 1;
        }
        self.remaining -= delta;
        fired
    }
}
