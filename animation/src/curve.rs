use std::time::Duration;

use serde::Deserialize;

use crate::{Ease, Interpolation, InvalidConfiguration, Property};

/// How often a curve's cycle runs again after the first one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Repeat {
    /// Repeat the given number of times, `Count(0)` runs exactly one cycle.
    Count(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl From<i32> for Repeat {
    /// Negative counts loop forever.
    fn from(count: i32) -> Self {
        u32::try_from(count).map_or(Repeat::Infinite, Repeat::Count)
    }
}

impl<'de> Deserialize<'de> for Repeat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(Repeat::from)
    }
}

/// Animates one property from its value at activation to `to`.
///
/// One cycle is a forward pass of `duration`, followed by a backward pass of the same duration if
/// `yoyo` is set.
///
/// In configuration files the duration is given as `duration_ms` (default 1000) and the
/// interpolation as `ease`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyCurve {
    pub property: Property,
    pub to: f64,
    #[serde(
        rename = "duration_ms",
        default = "default_duration",
        deserialize_with = "millis"
    )]
    pub duration: Duration,
    #[serde(rename = "ease", default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub yoyo: bool,
    #[serde(default)]
    pub repeat: Repeat,
}

fn default_duration() -> Duration {
    Duration::from_secs(1)
}

fn millis<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

impl PropertyCurve {
    pub fn new(property: Property, to: f64, duration: Duration) -> Self {
        Self {
            property,
            to,
            duration,
            interpolation: Interpolation::default(),
            yoyo: false,
            repeat: Repeat::default(),
        }
    }

    pub fn with(self, interpolation: Interpolation) -> Self {
        Self {
            interpolation,
            ..self
        }
    }

    pub fn yoyo(self) -> Self {
        Self { yoyo: true, ..self }
    }

    pub fn repeat(self, repeat: impl Into<Repeat>) -> Self {
        Self {
            repeat: repeat.into(),
            ..self
        }
    }

    pub fn cycle_duration(&self) -> Duration {
        if self.yoyo {
            self.duration * 2
        } else {
            self.duration
        }
    }

    /// Number of cycles, `None` if the curve loops forever.
    pub fn cycles(&self) -> Option<u64> {
        match self.repeat {
            Repeat::Count(n) => Some(n as u64 + 1),
            Repeat::Infinite => None,
        }
    }

    /// Time from activation to completion, `None` if the curve never completes.
    pub fn total_duration(&self) -> Option<Duration> {
        let cycles = u32::try_from(self.cycles()?).ok()?;
        self.cycle_duration().checked_mul(cycles)
    }

    pub(crate) fn validate(&self, segment: usize) -> Result<(), InvalidConfiguration> {
        if !self.to.is_finite() {
            return Err(InvalidConfiguration::NonFiniteValue {
                segment,
                property: self.property,
                value: self.to,
            });
        }
        if self.duration.is_zero() && self.repeat == Repeat::Infinite {
            return Err(InvalidConfiguration::ZeroDurationLoop {
                segment,
                property: self.property,
            });
        }
        Ok(())
    }

    /// Samples the curve `local` after its activation, starting from `from`.
    pub fn sample(&self, from: f64, local: Duration) -> CurveSample {
        let cycle = self.cycle_duration().as_nanos();
        let end_value = if self.yoyo { from } else { self.to };
        let finished = |completed_cycles| CurveSample {
            value: end_value,
            completed_cycles,
            finished: true,
        };

        if cycle == 0 {
            // Only finite loops pass validation.
            return finished(self.cycles().unwrap_or(1));
        }

        let local = local.as_nanos();
        let completed_cycles = u64::try_from(local / cycle).unwrap_or(u64::MAX);
        if let Some(cycles) = self.cycles() {
            if completed_cycles >= cycles {
                return finished(cycles);
            }
        }

        let within = (local % cycle) as f64;
        let forward = self.duration.as_nanos() as f64;
        let t = if within < forward {
            within / forward
        } else {
            1.0 - (within - forward) / forward
        };

        let t = Ease::interpolate(t, self.interpolation);
        CurveSample {
            value: (self.to - from) * t + from,
            completed_cycles,
            finished: false,
        }
    }

    /// The number of cycle boundaries among `completed_cycles` that start another cycle.
    pub(crate) fn repeat_boundaries(&self, completed_cycles: u64) -> u64 {
        match self.cycles() {
            Some(cycles) => completed_cycles.min(cycles.saturating_sub(1)),
            None => completed_cycles,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurveSample {
    pub value: f64,
    /// Full cycles run through so far.
    pub completed_cycles: u64,
    pub finished: bool,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn forward_pass_reaches_target_and_finishes() {
        let curve = PropertyCurve::new(Property::X, 100.0, ms(1000));
        assert_abs_diff_eq!(curve.sample(0.0, ms(250)).value, 25.0, epsilon = 1e-9);
        assert!(!curve.sample(0.0, ms(999)).finished);

        let end = curve.sample(0.0, ms(1000));
        assert!(end.finished);
        assert_eq!(end.value, 100.0);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let curve = PropertyCurve::new(Property::X, 700.0, ms(1000)).yoyo();
        assert_eq!(curve.total_duration(), Some(ms(2000)));
        assert_abs_diff_eq!(curve.sample(500.0, ms(1000)).value, 700.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curve.sample(500.0, ms(1500)).value, 600.0, epsilon = 1e-9);

        let end = curve.sample(500.0, ms(2000));
        assert!(end.finished);
        assert_eq!(end.value, 500.0);
    }

    #[test]
    fn repeats_count_cycles() {
        // A bouncing horse: 300ms up and down, five times.
        let curve = PropertyCurve::new(Property::Y, 140.0, ms(300))
            .with(Interpolation::SineOut)
            .yoyo()
            .repeat(4);
        assert_eq!(curve.total_duration(), Some(ms(3000)));

        let sample = curve.sample(240.0, ms(1300));
        assert_eq!(sample.completed_cycles, 2);
        assert!(!sample.finished);
        assert_eq!(curve.repeat_boundaries(sample.completed_cycles), 2);

        let end = curve.sample(240.0, ms(3000));
        assert!(end.finished);
        assert_eq!(end.completed_cycles, 5);
        assert_eq!(curve.repeat_boundaries(end.completed_cycles), 4);
    }

    #[test]
    fn infinite_curves_never_finish() {
        let curve = PropertyCurve::new(Property::Rotation, 1.0, ms(1000))
            .yoyo()
            .repeat(-1);
        assert_eq!(curve.total_duration(), None);
        let sample = curve.sample(0.0, Duration::from_secs(3600));
        assert!(!sample.finished);
        assert_eq!(sample.completed_cycles, 1800);
    }

    #[test]
    fn zero_duration_jumps_to_the_end() {
        let curve = PropertyCurve::new(Property::Alpha, 0.0, Duration::ZERO);
        let sample = curve.sample(1.0, Duration::ZERO);
        assert!(sample.finished);
        assert_eq!(sample.value, 0.0);
    }

    #[test]
    fn validation_rejects_degenerate_curves() {
        let endless = PropertyCurve::new(Property::X, 1.0, Duration::ZERO).repeat(Repeat::Infinite);
        assert_eq!(
            endless.validate(3),
            Err(InvalidConfiguration::ZeroDurationLoop {
                segment: 3,
                property: Property::X
            })
        );

        let nan = PropertyCurve::new(Property::X, f64::NAN, ms(10));
        assert!(nan.validate(0).is_err());
    }

    #[test]
    fn deserializes_scene_engine_tween_definitions() {
        let curve: PropertyCurve = toml::from_str(
            r#"
            property = "y"
            to = 140.0
            duration_ms = 300
            ease = "Sine"
            yoyo = true
            repeat = 4
            "#,
        )
        .unwrap();
        assert_eq!(
            curve,
            PropertyCurve::new(Property::Y, 140.0, ms(300))
                .with(Interpolation::SineOut)
                .yoyo()
                .repeat(4)
        );

        let defaults: PropertyCurve = toml::from_str("property = \"alpha\"\nto = 0.0").unwrap();
        assert_eq!(defaults, PropertyCurve::new(Property::Alpha, 0.0, ms(1000)));

        let looping: PropertyCurve =
            toml::from_str("property = \"rotation\"\nto = 1.0\nrepeat = -1").unwrap();
        assert_eq!(looping.repeat, Repeat::Infinite);

        let unknown = toml::from_str::<PropertyCurve>("property = \"x\"\nto = 1.0\nease = \"Wobbly\"");
        assert!(unknown.is_err());
    }
}
