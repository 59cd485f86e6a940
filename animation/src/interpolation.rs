//! Easing curves.
//!
//! The formulas follow the classic easing set popularized by AHEasing. [`Interpolation`] parses
//! the names 2D scene engines use for these curves (`"Linear"`, `"Sine"`, `"Quad.easeIn"`,
//! `"Power2"`, ...), so tween definitions can be carried over from scene configuration files.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    str::FromStr,
};

use serde::Deserialize;

use crate::InvalidConfiguration;

#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Interpolation {
    #[default]
    Linear,

    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,

    CubicIn,
    CubicOut,
    CubicInOut,

    QuarticIn,
    QuarticOut,
    QuarticInOut,

    QuinticIn,
    QuinticOut,
    QuinticInOut,

    SineIn,
    SineOut,
    SineInOut,

    CircularIn,
    CircularOut,
    CircularInOut,

    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,

    ElasticIn,
    ElasticOut,
    ElasticInOut,

    BackIn,
    BackOut,
    BackInOut,

    BounceIn,
    BounceOut,
    BounceInOut,
}

impl FromStr for Interpolation {
    type Err = InvalidConfiguration;

    /// Parses an engine easing name. A family name without a suffix means its `easeOut` variant,
    /// `PowerN` names alias the polynomial families.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        use Interpolation::*;

        let (family, variant) = match name.split_once('.') {
            Some((family, variant)) => (family, Some(variant)),
            None => (name, None),
        };

        // (in, out, in_out)
        let family = match family {
            "Linear" | "Power0" => return variant.map_or(Ok(Linear), |_| Err(unknown(name))),
            "Quad" | "Power1" => (QuadraticIn, QuadraticOut, QuadraticInOut),
            "Cubic" | "Power2" => (CubicIn, CubicOut, CubicInOut),
            "Quart" | "Power3" => (QuarticIn, QuarticOut, QuarticInOut),
            "Quint" | "Power4" => (QuinticIn, QuinticOut, QuinticInOut),
            "Sine" => (SineIn, SineOut, SineInOut),
            "Circ" => (CircularIn, CircularOut, CircularInOut),
            "Expo" => (ExponentialIn, ExponentialOut, ExponentialInOut),
            "Elastic" => (ElasticIn, ElasticOut, ElasticInOut),
            "Back" => (BackIn, BackOut, BackInOut),
            "Bounce" => (BounceIn, BounceOut, BounceInOut),
            _ => return Err(unknown(name)),
        };

        match variant {
            Some("easeIn" | "In") => Ok(family.0),
            None | Some("easeOut" | "Out") => Ok(family.1),
            Some("easeInOut" | "InOut") => Ok(family.2),
            Some(_) => Err(unknown(name)),
        }
    }
}

impl TryFrom<String> for Interpolation {
    type Error = InvalidConfiguration;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn unknown(name: &str) -> InvalidConfiguration {
    InvalidConfiguration::UnknownEasing {
        name: name.to_string(),
    }
}

pub trait Ease {
    /// Calculate the eased value, normalized.
    fn interpolate(self, f: Interpolation) -> Self;
}

fn clamp(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

impl Ease for f64 {
    fn interpolate(self, f: Interpolation) -> Self {
        use Interpolation::*;

        let p = clamp(self);
        match f {
            Linear => p,

            QuadraticIn => p * p,
            QuadraticOut => -(p * (p - 2.0)),
            QuadraticInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    (-2.0 * p * p) + (4.0 * p) - 1.0
                }
            }

            CubicIn => p * p * p,
            CubicOut => {
                let f = p - 1.0;
                f * f * f + 1.0
            }
            CubicInOut => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    let f = (2.0 * p) - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }

            QuarticIn => p * p * p * p,
            QuarticOut => {
                let f = p - 1.0;
                f * f * f * (1.0 - p) + 1.0
            }
            QuarticInOut => {
                if p < 0.5 {
                    8.0 * p * p * p * p
                } else {
                    let f = p - 1.0;
                    -8.0 * f * f * f * f + 1.0
                }
            }

            QuinticIn => p * p * p * p * p,
            QuinticOut => {
                let f = p - 1.0;
                f * f * f * f * f + 1.0
            }
            QuinticInOut => {
                if p < 0.5 {
                    16.0 * p * p * p * p * p
                } else {
                    let f = (2.0 * p) - 2.0;
                    0.5 * f * f * f * f * f + 1.0
                }
            }

            SineIn => 1.0 - (p * FRAC_PI_2).cos(),
            SineOut => (p * FRAC_PI_2).sin(),
            SineInOut => 0.5 * (1.0 - (p * PI).cos()),

            CircularIn => 1.0 - (1.0 - (p * p)).sqrt(),
            CircularOut => ((2.0 - p) * p).sqrt(),
            CircularInOut => {
                if p < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * (p * p)).sqrt())
                } else {
                    0.5 * ((-((2.0 * p) - 3.0) * ((2.0 * p) - 1.0)).sqrt() + 1.0)
                }
            }

            ExponentialIn => {
                if p == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (p - 1.0))
                }
            }
            ExponentialOut => {
                if p == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * p)
                }
            }
            ExponentialInOut => {
                if p == 0.0 || p == 1.0 {
                    p
                } else if p < 0.5 {
                    0.5 * 2f64.powf((20.0 * p) - 10.0)
                } else {
                    -0.5 * 2f64.powf((-20.0 * p) + 10.0) + 1.0
                }
            }

            ElasticIn => (13.0 * FRAC_PI_2 * p).sin() * 2f64.powf(10.0 * (p - 1.0)),
            ElasticOut => (-13.0 * FRAC_PI_2 * (p + 1.0)).sin() * 2f64.powf(-10.0 * p) + 1.0,
            ElasticInOut => {
                if p < 0.5 {
                    0.5 * (13.0 * FRAC_PI_2 * (2.0 * p)).sin() * 2f64.powf(10.0 * ((2.0 * p) - 1.0))
                } else {
                    0.5 * ((-13.0 * FRAC_PI_2 * ((2.0 * p - 1.0) + 1.0)).sin()
                        * 2f64.powf(-10.0 * (2.0 * p - 1.0))
                        + 2.0)
                }
            }

            BackIn => p * p * p - p * (p * PI).sin(),
            BackOut => {
                let f = 1.0 - p;
                1.0 - (f * f * f - f * (f * PI).sin())
            }
            BackInOut => {
                if p < 0.5 {
                    let f = 2.0 * p;
                    0.5 * (f * f * f - f * (f * PI).sin())
                } else {
                    let f = 1.0 - (2.0 * p - 1.0);
                    0.5 * (1.0 - (f * f * f - f * (f * PI).sin())) + 0.5
                }
            }

            BounceIn => 1.0 - bounce_out(1.0 - p),
            BounceOut => bounce_out(p),
            BounceInOut => {
                if p < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - p * 2.0))
                } else {
                    0.5 * bounce_out(p * 2.0 - 1.0) + 0.5
                }
            }
        }
    }
}

fn bounce_out(p: f64) -> f64 {
    if p < 4.0 / 11.0 {
        (121.0 * p * p) / 16.0
    } else if p < 8.0 / 11.0 {
        (363.0 / 40.0 * p * p) - (99.0 / 10.0 * p) + 17.0 / 5.0
    } else if p < 9.0 / 10.0 {
        (4356.0 / 361.0 * p * p) - (35442.0 / 1805.0 * p) + 16061.0 / 1805.0
    } else {
        (54.0 / 5.0 * p * p) - (513.0 / 25.0 * p) + 268.0 / 25.0
    }
}
