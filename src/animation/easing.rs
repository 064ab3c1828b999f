//! Easing curves for transition steps
//!
//! Names follow the usual timeline vocabulary: `"power2.out"`,
//! `"expo.inOut"`, `"back.out"`, `"none"`. A `powerN` curve is a polynomial
//! of degree `N + 1`.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::EngineError;

const BACK_OVERSHOOT: f64 = 1.70158;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    BackOut,
}

/// `"power1.out"`
impl Default for Easing {
    fn default() -> Self {
        Easing::PowerOut(1)
    }
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    /// Endpoints are exact: `apply(0) == 0` and `apply(1) == 1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::PowerIn(n) => t.powi(degree(n)),
            Easing::PowerOut(n) => 1.0 - (1.0 - t).powi(degree(n)),
            Easing::PowerInOut(n) => {
                let d = degree(n);
                if t < 0.5 {
                    (2.0 * t).powi(d) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(d) / 2.0
                }
            }
            Easing::ExpoIn => 2f64.powf(10.0 * (t - 1.0)),
            Easing::ExpoOut => 1.0 - 2f64.powf(-10.0 * t),
            Easing::ExpoInOut => {
                if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::BackOut => {
                let u = t - 1.0;
                1.0 + (BACK_OVERSHOOT + 1.0) * u.powi(3) + BACK_OVERSHOOT * u.powi(2)
            }
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("linear") {
            return Some(Easing::Linear);
        }

        let (family, mode) = name.split_once('.').unwrap_or((name, "out"));
        let mode = mode.to_ascii_lowercase();
        let family = family.to_ascii_lowercase();

        match family.as_str() {
            "expo" => match mode.as_str() {
                "in" => Some(Easing::ExpoIn),
                "out" => Some(Easing::ExpoOut),
                "inout" => Some(Easing::ExpoInOut),
                _ => None,
            },
            "back" if mode == "out" => Some(Easing::BackOut),
            _ => {
                let power: u8 = family.strip_prefix("power")?.parse().ok()?;
                if !(1..=4).contains(&power) {
                    return None;
                }
                match mode.as_str() {
                    "in" => Some(Easing::PowerIn(power)),
                    "out" => Some(Easing::PowerOut(power)),
                    "inout" => Some(Easing::PowerInOut(power)),
                    _ => None,
                }
            }
        }
    }
}

fn degree(power: u8) -> i32 {
    i32::from(power.clamp(1, 4)) + 1
}

impl FromStr for Easing {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| EngineError::invalid("easing", s))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "none"),
            Easing::PowerIn(n) => write!(f, "power{n}.in"),
            Easing::PowerOut(n) => write!(f, "power{n}.out"),
            Easing::PowerInOut(n) => write!(f, "power{n}.inOut"),
            Easing::ExpoIn => write!(f, "expo.in"),
            Easing::ExpoOut => write!(f, "expo.out"),
            Easing::ExpoInOut => write!(f, "expo.inOut"),
            Easing::BackOut => write!(f, "back.out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::PowerIn(2),
        Easing::PowerOut(1),
        Easing::PowerInOut(3),
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::BackOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing}");
        }
    }

    #[test]
    fn power_curves_bend_the_right_way() {
        assert!((Easing::PowerIn(1).apply(0.5) - 0.25).abs() < 1e-12);
        assert!((Easing::PowerOut(1).apply(0.5) - 0.75).abs() < 1e-12);
        assert!((Easing::PowerInOut(2).apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::PowerOut(4).apply(0.1) > Easing::PowerOut(1).apply(0.1));
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::BackOut.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn parse_names() {
        assert_eq!(Easing::parse("power2.out"), Some(Easing::PowerOut(2)));
        assert_eq!(Easing::parse("power3.inOut"), Some(Easing::PowerInOut(3)));
        assert_eq!(Easing::parse("power1"), Some(Easing::PowerOut(1)));
        assert_eq!(Easing::parse("expo.in"), Some(Easing::ExpoIn));
        assert_eq!(Easing::parse("back.out"), Some(Easing::BackOut));
        assert_eq!(Easing::parse("none"), Some(Easing::Linear));
        assert_eq!(Easing::parse("power9.out"), None);
        assert_eq!(Easing::parse("elastic.out"), None);
        assert!("wobble".parse::<Easing>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for easing in ALL {
            assert_eq!(Easing::parse(&easing.to_string()), Some(easing));
        }
    }

    #[test]
    fn default_is_power1_out() {
        assert_eq!(Easing::default(), "power1.out".parse().unwrap());
    }
}
