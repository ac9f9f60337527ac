//! Nagios threshold ranges.
//!
//! A range is written as `[@]start:end`. The value alerts when it lies outside of
//! `start..=end`, or inside of it when the range is prefixed with `@`. Shortcuts:
//!
//! | text     | alerts when           |
//! |----------|-----------------------|
//! | `10`     | `< 0` or `> 10`       |
//! | `10:`    | `< 10`                |
//! | `~:10`   | `> 10`                |
//! | `10:20`  | `< 10` or `> 20`      |
//! | `@10:20` | `>= 10` and `<= 20`   |

use std::fmt;
use std::str::FromStr;

use crate::ToPerfString;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeParseError {
    #[error("empty threshold range")]
    Empty,
    #[error("invalid number {0:?} in threshold range")]
    InvalidNumber(String),
    #[error("threshold range start {start} is greater than end {end}")]
    StartAfterEnd { start: f64, end: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    start: f64,
    end: f64,
    inverted: bool,
}

impl ThresholdRange {
    pub fn new(start: f64, end: f64, inverted: bool) -> Result<Self, RangeParseError> {
        if start > end {
            return Err(RangeParseError::StartAfterEnd { start, end });
        }

        Ok(ThresholdRange {
            start,
            end,
            inverted,
        })
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns true if the given value should raise an alert.
    ///
    /// ```rust
    /// # use check_linux_netdev::ThresholdRange;
    /// let range: ThresholdRange = "10:20".parse().unwrap();
    /// assert!(range.alerts(9.5));
    /// assert!(!range.alerts(20.0));
    /// ```
    pub fn alerts(&self, value: f64) -> bool {
        let inside = self.start <= value && value <= self.end;
        inside == self.inverted
    }
}

impl FromStr for ThresholdRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (inverted, s) = match s.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if s.is_empty() {
            return Err(RangeParseError::Empty);
        }

        let (start, end) = match s.split_once(':') {
            None => (0.0, parse_bound(s)?),
            Some((start, end)) => {
                let start = match start {
                    "~" => f64::NEG_INFINITY,
                    "" => 0.0,
                    start => parse_bound(start)?,
                };
                let end = match end {
                    "" => f64::INFINITY,
                    end => parse_bound(end)?,
                };
                (start, end)
            }
        };

        ThresholdRange::new(start, end, inverted)
    }
}

fn parse_bound(s: &str) -> Result<f64, RangeParseError> {
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| RangeParseError::InvalidNumber(s.to_owned()))
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("@")?;
        }

        match (self.start, self.end) {
            (start, end) if start == 0.0 && end.is_finite() => write!(f, "{end}"),
            (start, end) if start == f64::NEG_INFINITY && end == f64::INFINITY => f.write_str("~:"),
            (start, end) if start == f64::NEG_INFINITY => write!(f, "~:{end}"),
            (start, end) if end == f64::INFINITY => write!(f, "{start}:"),
            (start, end) => write!(f, "{start}:{end}"),
        }
    }
}

impl ToPerfString for ThresholdRange {
    fn to_perf_string(&self) -> String {
        self.to_string()
    }
}
