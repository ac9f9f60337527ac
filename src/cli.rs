use std::time::Duration;

use clap::Parser;

use crate::check::CheckOptions;
use crate::error::Error;

/// Checks the counters of all network interfaces in /proc/net/dev.
///
/// Each RULE looks like INTERFACE:METRIC:THRESHOLD=RANGE, e.g.
/// `eth*:rx:errs:persec:w=10` where METRIC is one of rx:{bytes,packets,errs,drop,fifo,
/// frame,compressed,multicast} or tx:{bytes,packets,errs,drop,fifo,colls,carrier,
/// compressed} and THRESHOLD one of total:w, total:c, persec:w, persec:c. The first
/// rule matching an interface wins.
#[derive(Debug, Parser)]
#[command(name = "check_linux_netdev", version)]
pub struct Cli {
    /// Time between the two samples, e.g. 30s or 1m
    #[arg(
        short = 'd',
        long = "duration",
        default_value = "1m",
        value_parser = parse_interval,
        allow_hyphen_values = true
    )]
    pub duration: Duration,

    /// Leave out interfaces matching this glob
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Threshold rules
    #[arg(value_name = "RULE")]
    pub rules: Vec<String>,
}

impl Cli {
    pub fn into_options(self) -> CheckOptions {
        CheckOptions {
            interval: self.duration,
            exclude: self.exclude,
            rules: self.rules,
        }
    }
}

/// Negative durations are accepted and read as zero, which the check raises to its
/// minimum interval.
fn parse_interval(s: &str) -> Result<Duration, humantime::DurationError> {
    match s.strip_prefix('-') {
        Some(magnitude) => humantime::parse_duration(magnitude).map(|_| Duration::ZERO),
        None => humantime::parse_duration(s),
    }
}

impl From<clap::Error> for Error {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let reason = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_owned();

        Error::usage(reason)
    }
}
