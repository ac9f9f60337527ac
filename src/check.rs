use std::time::Duration;

use tracing::{debug, info};

use crate::delta::{compute_perfdata, MIN_INTERVAL};
use crate::error::Result;
use crate::netdev::CounterSource;
use crate::report::{render_report, sort_perfdata};
use crate::rules::{compile_rules, ExclusionFilter, ThresholdRule};
use crate::Resource;

/// Raw, unvalidated check configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub interval: Duration,
    pub exclude: Vec<String>,
    pub rules: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            interval: Duration::from_secs(60),
            exclude: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// A validated check, ready to measure.
#[derive(Debug)]
pub struct NetdevCheck {
    interval: Duration,
    rules: Vec<ThresholdRule>,
    exclusions: ExclusionFilter,
}

impl NetdevCheck {
    /// Compiles rules and exclusions. Fails with a usage error before anything is measured.
    pub fn new(options: CheckOptions) -> Result<Self> {
        let rules = compile_rules(&options.rules)?;
        let exclusions = ExclusionFilter::new(&options.exclude)?;

        debug!(rules = rules.len(), exclusions = options.exclude.len(), "check configured");

        Ok(NetdevCheck {
            interval: options.interval.max(MIN_INTERVAL),
            rules,
            exclusions,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes a snapshot, waits for the interval via `sleep`, takes another and reports
    /// the difference. Any acquisition error aborts the check.
    pub fn run<S, F>(&self, source: &mut S, sleep: F) -> Result<Resource>
    where
        S: CounterSource + ?Sized,
        F: FnOnce(Duration),
    {
        let before = source.snapshot()?;

        info!(interval = ?self.interval, interfaces = before.len(), "measuring");
        sleep(self.interval);

        let after = source.snapshot()?;

        let mut perfdata = compute_perfdata(
            &before,
            &after,
            self.interval,
            &self.rules,
            &self.exclusions,
        );
        sort_perfdata(&mut perfdata);

        Ok(Resource::unnamed()
            .with_description(render_report(&perfdata))
            .with_results(perfdata))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::Error;
    use crate::netdev::{CounterSnapshot, NetDevCounters};
    use crate::ServiceState;

    struct Replay(VecDeque<Result<CounterSnapshot>>);

    impl CounterSource for Replay {
        fn snapshot(&mut self) -> Result<CounterSnapshot> {
            self.0.pop_front().unwrap_or_else(|| panic!("no more snapshots"))
        }
    }

    fn snapshot(rx_bytes: u64) -> CounterSnapshot {
        let mut counters = NetDevCounters::default();
        counters.rx.bytes = rx_bytes;
        [("eth0".to_owned(), counters)].into_iter().collect()
    }

    #[test]
    fn test_interval_is_clamped() {
        let options = CheckOptions {
            interval: Duration::ZERO,
            ..CheckOptions::default()
        };
        assert_eq!(NetdevCheck::new(options).unwrap().interval(), MIN_INTERVAL);
        assert_eq!(
            NetdevCheck::new(CheckOptions::default()).unwrap().interval(),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_run_sleeps_between_snapshots() {
        let options = CheckOptions {
            interval: Duration::from_secs(2),
            rules: vec!["eth0:rx:bytes:persec:c=100".to_owned()],
            ..CheckOptions::default()
        };
        let check = NetdevCheck::new(options).unwrap();
        let mut source = Replay(VecDeque::from([Ok(snapshot(1000)), Ok(snapshot(1500))]));

        let mut slept = None;
        let resource = check.run(&mut source, |d| slept = Some(d)).unwrap();

        assert_eq!(slept, Some(Duration::from_secs(2)));
        assert_eq!(resource.state(), ServiceState::Critical);
        assert_eq!(resource.results().len(), 32);
        assert_eq!(resource.results()[0].label(), "eth0:rx:bytes:persec");
        assert_eq!(resource.results()[0].value(), 250.0);
        assert!(resource.description().unwrap().starts_with(
            "<table><thead><tr><th>Device</th><th>Metric</th><th>Value</th></tr></thead><tbody>\
             <tr><td>eth0</td><td>rx bytes/s</td><td>250</td></tr>"
        ));
    }

    #[test]
    fn test_acquisition_error_aborts() {
        let check = NetdevCheck::new(CheckOptions::default()).unwrap();
        let failure = || Error::Acquisition {
            resource: "/proc/net/dev".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        let mut source = Replay(VecDeque::from([Err(failure())]));
        let mut slept = false;
        assert!(check.run(&mut source, |_| slept = true).is_err());
        assert!(!slept);

        let mut source = Replay(VecDeque::from([Ok(snapshot(1)), Err(failure())]));
        let err = check.run(&mut source, |_| ()).unwrap_err();
        assert!(err.to_string().starts_with("/proc/net/dev"));
    }

    #[test]
    fn test_bad_rule_fails_before_measuring() {
        let options = CheckOptions {
            rules: vec![
                "eth0:rx:bytes:total:w=10".to_owned(),
                "eth0:bogus:total:w=10".to_owned(),
            ],
            ..CheckOptions::default()
        };
        assert!(NetdevCheck::new(options).unwrap_err().is_usage());
    }

    #[test]
    fn test_oversized_exclusion_fails_before_measuring() {
        let options = CheckOptions {
            exclude: vec!["lo".to_owned(), "?".repeat(50_000)],
            ..CheckOptions::default()
        };
        assert!(NetdevCheck::new(options).unwrap_err().is_usage());
    }
}
