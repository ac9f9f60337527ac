//! A nagios/icinga check for the network interface counters of a Linux host.
//!
//! The check samples `/proc/net/dev` twice, computes per-interface totals and
//! per-second rates for the 16 receive/transmit counters, applies threshold rules of
//! the form `INTERFACE-GLOB:METRIC:SLOT=RANGE` and renders an HTML report with the
//! breaching metrics first.

use std::cmp::Ordering;
use std::fmt;
use std::process;

#[macro_use]
mod macros;

mod check;
pub mod cli;
pub mod config_generator;
mod delta;
mod error;
mod glob;
mod netdev;
mod perfdata;
mod range;
mod registry;
mod report;
mod rules;
mod runner;

pub use crate::check::{CheckOptions, NetdevCheck};
pub use crate::delta::{compute_perfdata, MIN_INTERVAL};
pub use crate::error::{Error, Result, USAGE};
pub use crate::glob::glob_to_regex;
pub use crate::netdev::{
    parse_net_dev, CounterSnapshot, CounterSource, NetDevCounters, ProcNetDev, RxCounters,
    TxCounters,
};
pub use crate::perfdata::Perfdata;
pub use crate::range::{RangeParseError, ThresholdRange};
pub use crate::registry::{
    metric, slot, DeviceThresholds, MetricAccessor, MetricThresholds, SlotAccessor,
    ThresholdPair, METRICS, SLOTS,
};
pub use crate::report::{render_report, sort_perfdata, Aspect, PerfLabel};
pub use crate::rules::{compile_rules, ExclusionFilter, ThresholdRule};
pub use crate::runner::{Runner, RunnerResult};

/// A Resource basically represents a single service if you view it from the perspective of nagios.
/// Its state is the worst state of its results, or ok if it has none.
///
/// ```rust
/// # use check_linux_netdev::{Perfdata, Resource, ServiceState};
/// let resource = Resource::new("NETDEV")
///     .with_description("all good")
///     .with_result(Perfdata::new("eth0:rx:bytes:total", 12.0));
/// assert_eq!(resource.state(), ServiceState::Ok);
/// assert_eq!(&resource.to_nagios_string(), "NETDEV OK: all good | eth0:rx:bytes:total=12");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resource {
    name: Option<String>,
    description: Option<String>,
    results: Vec<Perfdata>,
}

impl Resource {
    pub fn new(name: &str) -> Resource {
        Resource {
            name: Some(name.to_owned()),
            ..Resource::default()
        }
    }

    /// A resource whose output starts with the state.
    pub fn unnamed() -> Resource {
        Resource::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_result(mut self, result: Perfdata) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_results(mut self, results: impl IntoIterator<Item = Perfdata>) -> Self {
        self.results.extend(results);
        self
    }

    pub fn results(&self) -> &[Perfdata] {
        &self.results
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn state(&self) -> ServiceState {
        self.results
            .iter()
            .map(Perfdata::status)
            .max()
            .unwrap_or(ServiceState::Ok)
    }

    /// Returns a string which nagios understands to determine the service state.
    pub fn to_nagios_string(&self) -> String {
        let mut s = String::new();

        if let Some(ref name) = self.name {
            s.push_str(&format!("{} ", name))
        }

        s.push_str(&self.state().to_string());

        if let Some(ref description) = self.description {
            s.push_str(&format!(": {}", description));
        }

        if !self.results.is_empty() {
            s.push_str(" |");

            for result in self.results.iter() {
                s.push_str(&format!(" {}", result.to_perf_string()));
            }
        }

        s
    }

    pub fn exit_code(&self) -> i32 {
        self.state().exit_code()
    }

    /// Will print Self::to_nagios_string and exit with the exit code from Self::exit_code
    pub fn print_and_exit(&self) -> ! {
        println!("{}", self.to_nagios_string());
        process::exit(self.exit_code());
    }
}

/// Represents a service state from nagios.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }

    fn severity(&self) -> u8 {
        match self {
            ServiceState::Unknown => 0,
            ServiceState::Ok => 1,
            ServiceState::Warning => 2,
            ServiceState::Critical => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        })
    }
}

impl PartialOrd for ServiceState {
    fn partial_cmp(&self, other: &ServiceState) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceState {
    fn cmp(&self, other: &ServiceState) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

/// The purpose of ToPerfString is only so one can define custom representations of custom types
/// without using the ToString trait so we don't interfere with that.
pub trait ToPerfString {
    fn to_perf_string(&self) -> String;
}

impl_to_perf_string_on_to_string!(f64, String);

impl<T> ToPerfString for Option<T>
where
    T: ToPerfString,
{
    fn to_perf_string(&self) -> String {
        match self {
            Some(ref s) => s.to_perf_string(),
            None => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    None,
    Bytes,
    Counter,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::None => "",
            Unit::Bytes => "B",
            Unit::Counter => "c",
        })
    }
}
