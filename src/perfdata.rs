use crate::range::ThresholdRange;
use crate::{ServiceState, ToPerfString, Unit};

/// A single reportable value with its thresholds.
///
/// The state is derived from the thresholds: a breached critical range wins over a
/// breached warning range, everything else is ok.
///
/// ```rust
/// # use check_linux_netdev::{Perfdata, ServiceState, ToPerfString, Unit};
/// let perfdata = Perfdata::new("eth0:rx:bytes:persec", 2048.0)
///     .with_unit(Unit::Bytes)
///     .with_thresholds("1024".parse().ok(), "4096".parse().ok());
/// assert_eq!(perfdata.status(), ServiceState::Warning);
/// assert_eq!(perfdata.to_perf_string(), "eth0:rx:bytes:persec=2048B;1024;4096");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Perfdata {
    label: String,
    value: f64,
    unit: Unit,
    warning: Option<ThresholdRange>,
    critical: Option<ThresholdRange>,
    min: Option<f64>,
}

impl Perfdata {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Perfdata {
            label: label.into(),
            value,
            unit: Unit::None,
            warning: None,
            critical: None,
            min: None,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_thresholds(
        mut self,
        warning: Option<ThresholdRange>,
        critical: Option<ThresholdRange>,
    ) -> Self {
        self.warning = warning;
        self.critical = critical;
        self
    }

    pub fn with_minimum(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn warning(&self) -> Option<&ThresholdRange> {
        self.warning.as_ref()
    }

    pub fn critical(&self) -> Option<&ThresholdRange> {
        self.critical.as_ref()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn status(&self) -> ServiceState {
        if self.critical.map_or(false, |c| c.alerts(self.value)) {
            ServiceState::Critical
        } else if self.warning.map_or(false, |w| w.alerts(self.value)) {
            ServiceState::Warning
        } else {
            ServiceState::Ok
        }
    }
}

impl ToPerfString for Perfdata {
    fn to_perf_string(&self) -> String {
        // replace `=`
        let name = self.label.replace('=', "_");

        // quote `'`
        let name = name.replace('\'', "''");

        // quote if contains spaces
        let name = if name.contains(' ') {
            format!("'{}'", name)
        } else {
            name
        };

        metric_string!(
            name,
            format!(
                "{}{}",
                self.value.to_perf_string(),
                self.unit.to_string()
            ),
            self.warning,
            self.critical,
            self.min
        )
    }
}
