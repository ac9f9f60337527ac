use std::time::Duration;

use tracing::debug;

use crate::netdev::CounterSnapshot;
use crate::perfdata::Perfdata;
use crate::registry::{DeviceThresholds, METRICS};
use crate::report::Aspect;
use crate::rules::{ExclusionFilter, ThresholdRule};
use crate::Unit;

/// Shortest measurement window. Shorter intervals are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Turns two snapshots taken `interval` apart into a total and a per-second perfdata
/// point per metric and interface.
///
/// Interfaces missing from `after` or matching `exclusions` are skipped. A counter
/// which went backwards (reset or wrap) yields a negative rate.
pub fn compute_perfdata(
    before: &CounterSnapshot,
    after: &CounterSnapshot,
    interval: Duration,
    rules: &[ThresholdRule],
    exclusions: &ExclusionFilter,
) -> Vec<Perfdata> {
    let seconds = interval.max(MIN_INTERVAL).as_secs_f64();
    let mut perfdata = Vec::with_capacity(before.len() * METRICS.len() * 2);

    for (device, before) in before {
        let Some(after) = after.get(device) else {
            debug!(device = %device, "interface vanished between snapshots");
            continue;
        };

        if exclusions.is_excluded(device) {
            debug!(device = %device, "interface excluded");
            continue;
        }

        let mut thresholds = DeviceThresholds::default();
        for rule in rules {
            rule.apply(device, &mut thresholds);
        }

        for metric in METRICS.iter() {
            let old = (metric.counter)(before);
            let new = (metric.counter)(after);
            let limits = *(metric.thresholds)(&mut thresholds);
            let label = |aspect: Aspect| format!("{}:{}:{}", device, metric.key, aspect);

            let total = Perfdata::new(label(Aspect::Total), new as f64)
                .with_unit(Unit::Counter)
                .with_thresholds(limits.total.warn, limits.total.crit)
                .with_minimum(0.0);

            let rate = (i128::from(new) - i128::from(old)) as f64 / seconds;
            let unit = if metric.is_bytes() { Unit::Bytes } else { Unit::None };
            let per_second = Perfdata::new(label(Aspect::PerSecond), rate)
                .with_unit(unit)
                .with_thresholds(limits.per_second.warn, limits.per_second.crit);

            perfdata.push(total);
            perfdata.push(per_second);
        }
    }

    perfdata
}
