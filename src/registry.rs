//! Generic addressing of the 16 counter metrics and their 4 threshold slots.
//!
//! Rules name a metric (`rx:bytes`) and a slot (`total:w`) by string. The registries
//! resolve those names to accessor functions, so neither the rule compiler nor the
//! delta engine needs code per metric.

use crate::netdev::NetDevCounters;
use crate::range::ThresholdRange;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdPair {
    pub warn: Option<ThresholdRange>,
    pub crit: Option<ThresholdRange>,
}

/// Thresholds of one metric of one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricThresholds {
    pub total: ThresholdPair,
    pub per_second: ThresholdPair,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RxThresholds {
    pub bytes: MetricThresholds,
    pub packets: MetricThresholds,
    pub errs: MetricThresholds,
    pub drop: MetricThresholds,
    pub fifo: MetricThresholds,
    pub frame: MetricThresholds,
    pub compressed: MetricThresholds,
    pub multicast: MetricThresholds,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxThresholds {
    pub bytes: MetricThresholds,
    pub packets: MetricThresholds,
    pub errs: MetricThresholds,
    pub drop: MetricThresholds,
    pub fifo: MetricThresholds,
    pub colls: MetricThresholds,
    pub carrier: MetricThresholds,
    pub compressed: MetricThresholds,
}

/// Thresholds of all metrics of one interface, all unset initially.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceThresholds {
    pub rx: RxThresholds,
    pub tx: TxThresholds,
}

pub struct MetricAccessor {
    pub key: &'static str,
    pub counter: fn(&NetDevCounters) -> u64,
    pub thresholds: fn(&mut DeviceThresholds) -> &mut MetricThresholds,
}

impl MetricAccessor {
    /// Whether the per-second rate of this metric is measured in bytes.
    pub fn is_bytes(&self) -> bool {
        self.key.ends_with(":bytes")
    }
}

impl std::fmt::Debug for MetricAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MetricAccessor").field(&self.key).finish()
    }
}

pub struct SlotAccessor {
    pub key: &'static str,
    pub slot: fn(&mut MetricThresholds) -> &mut Option<ThresholdRange>,
}

impl std::fmt::Debug for SlotAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SlotAccessor").field(&self.key).finish()
    }
}

pub static METRICS: [MetricAccessor; 16] = counter_metrics![
    "rx:bytes" => rx.bytes,
    "rx:packets" => rx.packets,
    "rx:errs" => rx.errs,
    "rx:drop" => rx.drop,
    "rx:fifo" => rx.fifo,
    "rx:frame" => rx.frame,
    "rx:compressed" => rx.compressed,
    "rx:multicast" => rx.multicast,
    "tx:bytes" => tx.bytes,
    "tx:packets" => tx.packets,
    "tx:errs" => tx.errs,
    "tx:drop" => tx.drop,
    "tx:fifo" => tx.fifo,
    "tx:colls" => tx.colls,
    "tx:carrier" => tx.carrier,
    "tx:compressed" => tx.compressed,
];

pub static SLOTS: [SlotAccessor; 4] = threshold_slots![
    "total:w" => total.warn,
    "total:c" => total.crit,
    "persec:w" => per_second.warn,
    "persec:c" => per_second.crit,
];

pub fn metric(key: &str) -> Option<&'static MetricAccessor> {
    METRICS.iter().find(|m| m.key == key)
}

pub fn slot(key: &str) -> Option<&'static SlotAccessor> {
    SLOTS.iter().find(|s| s.key == key)
}
