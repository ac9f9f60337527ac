macro_rules! impl_to_perf_string_on_to_string {
    ($($t:ty), *) => {
        $(
            impl ToPerfString for $t {
                fn to_perf_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

macro_rules! metric_string {
    ($name:expr, $( $tps:expr), *) => {
        {
            let mut s = String::new();
            s.push_str(&format!("{}=", $name));
            $(
                s.push_str(&$tps.to_perf_string());
                s.push(';');
            )*
            s.trim_end_matches(';').to_string()
        }
    };
}

/// Builds the counter metric registry. Every entry names a metric key and the field
/// it lives in, which must exist under the same path in both `NetDevCounters` and
/// `DeviceThresholds`.
macro_rules! counter_metrics {
    ($( $key:literal => $dir:ident . $field:ident ), * $(,)?) => {
        [
            $(
                MetricAccessor {
                    key: $key,
                    counter: {
                        fn counter(counters: &NetDevCounters) -> u64 {
                            counters.$dir.$field
                        }
                        counter
                    },
                    thresholds: {
                        fn thresholds(device: &mut DeviceThresholds) -> &mut MetricThresholds {
                            &mut device.$dir.$field
                        }
                        thresholds
                    },
                },
            )*
        ]
    };
}

/// Builds the threshold slot registry from `key => aspect.level` pairs.
macro_rules! threshold_slots {
    ($( $key:literal => $aspect:ident . $level:ident ), * $(,)?) => {
        [
            $(
                SlotAccessor {
                    key: $key,
                    slot: {
                        fn slot(metric: &mut MetricThresholds) -> &mut Option<ThresholdRange> {
                            &mut metric.$aspect.$level
                        }
                        slot
                    },
                },
            )*
        ]
    };
}
