use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::glob::glob_to_regex;
use crate::range::ThresholdRange;
use crate::registry::{self, DeviceThresholds, MetricAccessor, SlotAccessor};

static RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(.+):([rt]x:.+?):((?:total|persec):[wc])=(.+?)\z")
        .unwrap_or_else(|e| unreachable!("rule grammar: {e}"))
});

/// A threshold for one metric slot of all interfaces matching a glob.
///
/// Parsed from `INTERFACE-GLOB:{rx|tx}:METRIC:{total|persec}:{w|c}=RANGE`.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    interface: Regex,
    metric: &'static MetricAccessor,
    slot: &'static SlotAccessor,
    threshold: ThresholdRange,
}

impl ThresholdRule {
    pub fn metric(&self) -> &'static MetricAccessor {
        self.metric
    }

    pub fn slot(&self) -> &'static SlotAccessor {
        self.slot
    }

    pub fn threshold(&self) -> &ThresholdRange {
        &self.threshold
    }

    pub fn matches_interface(&self, name: &str) -> bool {
        self.interface.is_match(name)
    }

    /// Sets the rule's slot of the given interface unless an earlier rule already did.
    /// Returns whether the slot was set.
    pub fn apply(&self, device: &str, thresholds: &mut DeviceThresholds) -> bool {
        let slot = (self.slot.slot)((self.metric.thresholds)(thresholds));
        if slot.is_none() && self.matches_interface(device) {
            *slot = Some(self.threshold);
            return true;
        }

        false
    }
}

impl FromStr for ThresholdRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = RULE
            .captures(s)
            .ok_or_else(|| Error::usage(format!("malformed rule {s:?}")))?;

        let metric = registry::metric(&caps[2]).ok_or_else(|| {
            Error::usage(format!("unknown metric {:?} in rule {s:?}", &caps[2]))
        })?;
        let slot = registry::slot(&caps[3]).ok_or_else(|| {
            Error::usage(format!("unknown threshold {:?} in rule {s:?}", &caps[3]))
        })?;
        let threshold = caps[4]
            .parse::<ThresholdRange>()
            .map_err(|e| Error::invalid_rule(s, e))?;

        Ok(ThresholdRule {
            interface: glob_to_regex(&caps[1])?,
            metric,
            slot,
            threshold,
        })
    }
}

/// Compiles all rules in order. A single invalid rule fails the whole batch.
pub fn compile_rules<I, S>(raw: I) -> Result<Vec<ThresholdRule>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|rule| -> Result<ThresholdRule> {
            let rule = rule.as_ref();
            let compiled = rule.parse::<ThresholdRule>()?;
            debug!(
                rule,
                metric = compiled.metric.key,
                slot = compiled.slot.key,
                "compiled threshold rule"
            );
            Ok(compiled)
        })
        .collect()
}

/// Interfaces to leave out of the check entirely.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// Compiles every glob. Fails with a usage error if one cannot be compiled.
    pub fn new<I, S>(globs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(ExclusionFilter {
            patterns: globs
                .into_iter()
                .map(|g| glob_to_regex(g.as_ref()))
                .collect::<Result<_>>()?,
        })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str) -> ThresholdRule {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_rule() {
        let r = rule("eth*:rx:bytes:persec:c=1000:");
        assert_eq!(r.metric().key, "rx:bytes");
        assert_eq!(r.slot().key, "persec:c");
        assert_eq!(r.threshold().to_string(), "1000:");
        assert!(r.matches_interface("eth0"));
        assert!(!r.matches_interface("lo"));

        let r = rule("lo:tx:colls:total:w=@10:20");
        assert_eq!(r.metric().key, "tx:colls");
        assert_eq!(r.slot().key, "total:w");
        assert!(r.threshold().is_inverted());
    }

    #[test]
    fn test_interface_glob_may_contain_colons() {
        let r = rule("veth:a*:rx:drop:total:c=5");
        assert_eq!(r.metric().key, "rx:drop");
        assert!(r.matches_interface("veth:abc"));
    }

    #[test]
    fn test_usage_errors() {
        for bad in [
            "eth0:bogus:total:w=10",
            "eth0:rx:bytes:bogus=10",
            "eth0:rx:bytes:total:w=notanumber",
            "eth0:rx:bogus:total:w=10",
            "eth0:rx:bytes:total:w=",
            "eth0:rx:bytes:total:x=10",
            ":rx:bytes:total:w=10",
            "",
        ] {
            match bad.parse::<ThresholdRule>() {
                Err(err) => assert!(err.is_usage(), "{bad}: {err}"),
                Ok(_) => panic!("{bad:?} should not compile"),
            }
        }
    }

    #[test]
    fn test_compile_rules_fails_whole_batch() {
        let rules = compile_rules(["eth0:rx:bytes:total:w=10", "lo:tx:errs:persec:c=1"]).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].metric().key, "rx:bytes");
        assert_eq!(rules[1].metric().key, "tx:errs");

        let err = compile_rules(vec![
            "eth0:rx:bytes:total:w=10".to_owned(),
            "eth0:rx:bytes:total:w=notanumber".to_owned(),
        ])
        .unwrap_err();
        assert!(err.is_usage());

        assert!(compile_rules(Vec::<String>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = compile_rules([
            "eth0:rx:bytes:total:w=10",
            "eth*:rx:bytes:total:w=20",
            "eth*:rx:bytes:total:c=30",
        ])
        .unwrap();

        let mut thresholds = DeviceThresholds::default();
        let applied: Vec<bool> = rules.iter().map(|r| r.apply("eth0", &mut thresholds)).collect();
        assert_eq!(applied, vec![true, false, true]);
        assert_eq!(thresholds.rx.bytes.total.warn, "10".parse().ok());
        assert_eq!(thresholds.rx.bytes.total.crit, "30".parse().ok());

        let mut thresholds = DeviceThresholds::default();
        for r in &rules {
            r.apply("eth1", &mut thresholds);
        }
        assert_eq!(thresholds.rx.bytes.total.warn, "20".parse().ok());
    }

    #[test]
    fn test_non_matching_rule_leaves_slot_unset() {
        let r = rule("eth0:tx:drop:persec:w=1");
        let mut thresholds = DeviceThresholds::default();
        assert!(!r.apply("wlan0", &mut thresholds));
        assert_eq!(thresholds, DeviceThresholds::default());
    }

    #[test]
    fn test_exclusion_filter() {
        let filter = ExclusionFilter::new(["lo", "veth*", "docker?"]).unwrap();
        assert!(filter.is_excluded("lo"));
        assert!(filter.is_excluded("veth1234"));
        assert!(filter.is_excluded("docker0"));
        assert!(!filter.is_excluded("docker10"));
        assert!(!filter.is_excluded("eth0"));

        let filter = ExclusionFilter::default();
        assert!(!filter.is_excluded("lo"));
    }

    #[test]
    fn test_oversized_globs_are_usage_errors() {
        let huge = "?".repeat(20_000);

        let err = format!("{huge}:rx:bytes:total:w=10")
            .parse::<ThresholdRule>()
            .unwrap_err();
        assert!(err.is_usage(), "{err}");

        let err = ExclusionFilter::new(["lo", huge.as_str()]).unwrap_err();
        assert!(err.is_usage(), "{err}");
    }
}
