use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use check_linux_netdev::{
    CheckOptions, CounterSnapshot, CounterSource, NetDevCounters, NetdevCheck, PerfLabel,
    ProcNetDev, Result, ServiceState, ToPerfString,
};

struct Replay(VecDeque<CounterSnapshot>);

impl CounterSource for Replay {
    fn snapshot(&mut self) -> Result<CounterSnapshot> {
        Ok(self.0.pop_front().expect("no more snapshots"))
    }
}

fn counters(values: [u64; 16]) -> NetDevCounters {
    NetDevCounters::from(values)
}

fn options(interval: Duration, exclude: &[&str], rules: &[&str]) -> CheckOptions {
    CheckOptions {
        interval,
        exclude: exclude.iter().map(|s| s.to_string()).collect(),
        rules: rules.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_check_end_to_end() {
    let mut before = CounterSnapshot::new();
    before.insert("eth0".to_owned(), counters([1000; 16]));
    before.insert("lo".to_owned(), counters([0; 16]));
    before.insert("tun0".to_owned(), counters([0; 16]));

    let mut after = CounterSnapshot::new();
    after.insert("eth0".to_owned(), counters([1500; 16]));
    after.insert("lo".to_owned(), counters([10; 16]));

    let check = NetdevCheck::new(options(
        Duration::from_secs(2),
        &["l?"],
        &[
            "eth0:rx:errs:persec:c=100",
            "eth*:rx:errs:persec:c=1000",
            "eth*:tx:drop:total:w=1000",
            "lo:rx:bytes:total:c=0",
        ],
    ))
    .unwrap();

    let resource = check
        .run(&mut Replay(VecDeque::from([before, after])), |_| ())
        .unwrap();

    // lo is excluded, tun0 vanished
    assert_eq!(resource.results().len(), 32);
    assert!(resource
        .results()
        .iter()
        .all(|p| PerfLabel::parse(p.label()).unwrap().device == "eth0"));

    assert_eq!(resource.state(), ServiceState::Critical);

    let first: Vec<_> = resource.results()[..2]
        .iter()
        .map(|p| (p.label(), p.status()))
        .collect();
    assert_eq!(
        first,
        vec![
            ("eth0:rx:errs:persec", ServiceState::Critical),
            ("eth0:tx:drop:total", ServiceState::Warning),
        ]
    );
    assert_eq!(resource.results()[0].value(), 250.0);

    let report = resource.description().unwrap();
    let (breaching, healthy) = report.split_once("\n\n").unwrap();
    assert!(breaching.contains("<tr><td>eth0</td><td>rx errs/s</td><td>250</td></tr>"));
    assert!(breaching.contains("<tr><td>eth0</td><td>tx drop</td><td>1500</td></tr>"));
    assert!(healthy.contains("<tr><td>eth0</td><td>rx bytes/s</td><td>250</td></tr>"));
    assert!(healthy.contains("<tr><td>eth0</td><td>tx colls</td><td>1500</td></tr>"));

    let nagios = resource.to_nagios_string();
    assert!(nagios.starts_with("CRITICAL: <table>"));
    assert!(nagios.contains(" | eth0:rx:errs:persec=250;;100 eth0:tx:drop:total=1500c;1000;;0 "));
    assert!(nagios.contains(" eth0:rx:bytes:persec=250B "));
    assert_eq!(
        resource.results()[0].to_perf_string(),
        "eth0:rx:errs:persec=250;;100"
    );
}

#[test]
fn test_check_reads_proc_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Inter-|   Receive    |  Transmit").unwrap();
    writeln!(file, " face |bytes packets |bytes packets").unwrap();
    writeln!(file, "  eth0: 100 1 0 0 0 0 0 0 200 2 0 0 0 0 0 0").unwrap();

    let check = NetdevCheck::new(options(Duration::ZERO, &[], &[])).unwrap();
    let mut slept = Duration::MAX;
    let resource = check
        .run(&mut ProcNetDev::new(file.path()), |d| slept = d)
        .unwrap();

    assert_eq!(slept, Duration::from_secs(1));
    assert_eq!(resource.state(), ServiceState::Ok);
    assert_eq!(resource.results().len(), 32);
    assert!(resource.results().iter().all(|p| p.status() == ServiceState::Ok));
    assert!(resource
        .results()
        .iter()
        .filter(|p| p.label().ends_with(":persec"))
        .all(|p| p.value() == 0.0));
}

#[test]
fn test_usage_errors_abort_before_measuring() {
    for rule in [
        "eth0:bogus:total:w=10",
        "eth0:rx:bytes:bogus=10",
        "eth0:rx:bytes:total:w=notanumber",
    ] {
        let err = NetdevCheck::new(options(Duration::from_secs(1), &[], &[rule])).unwrap_err();
        assert!(err.is_usage(), "{rule}: {err}");
    }
}

#[test]
fn test_missing_proc_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let check = NetdevCheck::new(options(Duration::from_secs(1), &[], &[])).unwrap();

    let err = check
        .run(&mut ProcNetDev::new(dir.path().join("dev")), |_| {
            panic!("must not sleep after a failed snapshot")
        })
        .unwrap_err();
    assert!(!err.is_usage());
}
