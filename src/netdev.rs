//! Interface counters as found in `/proc/net/dev`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

pub const PROC_NET_DEV: &str = "/proc/net/dev";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RxCounters {
    pub bytes: u64,
    pub packets: u64,
    pub errs: u64,
    pub drop: u64,
    pub fifo: u64,
    pub frame: u64,
    pub compressed: u64,
    pub multicast: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxCounters {
    pub bytes: u64,
    pub packets: u64,
    pub errs: u64,
    pub drop: u64,
    pub fifo: u64,
    pub colls: u64,
    pub carrier: u64,
    pub compressed: u64,
}

/// All counters of one interface at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetDevCounters {
    pub rx: RxCounters,
    pub tx: TxCounters,
}

impl From<[u64; 16]> for NetDevCounters {
    fn from(v: [u64; 16]) -> Self {
        NetDevCounters {
            rx: RxCounters {
                bytes: v[0],
                packets: v[1],
                errs: v[2],
                drop: v[3],
                fifo: v[4],
                frame: v[5],
                compressed: v[6],
                multicast: v[7],
            },
            tx: TxCounters {
                bytes: v[8],
                packets: v[9],
                errs: v[10],
                drop: v[11],
                fifo: v[12],
                colls: v[13],
                carrier: v[14],
                compressed: v[15],
            },
        }
    }
}

pub type CounterSnapshot = BTreeMap<String, NetDevCounters>;

/// Something which can read the counters of all interfaces.
pub trait CounterSource {
    fn snapshot(&mut self) -> Result<CounterSnapshot>;
}

/// Reads the counters from a file in the `/proc/net/dev` format.
#[derive(Debug, Clone)]
pub struct ProcNetDev {
    path: PathBuf,
}

impl ProcNetDev {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcNetDev { path: path.into() }
    }
}

impl Default for ProcNetDev {
    fn default() -> Self {
        ProcNetDev::new(PROC_NET_DEV)
    }
}

impl CounterSource for ProcNetDev {
    fn snapshot(&mut self) -> Result<CounterSnapshot> {
        let resource = self.path.display().to_string();
        let bytes = fs::read(&self.path).map_err(|source| Error::Acquisition {
            resource: resource.clone(),
            source,
        })?;

        // Interface names are arbitrary bytes.
        let content = String::from_utf8_lossy(&bytes);
        let snapshot = parse_net_dev(&resource, &content)?;
        debug!(resource = %resource, interfaces = snapshot.len(), "read interface counters");

        Ok(snapshot)
    }
}

/// Parses the content of `/proc/net/dev`. The first two lines are headers.
pub fn parse_net_dev(resource: &str, content: &str) -> Result<CounterSnapshot> {
    let mut snapshot = CounterSnapshot::new();

    for (idx, line) in content.lines().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }

        let malformed = |reason: String| Error::MalformedData {
            resource: resource.to_owned(),
            line: idx + 1,
            reason,
        };

        let (name, values) = line
            .rsplit_once(':')
            .ok_or_else(|| malformed("missing ':' after interface name".to_owned()))?;

        let mut counters = [0u64; 16];
        let mut fields = values.split_whitespace();

        for counter in counters.iter_mut() {
            let field = fields
                .next()
                .ok_or_else(|| malformed("expected 16 counters".to_owned()))?;
            *counter = field
                .parse()
                .map_err(|_| malformed(format!("invalid counter {field:?}")))?;
        }

        if fields.next().is_some() {
            return Err(malformed("expected 16 counters".to_owned()));
        }

        snapshot.insert(name.trim().to_owned(), NetDevCounters::from(counters));
    }

    Ok(snapshot)
}
