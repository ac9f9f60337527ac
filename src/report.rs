use std::cmp::Reverse;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::perfdata::Perfdata;
use crate::ServiceState;

static PERF_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(.+):(\w+):(\w+):(\w+)\z").unwrap_or_else(|e| unreachable!("label grammar: {e}"))
});

const TABLE_HEAD: &str =
    "<table><thead><tr><th>Device</th><th>Metric</th><th>Value</th></tr></thead><tbody>";
const TABLE_TAIL: &str = "</tbody></table>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    Total,
    PerSecond,
}

impl Aspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Total => "total",
            Aspect::PerSecond => "persec",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A perfdata label split into its parts: `device:category:name:aspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfLabel {
    pub device: String,
    pub category: String,
    pub name: String,
    pub aspect: Aspect,
}

impl PerfLabel {
    pub fn parse(label: &str) -> Option<PerfLabel> {
        let caps = PERF_LABEL.captures(label)?;
        let aspect = match &caps[4] {
            "total" => Aspect::Total,
            "persec" => Aspect::PerSecond,
            _ => return None,
        };

        Some(PerfLabel {
            device: caps[1].to_owned(),
            category: caps[2].to_owned(),
            name: caps[3].to_owned(),
            aspect,
        })
    }
}

impl fmt::Display for PerfLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.device, self.category, self.name, self.aspect)
    }
}

/// Sorts the worst states first, then by label.
pub fn sort_perfdata(perfdata: &mut [Perfdata]) {
    perfdata.sort_by_cached_key(|p| (Reverse(p.status()), p.label().to_owned()));
}

/// Renders one HTML table of the breaching and one of the healthy points, in the
/// order given.
pub fn render_report(perfdata: &[Perfdata]) -> String {
    let mut breaching = String::from(TABLE_HEAD);
    let mut healthy = String::from(TABLE_HEAD);

    for p in perfdata {
        let Some(label) = PerfLabel::parse(p.label()) else {
            continue;
        };

        let buf = if p.status() == ServiceState::Ok {
            &mut healthy
        } else {
            &mut breaching
        };

        buf.push_str("<tr><td>");
        buf.push_str(&escape_html(&label.device));
        buf.push_str("</td><td>");
        buf.push_str(&label.category);
        buf.push(' ');
        buf.push_str(&label.name);

        if label.aspect == Aspect::PerSecond {
            buf.push_str("/s");
        }

        buf.push_str("</td><td>");
        buf.push_str(&p.value().to_string());
        buf.push_str("</td></tr>");
    }

    breaching.push_str(TABLE_TAIL);
    healthy.push_str(TABLE_TAIL);

    format!("{breaching}\n\n{healthy}")
}

fn escape_html(s: &str) -> String {
    [("&", "&amp;"), ("<", "&lt;"), (">", "&gt;"), ("\"", "&#34;"), ("'", "&#39;")]
        .iter()
        .fold(s.to_string(), |acc, (c, e)| acc.replace(c, e))
}
