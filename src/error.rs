use std::io;

use crate::range::RangeParseError;

pub type Result<T> = std::result::Result<T, Error>;

pub const USAGE: &str =
    "check_linux_netdev [-d DURATION] [-e EXCLUDE ...] [INTERFACE:METRIC:THRESHOLD=RANGE ...]";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("{resource}: {source}")]
    Acquisition {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("{resource}: line {line}: {reason}")]
    MalformedData {
        resource: String,
        line: usize,
        reason: String,
    },
}

impl Error {
    pub(crate) fn usage<S: AsRef<str>>(reason: S) -> Self {
        Error::Usage(format!("{} (usage: {USAGE})", reason.as_ref()))
    }

    pub(crate) fn invalid_rule(rule: &str, err: RangeParseError) -> Self {
        Error::usage(format!("rule {rule:?}: {err}"))
    }

    /// Returns true for errors caused by the invocation rather than the system.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_message() {
        let err = Error::usage("malformed rule \"x\"");
        assert_eq!(
            err.to_string(),
            format!("malformed rule \"x\" (usage: {USAGE})")
        );
        assert!(err.is_usage());

        let err = Error::invalid_rule("eth0:rx:bytes:total:w=x", RangeParseError::Empty);
        assert!(err.to_string().starts_with(
            "rule \"eth0:rx:bytes:total:w=x\": empty threshold range (usage: "
        ));
    }
}
