//! Client options.

use std::env;
use std::time::Duration;

/// Page size sent as `Limit` when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Options shared by every request a [`Dyno`](crate::Dyno) issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynoOptions {
    /// Per-request timeout (default: 5 seconds).
    pub timeout: Duration,
    /// Rows per scan page. `None` sends the default of 100.
    pub page_size: Option<u32>,
    /// Log request and response bodies at debug level.
    pub log: bool,
    /// Send requests here instead of `https://dynamodb.<region>.amazonaws.com`.
    pub endpoint: Option<String>,
}

impl DynoOptions {
    /// Create options from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `DYNO_TIMEOUT_SECS` | `timeout` |
    /// | `DYNO_PAGE_SIZE` | `page_size` |
    /// | `DYNO_LOG` | `log` |
    /// | `DYNO_ENDPOINT` | `endpoint` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            timeout: lookup("DYNO_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
            page_size: lookup("DYNO_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0),
            log: lookup("DYNO_LOG").map_or(defaults.log, |v| is_truthy(&v)),
            endpoint: lookup("DYNO_ENDPOINT").filter(|v| !v.is_empty()),
        }
    }

    /// The `Limit` to send on a scan page.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

impl Default for DynoOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            page_size: None,
            log: false,
            endpoint: None,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "yes" | "TRUE" | "YES")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_should_default_to_five_second_timeout_and_page_of_100() {
        let options = DynoOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.effective_page_size(), 100);
        assert!(!options.log);
        assert!(options.endpoint.is_none());
    }

    #[test]
    fn test_should_read_overrides_from_environment() {
        let vars = HashMap::from([
            ("DYNO_TIMEOUT_SECS", "30"),
            ("DYNO_PAGE_SIZE", "25"),
            ("DYNO_LOG", "yes"),
            ("DYNO_ENDPOINT", "http://localhost:8000"),
        ]);
        let options = DynoOptions::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()));
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.effective_page_size(), 25);
        assert!(options.log);
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_should_ignore_unparsable_values() {
        let vars = HashMap::from([("DYNO_TIMEOUT_SECS", "soon"), ("DYNO_PAGE_SIZE", "0")]);
        let options = DynoOptions::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()));
        assert_eq!(options, DynoOptions::default());
    }
}
