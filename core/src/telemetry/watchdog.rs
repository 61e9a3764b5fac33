use chrono::{DateTime, Duration, Utc};

use crate::telemetry::log::LogManager;

/// Flags the wind channel stale once no update has arrived within the timeout.
/// Staleness is reported, never acted on.
pub struct WindWatchdog {
    timeout: Duration,
    stale: bool,
    logger: LogManager,
}

impl WindWatchdog {
    /// Timeouts beyond what a `Duration` can hold are clamped to its maximum.
    pub fn new(timeout_secs: u64) -> Self {
        let timeout = i64::try_from(timeout_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            timeout,
            stale: false,
            logger: LogManager::new("watchdog"),
        }
    }

    /// Re-evaluates staleness for the given last wind update. Without any update yet the
    /// channel is not considered stale. Logs on each transition.
    pub fn check(&mut self, last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let stale = match last_update {
            Some(last) => now.signed_duration_since(last) > self.timeout,
            None => false,
        };
        if stale && !self.stale {
            self.logger.warn(&format!(
                "wind data timeout: no update in the last {} s",
                self.timeout.num_seconds()
            ));
        } else if !stale && self.stale {
            self.logger.record("wind data resumed");
        }
        self.stale = stale;
        stale
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goes_stale_after_timeout_and_recovers() {
        let mut watchdog = WindWatchdog::new(30);
        let start = Utc::now();
        assert!(!watchdog.check(None, start));
        assert!(!watchdog.check(Some(start), start + Duration::seconds(30)));
        assert!(watchdog.check(Some(start), start + Duration::seconds(31)));
        assert!(watchdog.is_stale());

        let fresh = start + Duration::seconds(40);
        assert!(!watchdog.check(Some(fresh), fresh + Duration::seconds(1)));
        assert!(!watchdog.is_stale());
    }

    #[test]
    fn oversized_timeout_is_clamped() {
        let mut watchdog = WindWatchdog::new(10u64.pow(18));
        let start = Utc::now();
        assert!(!watchdog.check(Some(start), start + Duration::days(365 * 100)));

        let mut watchdog = WindWatchdog::new(u64::MAX);
        assert!(!watchdog.check(Some(start), start + Duration::days(365)));
    }
}
