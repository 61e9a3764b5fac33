use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Sentence counters shared between the dispatcher and whoever reports on it.
pub struct MetricsRecorder {
    inner: Mutex<SentenceMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceMetrics {
    /// Routed to a processor and applied.
    pub accepted: usize,
    /// Valid but with no processor for the format.
    pub ignored: usize,
    /// Failed a protocol gate or the processor's field checks.
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SentenceMetrics::default()),
        }
    }

    pub fn record_accepted(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.accepted += 1;
        }
    }

    pub fn record_ignored(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ignored += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> SentenceMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_outcome() {
        let metrics = MetricsRecorder::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_ignored();
        metrics.record_rejected();
        assert_eq!(
            metrics.snapshot(),
            SentenceMetrics {
                accepted: 2,
                ignored: 1,
                rejected: 1
            }
        );
    }
}
