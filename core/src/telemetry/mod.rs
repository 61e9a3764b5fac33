pub mod log;
pub mod metrics;
pub mod publisher;
pub mod watchdog;

pub use log::LogManager;
pub use metrics::{MetricsRecorder, SentenceMetrics};
pub use publisher::SnapshotPublisher;
pub use watchdog::WindWatchdog;
