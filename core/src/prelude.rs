use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nmea::Sentence;

/// Measurement/process noise pair for one scalar filter channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterTuning {
    pub q: f64,
    pub r: f64,
}

impl FilterTuning {
    /// Follows the signal closely: position, heading and course.
    pub const TRACKING: FilterTuning = FilterTuning { q: 1e-3, r: 1e-4 };
    /// Damps gusts and log noise: wind, speeds, depth, temperature.
    pub const SMOOTHING: FilterTuning = FilterTuning { q: 1e-5, r: 1e-1 };
}

/// Shared configuration for the processors and engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub speed_log_calibration: f64,
    pub depth_alarm_m: Option<f64>,
    pub watchdog_timeout_secs: u64,
    pub publish_interval_ms: u64,
    pub tracking: FilterTuning,
    pub smoothing: FilterTuning,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            speed_log_calibration: 1.0,
            depth_alarm_m: None,
            watchdog_timeout_secs: 30,
            publish_interval_ms: 1000,
            tracking: FilterTuning::TRACKING,
            smoothing: FilterTuning::SMOOTHING,
        }
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SailingState {
    Upwind,
    Downwind,
}

impl fmt::Display for SailingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SailingState::Upwind => f.write_str("Upwind"),
            SailingState::Downwind => f.write_str("Downwind"),
        }
    }
}

/// Common error type for sentence decoding and navigation computations.
#[derive(thiserror::Error, Debug)]
pub enum NavError {
    #[error("sentence does not start with '$'")]
    MissingDelimiter,
    #[error("sentence has no checksum field")]
    MissingChecksum,
    #[error("checksum mismatch: computed {expected}, received {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("non-printable character {0:?} in sentence")]
    InvalidCharacter(char),
    #[error("sentence too short to carry a talker and format")]
    Truncated,
    #[error("unknown talker id: {0}")]
    UnknownTalker(String),
    #[error("unknown sentence format: {0}")]
    UnknownFormat(String),
    #[error("{format}: expected at least {expected} fields, got {actual}")]
    TooFewFields {
        format: String,
        expected: usize,
        actual: usize,
    },
    #[error("{format}: field {index} is not a valid value: {value:?}")]
    InvalidField {
        format: String,
        index: usize,
        value: String,
    },
    #[error("{format}: status {status:?} is not active")]
    InvalidStatus { format: String, status: String },
    #[error("calibration coefficient must be positive, got {0}")]
    InvalidCalibration(f64),
    #[error("table format: {0}")]
    TableFormat(String),
    #[error("polar diagram not loaded")]
    PolarUnavailable,
    #[error("missing input: {0}")]
    MissingInput(&'static str),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type NavResult<T> = Result<T, NavError>;

/// Readings other channels contribute to a processor's computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelContext {
    pub heading: Option<f64>,
    pub speed_through_water: Option<f64>,
    pub received_at: Option<DateTime<Utc>>,
}

/// A domain processor owns one record and updates it from validated sentences.
pub trait SentenceProcessor {
    type Record;

    /// Sentence formats this processor understands.
    fn formats(&self) -> &'static [&'static str];
    fn process(&mut self, sentence: &Sentence, context: &ChannelContext) -> NavResult<()>;
    fn record(&self) -> &Self::Record;
    fn reset(&mut self);

    fn accepts(&self, format: &str) -> bool {
        self.formats().contains(&format)
    }
}
