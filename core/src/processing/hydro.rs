use crate::math::filter::ScalarFilter;
use crate::nmea::Sentence;
use crate::prelude::{ChannelContext, NavError, NavResult, NavigationConfig, SentenceProcessor};
use crate::records::HydroRecord;
use crate::telemetry::log::LogManager;

const FORMATS: &[&str] = &["DPT", "MTW", "VHW", "VLW"];

/// Depth sounder, water temperature, speed log and distance log.
pub struct HydroProcessor {
    record: HydroRecord,
    calibration: f64,
    depth_alarm_m: Option<f64>,
    depth_filter: ScalarFilter,
    temperature_filter: ScalarFilter,
    speed_filter: ScalarFilter,
    logger: LogManager,
}

impl HydroProcessor {
    pub fn new(config: &NavigationConfig) -> Self {
        let logger = LogManager::new("hydro");
        let calibration = if is_valid_calibration(config.speed_log_calibration) {
            config.speed_log_calibration
        } else {
            logger.warn(&format!(
                "ignoring calibration {} from config, using 1.0",
                config.speed_log_calibration
            ));
            1.0
        };
        Self {
            record: HydroRecord {
                speed_log_calibration: Some(calibration),
                ..Default::default()
            },
            calibration,
            depth_alarm_m: config.depth_alarm_m,
            depth_filter: ScalarFilter::seeded(config.smoothing),
            temperature_filter: ScalarFilter::seeded(config.smoothing),
            speed_filter: ScalarFilter::seeded(config.smoothing),
            logger,
        }
    }

    /// Replaces the speed-log coefficient. Non-positive or non-finite values are
    /// rejected and the previous coefficient stays in force.
    pub fn set_calibration(&mut self, coefficient: f64) -> NavResult<()> {
        if !is_valid_calibration(coefficient) {
            self.logger
                .warn(&format!("rejected calibration coefficient {}", coefficient));
            return Err(NavError::InvalidCalibration(coefficient));
        }
        self.calibration = coefficient;
        self.record.speed_log_calibration = Some(coefficient);
        self.logger
            .record(&format!("speed log calibration set to {}", coefficient));
        Ok(())
    }

    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    pub fn set_depth_alarm(&mut self, threshold_m: Option<f64>) {
        self.depth_alarm_m = threshold_m;
        self.record.depth_alarm = self.alarm_for(self.record.depth);
    }

    /// Filtered speed through water, once the log has reported.
    pub fn speed_through_water(&self) -> Option<f64> {
        self.record.speed_through_water
    }

    fn alarm_for(&self, depth: Option<f64>) -> bool {
        matches!((depth, self.depth_alarm_m), (Some(depth), Some(limit)) if depth < limit)
    }
}

fn is_valid_calibration(coefficient: f64) -> bool {
    coefficient.is_finite() && coefficient > 0.0
}

impl SentenceProcessor for HydroProcessor {
    type Record = HydroRecord;

    fn formats(&self) -> &'static [&'static str] {
        FORMATS
    }

    fn process(&mut self, sentence: &Sentence, _context: &ChannelContext) -> NavResult<()> {
        match sentence.format.as_str() {
            "DPT" => {
                sentence.require(1)?;
                let depth: f64 = sentence.number(0)?;
                let filtered = self.depth_filter.update(depth);
                self.record.raw_depth = Some(depth);
                self.record.depth = Some(filtered);

                let alarm = self.alarm_for(Some(filtered));
                if alarm && !self.record.depth_alarm {
                    self.logger
                        .warn(&format!("depth {:.1} m below alarm threshold", filtered));
                }
                self.record.depth_alarm = alarm;
            }
            "MTW" => {
                sentence.require(1)?;
                let temperature: f64 = sentence.number(0)?;
                self.record.raw_sea_temperature = Some(temperature);
                self.record.sea_temperature = Some(self.temperature_filter.update(temperature));
            }
            "VHW" => {
                // true heading, T, magnetic heading, M, knots, N, km/h, K
                sentence.require(5)?;
                let knots: f64 = sentence.number(4)?;
                let scaled = knots * self.calibration;
                self.record.raw_speed_through_water = Some(scaled);
                self.record.speed_through_water = Some(self.speed_filter.update(scaled));
            }
            "VLW" => {
                sentence.require(3)?;
                let total: f64 = sentence.number(0)?;
                let since_reset: f64 = sentence.number(2)?;
                self.record.total_distance = Some(total);
                self.record.distance_since_reset = Some(since_reset);
            }
            other => return Err(NavError::UnknownFormat(other.to_string())),
        }
        Ok(())
    }

    fn record(&self) -> &HydroRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.reset();
        self.record.speed_log_calibration = Some(self.calibration);
        self.depth_filter.reset();
        self.temperature_filter.reset();
        self.speed_filter.reset();
    }
}
