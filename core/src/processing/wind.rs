use chrono::Utc;

use crate::math::angle::normalize;
use crate::math::filter::ScalarFilter;
use crate::nmea::Sentence;
use crate::prelude::{ChannelContext, NavError, NavResult, NavigationConfig, SentenceProcessor};
use crate::processing::angle_buffer::AngleBuffer;
use crate::records::WindRecord;
use crate::telemetry::log::LogManager;

const FORMATS: &[&str] = &["MWV"];

/// Below this force the wind has no meaningful direction.
pub const CALM_THRESHOLD: f64 = 0.001;

/// Angle and force pair, angle in degrees off the bow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    pub angle: f64,
    pub force: f64,
}

/// Derives the true wind from the apparent wind and speed through water.
pub fn apparent_to_true(apparent: WindVector, stw: f64) -> WindVector {
    let awa = apparent.angle.to_radians();
    let aws = apparent.force;
    let force = (aws * aws + stw * stw - 2.0 * aws * stw * awa.cos()).max(0.0).sqrt();
    let angle = (aws * awa.sin()).atan2(stw - aws * awa.cos()).to_degrees();
    WindVector {
        angle: normalize(angle),
        force,
    }
}

/// Derives the apparent wind from the true wind and speed through water.
pub fn true_to_apparent(true_wind: WindVector, stw: f64) -> WindVector {
    let twa = true_wind.angle.to_radians();
    let tws = true_wind.force;
    let force = (tws * tws + stw * stw + 2.0 * tws * stw * twa.cos()).max(0.0).sqrt();
    let angle = (tws * twa.sin()).atan2(stw + tws * twa.cos()).to_degrees();
    WindVector {
        angle: normalize(angle),
        force,
    }
}

/// Compass direction the wind blows from; 0 when calm.
pub fn wind_direction(force: f64, angle: f64, heading: f64) -> f64 {
    if force <= CALM_THRESHOLD {
        return 0.0;
    }
    normalize(normalize(angle) + normalize(heading))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Apparent,
    True,
}

/// `MWV` processing. The measured side is filtered, the other side derived.
pub struct WindProcessor {
    record: WindRecord,
    apparent_angle_buffer: AngleBuffer,
    true_angle_buffer: AngleBuffer,
    apparent_angle_filter: ScalarFilter,
    true_angle_filter: ScalarFilter,
    apparent_force_filter: ScalarFilter,
    true_force_filter: ScalarFilter,
    logger: LogManager,
}

impl WindProcessor {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            record: WindRecord::default(),
            apparent_angle_buffer: AngleBuffer::new(),
            true_angle_buffer: AngleBuffer::new(),
            apparent_angle_filter: ScalarFilter::seeded(config.smoothing),
            true_angle_filter: ScalarFilter::seeded(config.smoothing),
            apparent_force_filter: ScalarFilter::seeded(config.smoothing),
            true_force_filter: ScalarFilter::seeded(config.smoothing),
            logger: LogManager::new("wind"),
        }
    }

    fn smooth(&mut self, reference: Reference, measured: WindVector) -> WindVector {
        let (buffer, angle_filter, force_filter) = match reference {
            Reference::Apparent => (
                &mut self.apparent_angle_buffer,
                &mut self.apparent_angle_filter,
                &mut self.apparent_force_filter,
            ),
            Reference::True => (
                &mut self.true_angle_buffer,
                &mut self.true_angle_filter,
                &mut self.true_force_filter,
            ),
        };
        let angle = angle_filter.update(buffer.push(measured.angle));
        WindVector {
            angle: normalize(angle),
            force: force_filter.update(measured.force),
        }
    }

    fn store(&mut self, reference: Reference, raw: WindVector, filtered: WindVector) {
        let record = &mut self.record;
        match reference {
            Reference::Apparent => {
                record.raw_apparent_angle = Some(raw.angle);
                record.raw_apparent_force = Some(raw.force);
                record.apparent_angle = Some(filtered.angle);
                record.apparent_force = Some(filtered.force);
            }
            Reference::True => {
                record.raw_true_angle = Some(raw.angle);
                record.raw_true_force = Some(raw.force);
                record.true_angle = Some(filtered.angle);
                record.true_force = Some(filtered.force);
            }
        }
    }

    fn update_directions(&mut self, heading: f64) {
        let record = &mut self.record;
        let pairs = [
            (record.raw_apparent_force, record.raw_apparent_angle),
            (record.apparent_force, record.apparent_angle),
            (record.raw_true_force, record.raw_true_angle),
            (record.true_force, record.true_angle),
        ];
        let [raw_awd, awd, raw_twd, twd] =
            pairs.map(|(force, angle)| Some(wind_direction(force?, angle?, heading)));

        record.raw_apparent_direction = raw_awd.or(record.raw_apparent_direction);
        record.apparent_direction = awd.or(record.apparent_direction);
        record.raw_true_direction = raw_twd.or(record.raw_true_direction);
        record.true_direction = twd.or(record.true_direction);
    }
}

impl SentenceProcessor for WindProcessor {
    type Record = WindRecord;

    fn formats(&self) -> &'static [&'static str] {
        FORMATS
    }

    fn process(&mut self, sentence: &Sentence, context: &ChannelContext) -> NavResult<()> {
        // angle, reference, speed, units, status
        sentence.require(5)?;
        sentence.require_active(4)?;
        let reference = match sentence.field(1) {
            Some("R") => Reference::Apparent,
            Some("T") => Reference::True,
            other => {
                return Err(NavError::InvalidField {
                    format: sentence.format.clone(),
                    index: 1,
                    value: other.unwrap_or_default().to_string(),
                })
            }
        };
        let raw = WindVector {
            angle: normalize(sentence.number(0)?),
            force: sentence.number(2)?,
        };

        let filtered = self.smooth(reference, raw);
        self.store(reference, raw, filtered);

        if let Some(stw) = context.speed_through_water {
            let (derived_reference, derive): (Reference, fn(WindVector, f64) -> WindVector) =
                match reference {
                    Reference::Apparent => (Reference::True, apparent_to_true),
                    Reference::True => (Reference::Apparent, true_to_apparent),
                };
            self.store(derived_reference, derive(raw, stw), derive(filtered, stw));
        }

        if let Some(heading) = context.heading {
            self.update_directions(heading);
        }

        self.record.last_updated = Some(context.received_at.unwrap_or_else(Utc::now));
        self.logger.debug(&format!(
            "{:?} wind {:.0} deg {:.1} kn",
            reference, filtered.angle, filtered.force
        ));
        Ok(())
    }

    fn record(&self) -> &WindRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.reset();
        self.apparent_angle_buffer.reset();
        self.true_angle_buffer.reset();
        self.apparent_angle_filter.reset();
        self.true_angle_filter.reset();
        self.apparent_force_filter.reset();
        self.true_force_filter.reset();
    }
}
