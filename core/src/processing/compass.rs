use crate::math::angle::normalize;
use crate::math::filter::ScalarFilter;
use crate::nmea::Sentence;
use crate::prelude::{ChannelContext, NavResult, NavigationConfig, SentenceProcessor};
use crate::processing::angle_buffer::AngleBuffer;
use crate::records::CompassRecord;
use crate::telemetry::log::LogManager;

const FORMATS: &[&str] = &["HDG"];

/// Magnetic heading from `HDG`, corrected for variation and smoothed across north.
pub struct CompassProcessor {
    record: CompassRecord,
    heading_buffer: AngleBuffer,
    heading_filter: ScalarFilter,
    logger: LogManager,
}

impl CompassProcessor {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            record: CompassRecord::default(),
            heading_buffer: AngleBuffer::new(),
            heading_filter: ScalarFilter::seeded(config.tracking),
            logger: LogManager::new("compass"),
        }
    }

    /// Filtered heading in [0, 360), once one is known.
    pub fn heading(&self) -> Option<f64> {
        self.record.normalized_heading
    }
}

/// Applies magnetic variation: east is added, anything else subtracted.
pub fn corrected_heading(heading: f64, variation: f64, direction: &str) -> f64 {
    if direction == "E" {
        heading + variation
    } else {
        heading - variation
    }
}

impl SentenceProcessor for CompassProcessor {
    type Record = CompassRecord;

    fn formats(&self) -> &'static [&'static str] {
        FORMATS
    }

    fn process(&mut self, sentence: &Sentence, _context: &ChannelContext) -> NavResult<()> {
        // heading, deviation, deviation dir, variation, variation dir
        sentence.require(5)?;
        let heading: f64 = sentence.number(0)?;
        let variation: f64 = sentence.number(3)?;
        let direction = sentence.field(4).unwrap_or_default();

        let raw = corrected_heading(heading, variation, direction);
        let unwrapped = self.heading_buffer.push(raw);
        let filtered = self.heading_filter.update(unwrapped);

        self.record.raw_magnetic_heading = Some(raw);
        self.record.raw_normalized_heading = Some(normalize(raw));
        self.record.magnetic_heading = Some(filtered);
        self.record.normalized_heading = Some(normalize(filtered));

        self.logger
            .debug(&format!("heading {:.1} -> {:.1}", raw, normalize(filtered)));
        Ok(())
    }

    fn record(&self) -> &CompassRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.reset();
        self.heading_buffer.reset();
        self.heading_filter.reset();
    }
}
