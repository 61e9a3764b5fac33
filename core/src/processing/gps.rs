use chrono::{NaiveDate, NaiveTime};

use crate::math::angle::normalize;
use crate::math::filter::ScalarFilter;
use crate::math::geodesy::KNOTS_TO_KMH;
use crate::nmea::Sentence;
use crate::prelude::{
    ChannelContext, Coordinate, NavError, NavResult, NavigationConfig, SentenceProcessor,
};
use crate::processing::angle_buffer::AngleBuffer;
use crate::records::GpsRecord;
use crate::telemetry::log::LogManager;

const FORMATS: &[&str] = &["GLL", "GGA", "RMC"];

/// Converts an NMEA `(d)ddmm.mmmm` coordinate into signed decimal degrees.
///
/// Latitudes (`N`/`S`) carry two degree digits, longitudes three. South and west are
/// negative. Returns `None` for text that does not fit the layout.
pub fn to_decimal_degrees(value: &str, direction: &str) -> Option<f64> {
    let value = value.trim();
    if value.len() < 4 || !value.is_ascii() {
        return None;
    }
    let split = match direction {
        "N" | "S" => 2,
        "E" | "W" => 3,
        _ => return None,
    };
    let (degrees, minutes) = value.split_at(split);
    let degrees: f64 = degrees.parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let decimal = degrees + minutes / 60.0;

    match direction {
        "N" | "E" => Some(decimal),
        _ => Some(-decimal),
    }
}

/// Position, course, speed and time from a single authoritative GPS talker.
pub struct GpsProcessor {
    record: GpsRecord,
    latitude_filter: ScalarFilter,
    longitude_filter: ScalarFilter,
    course_buffer: AngleBuffer,
    course_filter: ScalarFilter,
    speed_filter: ScalarFilter,
    logger: LogManager,
}

impl GpsProcessor {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            record: GpsRecord::default(),
            latitude_filter: ScalarFilter::seeded(config.tracking),
            longitude_filter: ScalarFilter::seeded(config.tracking),
            course_buffer: AngleBuffer::new(),
            course_filter: ScalarFilter::seeded(config.tracking),
            speed_filter: ScalarFilter::seeded(config.smoothing),
            logger: LogManager::new("gps"),
        }
    }

    pub fn select_target(&mut self, name: impl Into<String>, waypoint: Coordinate) {
        self.record.waypoint_name = Some(name.into());
        self.record.waypoint = Some(waypoint);
        self.record.is_target_selected = true;
        self.logger.record(&format!("target selected at {}", waypoint));
    }

    pub fn clear_target(&mut self) {
        self.record.clear_target();
        self.logger.record("target cleared");
    }

    fn position(sentence: &Sentence, first: usize) -> NavResult<Coordinate> {
        let read = |index: usize| -> NavResult<f64> {
            let value = sentence.field(index).unwrap_or_default();
            let direction = sentence.field(index + 1).unwrap_or_default();
            to_decimal_degrees(value, direction).ok_or_else(|| NavError::InvalidField {
                format: sentence.format.clone(),
                index,
                value: format!("{value},{direction}"),
            })
        };
        Ok(Coordinate::new(read(first)?, read(first + 2)?))
    }

    fn apply_position(&mut self, position: Coordinate) {
        self.record.raw_latitude = Some(position.latitude);
        self.record.raw_longitude = Some(position.longitude);
        self.record.latitude = Some(self.latitude_filter.update(position.latitude));
        self.record.longitude = Some(self.longitude_filter.update(position.longitude));
    }

    fn process_rmc(&mut self, sentence: &Sentence) -> NavResult<()> {
        sentence.require(9)?;
        sentence.require_active(1)?;

        let time = parse_time(sentence, 0)?;
        let position = Self::position(sentence, 2)?;
        let speed: Option<f64> = sentence.optional_number(6)?;
        let course: Option<f64> = sentence.optional_number(7)?;
        let date = parse_date(sentence, 8)?;

        self.apply_position(position);
        if let Some(speed) = speed {
            let filtered = self.speed_filter.update(speed);
            self.record.raw_speed_over_ground = Some(speed);
            self.record.speed_over_ground = Some(filtered);
            self.record.speed_over_ground_kmh = Some(filtered * KNOTS_TO_KMH);
        }
        if let Some(course) = course {
            let unwrapped = self.course_buffer.push(course);
            let filtered = self.course_filter.update(unwrapped);
            self.record.raw_course_over_ground = Some(normalize(course));
            self.record.course_over_ground = Some(normalize(filtered));
        }
        if time.is_some() {
            self.record.utc_time = time;
        }
        if date.is_some() {
            self.record.utc_date = date;
        }
        self.record.is_valid = true;
        Ok(())
    }
}

fn parse_time(sentence: &Sentence, index: usize) -> NavResult<Option<NaiveTime>> {
    match sentence.field(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveTime::parse_from_str(text, "%H%M%S%.f")
            .map(Some)
            .map_err(|_| invalid(sentence, index, text)),
    }
}

fn parse_date(sentence: &Sentence, index: usize) -> NavResult<Option<NaiveDate>> {
    match sentence.field(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%d%m%y")
            .map(Some)
            .map_err(|_| invalid(sentence, index, text)),
    }
}

fn invalid(sentence: &Sentence, index: usize, text: &str) -> NavError {
    NavError::InvalidField {
        format: sentence.format.clone(),
        index,
        value: text.to_string(),
    }
}

impl SentenceProcessor for GpsProcessor {
    type Record = GpsRecord;

    fn formats(&self) -> &'static [&'static str] {
        FORMATS
    }

    fn process(&mut self, sentence: &Sentence, _context: &ChannelContext) -> NavResult<()> {
        match sentence.format.as_str() {
            "GLL" => {
                sentence.require(4)?;
                let position = Self::position(sentence, 0)?;
                self.apply_position(position);
            }
            "GGA" => {
                // time precedes the position in GGA
                sentence.require(5)?;
                let position = Self::position(sentence, 1)?;
                self.apply_position(position);
            }
            "RMC" => self.process_rmc(sentence)?,
            other => return Err(NavError::UnknownFormat(other.to_string())),
        }
        Ok(())
    }

    fn record(&self) -> &GpsRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.reset();
        self.latitude_filter.reset();
        self.longitude_filter.reset();
        self.course_buffer.reset();
        self.course_filter.reset();
        self.speed_filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::checksum_hex;

    fn sentence(body: &str) -> Sentence {
        Sentence::parse(&format!("${}*{}", body, checksum_hex(body))).unwrap()
    }

    #[test]
    fn ddmm_conversion() {
        let lat = to_decimal_degrees("4916.45", "N").unwrap();
        assert!((lat - 49.274167).abs() < 1e-6);
        let lon = to_decimal_degrees("12311.12", "W").unwrap();
        assert!((lon + 123.185333).abs() < 1e-6);
        assert!(to_decimal_degrees("4916.45", "S").unwrap() < 0.0);
        assert!(to_decimal_degrees("491", "N").is_none());
        assert!(to_decimal_degrees("4916.45", "X").is_none());
        assert!(to_decimal_degrees("49a6.45", "N").is_none());
    }

    #[test]
    fn rmc_sets_everything_and_validity() {
        let mut gps = GpsProcessor::new(&NavigationConfig::default());
        let rmc = sentence("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W");
        gps.process(&rmc, &ChannelContext::default()).unwrap();

        let record = gps.record();
        assert!(record.is_valid);
        assert!((record.latitude.unwrap() - 48.1173).abs() < 1e-6);
        assert!((record.longitude.unwrap() - 11.516667).abs() < 1e-6);
        assert!((record.speed_over_ground.unwrap() - 22.4).abs() < 1e-9);
        assert!((record.speed_over_ground_kmh.unwrap() - 22.4 * 1.852).abs() < 1e-9);
        assert!((record.course_over_ground.unwrap() - 84.4).abs() < 1e-9);
        assert_eq!(record.utc_time, NaiveTime::from_hms_opt(12, 35, 19));
        assert_eq!(record.utc_date, NaiveDate::from_ymd_opt(1994, 3, 23));
    }

    #[test]
    fn void_rmc_is_rejected() {
        let mut gps = GpsProcessor::new(&NavigationConfig::default());
        let rmc = sentence("GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W");
        assert!(matches!(
            gps.process(&rmc, &ChannelContext::default()),
            Err(NavError::InvalidStatus { .. })
        ));
        assert_eq!(gps.record(), &GpsRecord::default());
    }

    #[test]
    fn gll_and_gga_update_position_only() {
        let mut gps = GpsProcessor::new(&NavigationConfig::default());
        let context = ChannelContext::default();
        gps.process(&sentence("GPGLL,4916.45,N,12311.12,W,225444,A"), &context)
            .unwrap();
        assert!((gps.record().latitude.unwrap() - 49.274167).abs() < 1e-6);
        assert!(gps.record().speed_over_ground.is_none());
        assert!(!gps.record().is_valid);

        let mut gga = GpsProcessor::new(&NavigationConfig::default());
        gga.process(
            &sentence("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            &context,
        )
        .unwrap();
        assert!((gga.record().raw_latitude.unwrap() - 48.1173).abs() < 1e-6);
        assert!((gga.record().raw_longitude.unwrap() - 11.516667).abs() < 1e-6);
    }

    #[test]
    fn position_filter_tracks_a_moving_boat() {
        let mut gps = GpsProcessor::new(&NavigationConfig::default());
        let context = ChannelContext::default();
        gps.process(&sentence("GPGLL,4300.000,N,02800.000,E,120000,A"), &context)
            .unwrap();
        gps.process(&sentence("GPGLL,4300.600,N,02800.000,E,120001,A"), &context)
            .unwrap();
        let latitude = gps.record().latitude.unwrap();
        assert!(latitude > 43.0 && latitude <= 43.01, "{latitude}");
    }

    #[test]
    fn target_selection_round_trip() {
        let mut gps = GpsProcessor::new(&NavigationConfig::default());
        gps.select_target("Mark", Coordinate::new(43.2, 28.0));
        assert!(gps.record().is_target_selected);
        assert_eq!(gps.record().waypoint_name.as_deref(), Some("Mark"));
        gps.clear_target();
        assert!(gps.record().waypoint.is_none());
    }
}
