use crate::generator::template::{latitude_field, longitude_field, with_checksum};
use chrono::{DateTime, Utc};
use navcore::math::angle::normalize;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Boat and weather profile for synthetic instrument traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub true_wind_direction: f64,
    pub heading: f64,
    pub course_over_ground: f64,
    pub magnetic_heading: f64,
    pub log_speed_knots: f64,
    pub sog_knots: f64,
    pub wind_speed_knots: f64,
    /// Time between sentence bursts; also the dead-reckoning step.
    pub interval_ms: u64,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_latitude: 43.18447,
            start_longitude: 27.99403,
            true_wind_direction: 360.0,
            heading: 90.0,
            course_over_ground: 73.0,
            magnetic_heading: 73.0,
            log_speed_knots: 8.0,
            sog_knots: 7.0,
            wind_speed_knots: 10.0,
            interval_ms: 1000,
            seed: 0,
            description: None,
        }
    }
}

/// Produces one burst of DPT, VHW, HDG, MTW, MWV (true) and RMC sentences per cycle,
/// advancing the boat along its course and jittering speeds within realistic bounds.
pub struct SentenceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    latitude: f64,
    longitude: f64,
    log_speed: f64,
    sog: f64,
    wind_speed: f64,
}

impl SentenceGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            latitude: config.start_latitude,
            longitude: config.start_longitude,
            log_speed: config.log_speed_knots,
            sog: config.sog_knots,
            wind_speed: config.wind_speed_knots,
            config,
        }
    }

    /// Current dead-reckoned position.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn next_cycle(&mut self, now: DateTime<Utc>) -> Vec<String> {
        self.update_speeds();
        vec![
            self.depth(),
            self.speed_through_water(),
            self.heading(),
            self.temperature(),
            self.true_wind(),
            self.gps(now),
        ]
    }

    fn update_speeds(&mut self) {
        self.log_speed = (self.log_speed + self.rng.gen_range(-0.5..=0.5)).clamp(4.0, 12.0);
        self.sog = (self.sog + self.rng.gen_range(-0.5..=0.5)).clamp(3.0, 10.0);
        self.wind_speed = (self.wind_speed + self.rng.gen_range(-0.05..=0.05)).clamp(5.0, 20.0);
    }

    fn depth(&mut self) -> String {
        let depth: f64 = self.rng.gen_range(35.0..50.0);
        with_checksum(&format!("IIDPT,{:.1},,", depth))
    }

    fn speed_through_water(&self) -> String {
        with_checksum(&format!(
            "IIVHW,{:.0},T,{:.0},M,{:.2},N",
            normalize(self.config.heading),
            normalize(self.config.magnetic_heading),
            self.log_speed
        ))
    }

    fn heading(&self) -> String {
        with_checksum(&format!(
            "IIHDG,{:.1},,,0.0,E",
            normalize(self.config.magnetic_heading)
        ))
    }

    fn temperature(&mut self) -> String {
        let temperature: f64 = self.rng.gen_range(30.0..40.0);
        with_checksum(&format!("IIMTW,{:.1},C", temperature))
    }

    fn true_wind(&self) -> String {
        let angle = normalize(self.config.true_wind_direction) - normalize(self.config.heading);
        with_checksum(&format!(
            "IIMWV,{:.0},T,{:.1},N,A",
            angle.abs(),
            self.wind_speed
        ))
    }

    fn gps(&mut self, now: DateTime<Utc>) -> String {
        let hours = self.config.interval_ms as f64 / 3_600_000.0;
        let distance_nm = self.sog * hours;
        let course = normalize(self.config.course_over_ground).to_radians();
        self.latitude += distance_nm * course.cos() / 60.0;
        self.longitude +=
            distance_nm * course.sin() / (60.0 * self.latitude.to_radians().cos());

        let (lat, ns) = latitude_field(self.latitude);
        let (lon, ew) = longitude_field(self.longitude);
        with_checksum(&format!(
            "GPRMC,{},A,{},{},{},{},{:.2},{:.1},{},,,A",
            now.format("%H%M%S%.3f"),
            lat,
            ns,
            lon,
            ew,
            self.sog,
            normalize(self.config.course_over_ground),
            now.format("%d%m%y")
        ))
    }
}
