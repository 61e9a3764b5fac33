use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::math::geodesy::KNOTS_TO_METERS_PER_SECOND;
use crate::prelude::NavResult;
use crate::records::{
    CompassRecord, GpsRecord, HydroRecord, PolarResult, WaypointResult, WindRecord,
};
use crate::telemetry::metrics::SentenceMetrics;

/// Unit wind forces are reported in on display channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindUnits {
    #[default]
    Knots,
    MetersPerSecond,
}

/// The fixed display slots instrument panels bind to, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayChannel {
    Depth,
    Heading,
    SeaTemperature,
    BoatSpeed,
    ApparentWindAngle,
    ApparentWindDirection,
    ApparentWindSpeed,
    TrueWindAngle,
    TrueWindDirection,
    TrueWindSpeed,
    CourseOverGround,
    SpeedOverGround,
}

impl DisplayChannel {
    pub const ALL: [DisplayChannel; 12] = [
        DisplayChannel::Depth,
        DisplayChannel::Heading,
        DisplayChannel::SeaTemperature,
        DisplayChannel::BoatSpeed,
        DisplayChannel::ApparentWindAngle,
        DisplayChannel::ApparentWindDirection,
        DisplayChannel::ApparentWindSpeed,
        DisplayChannel::TrueWindAngle,
        DisplayChannel::TrueWindDirection,
        DisplayChannel::TrueWindSpeed,
        DisplayChannel::CourseOverGround,
        DisplayChannel::SpeedOverGround,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Everything the engine knows at one instant. Cheap to clone and safe to hand to
/// other threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub compass: CompassRecord,
    pub gps: GpsRecord,
    pub hydro: HydroRecord,
    pub wind: WindRecord,
    pub polar: PolarResult,
    pub waypoint: WaypointResult,
    pub metrics: SentenceMetrics,
    pub wind_stale: bool,
    pub taken_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Value for display slot `index`, with wind speeds in knots.
    pub fn display_value(&self, index: usize) -> Option<f64> {
        self.display_value_in(index, WindUnits::Knots)
    }

    pub fn display_value_in(&self, index: usize, units: WindUnits) -> Option<f64> {
        self.channel(DisplayChannel::from_index(index)?, units)
    }

    pub fn channel(&self, channel: DisplayChannel, units: WindUnits) -> Option<f64> {
        let wind_speed = |force: Option<f64>| match units {
            WindUnits::Knots => force,
            WindUnits::MetersPerSecond => force.map(|knots| knots * KNOTS_TO_METERS_PER_SECOND),
        };
        match channel {
            DisplayChannel::Depth => self.hydro.depth,
            DisplayChannel::Heading => self.compass.normalized_heading,
            DisplayChannel::SeaTemperature => self.hydro.sea_temperature,
            DisplayChannel::BoatSpeed => self.hydro.speed_through_water,
            DisplayChannel::ApparentWindAngle => self.wind.apparent_angle,
            DisplayChannel::ApparentWindDirection => self.wind.apparent_direction,
            DisplayChannel::ApparentWindSpeed => wind_speed(self.wind.apparent_force),
            DisplayChannel::TrueWindAngle => self.wind.true_angle,
            DisplayChannel::TrueWindDirection => self.wind.true_direction,
            DisplayChannel::TrueWindSpeed => wind_speed(self.wind.true_force),
            DisplayChannel::CourseOverGround => self.gps.course_over_ground,
            DisplayChannel::SpeedOverGround => self.gps.speed_over_ground,
        }
    }

    pub fn to_json(&self) -> NavResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            hydro: HydroRecord {
                depth: Some(7.8),
                ..Default::default()
            },
            wind: WindRecord {
                true_force: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn display_slots_follow_panel_order() {
        let snapshot = sample();
        assert_eq!(snapshot.display_value(0), Some(7.8));
        assert_eq!(snapshot.display_value(1), None);
        assert_eq!(snapshot.display_value(9), Some(10.0));
        assert_eq!(snapshot.display_value(12), None);
    }

    #[test]
    fn wind_speed_converts_to_metres_per_second() {
        let snapshot = sample();
        let metric = snapshot
            .display_value_in(9, WindUnits::MetersPerSecond)
            .unwrap();
        assert!((metric - 5.14444444).abs() < 1e-6);
        assert_eq!(snapshot.display_value_in(6, WindUnits::MetersPerSecond), None);
        assert_eq!(snapshot.display_value_in(0, WindUnits::MetersPerSecond), Some(7.8));
    }

    #[test]
    fn json_round_trip_keeps_values() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
