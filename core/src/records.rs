//! Domain records. Every field stays `None` until a valid sentence supplies it and is
//! cleared only through `reset()`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prelude::{Coordinate, SailingState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompassRecord {
    pub raw_magnetic_heading: Option<f64>,
    pub raw_normalized_heading: Option<f64>,
    pub magnetic_heading: Option<f64>,
    pub normalized_heading: Option<f64>,
}

impl CompassRecord {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsRecord {
    pub is_valid: bool,
    pub is_target_selected: bool,

    pub raw_latitude: Option<f64>,
    pub raw_longitude: Option<f64>,
    pub raw_course_over_ground: Option<f64>,
    pub raw_speed_over_ground: Option<f64>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub course_over_ground: Option<f64>,
    pub speed_over_ground: Option<f64>,
    pub speed_over_ground_kmh: Option<f64>,
    pub utc_time: Option<NaiveTime>,
    pub utc_date: Option<NaiveDate>,

    pub waypoint_name: Option<String>,
    pub waypoint: Option<Coordinate>,
}

impl GpsRecord {
    /// Filtered boat position, once both axes are known.
    pub fn position(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn clear_target(&mut self) {
        self.is_target_selected = false;
        self.waypoint_name = None;
        self.waypoint = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydroRecord {
    pub raw_depth: Option<f64>,
    pub raw_sea_temperature: Option<f64>,
    pub raw_speed_through_water: Option<f64>,

    pub depth: Option<f64>,
    pub sea_temperature: Option<f64>,
    pub speed_through_water: Option<f64>,
    pub speed_log_calibration: Option<f64>,

    pub total_distance: Option<f64>,
    pub distance_since_reset: Option<f64>,
    pub depth_alarm: bool,
}

impl HydroRecord {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindRecord {
    pub raw_apparent_angle: Option<f64>,
    pub raw_apparent_force: Option<f64>,
    pub raw_apparent_direction: Option<f64>,
    pub raw_true_angle: Option<f64>,
    pub raw_true_force: Option<f64>,
    pub raw_true_direction: Option<f64>,

    pub apparent_angle: Option<f64>,
    pub apparent_force: Option<f64>,
    pub apparent_direction: Option<f64>,
    pub true_angle: Option<f64>,
    pub true_force: Option<f64>,
    pub true_direction: Option<f64>,

    pub last_updated: Option<DateTime<Utc>>,
}

impl WindRecord {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarResult {
    pub target_speed: Option<f64>,
    pub target_vmg: Option<f64>,

    pub vmg_over_ground: Option<f64>,
    pub vmg_over_ground_performance: Option<f64>,
    pub vmg_through_water: Option<f64>,
    pub vmg_through_water_performance: Option<f64>,
    pub speed_performance_over_ground: Option<f64>,
    pub speed_performance_through_water: Option<f64>,

    pub optimal_up_twa: Option<f64>,
    pub optimal_down_twa: Option<f64>,
    pub max_up_vmg: Option<f64>,
    pub max_down_vmg: Option<f64>,
    pub sailing_state: Option<SailingState>,
    pub sailing_state_limit: Option<f64>,
}

impl PolarResult {
    /// Tack angle that applies to the current sailing state.
    pub fn optimal_tack_angle(&self) -> Option<f64> {
        match self.sailing_state? {
            SailingState::Upwind => self.optimal_up_twa,
            SailingState::Downwind => self.optimal_down_twa,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Straight segment between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layline {
    pub start: Coordinate,
    pub end: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TackSide {
    Starboard,
    Portside,
}

impl fmt::Display for TackSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TackSide::Starboard => f.write_str("Starboard"),
            TackSide::Portside => f.write_str("Portside"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TackIntersection {
    pub side: TackSide,
    pub position: Coordinate,
    pub distance_from_boat: f64,
    pub distance_from_waypoint: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointResult {
    pub waypoint: Option<Coordinate>,
    pub distance_to_mark: Option<f64>,
    pub true_mark_bearing: Option<f64>,
    pub trip_duration_hours: Option<f64>,
    pub eta: Option<DateTime<Utc>>,

    pub current_tack: Option<TackSide>,
    pub opposite_tack: Option<TackSide>,
    pub next_sailing_state: Option<SailingState>,
    pub current_tack_relative_bearing: Option<f64>,
    pub opposite_tack_relative_bearing: Option<f64>,

    pub current_tack_vmc: Option<f64>,
    pub current_tack_vmc_display: Option<f64>,
    pub current_tack_vmc_performance: Option<f64>,
    pub opposite_tack_vmc: Option<f64>,
    pub opposite_tack_vmc_display: Option<f64>,
    pub opposite_tack_vmc_performance: Option<f64>,
    pub polar_vmc: Option<f64>,
    pub max_tack_polar_vmc: Option<f64>,

    pub current_tack_distance_nm: Option<f64>,
    pub current_tack_duration_hours: Option<f64>,
    pub opposite_tack_distance_nm: Option<f64>,
    pub opposite_tack_duration_hours: Option<f64>,

    pub starboard_layline: Option<Layline>,
    pub portside_layline: Option<Layline>,
    pub extended_starboard_layline: Option<Layline>,
    pub extended_portside_layline: Option<Layline>,
    pub starboard_intersection: Option<TackIntersection>,
    pub portside_intersection: Option<TackIntersection>,

    pub is_moving_away: bool,
}

impl WaypointResult {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_position_requires_both_axes() {
        let mut gps = GpsRecord {
            latitude: Some(43.1),
            ..Default::default()
        };
        assert!(gps.position().is_none());
        gps.longitude = Some(27.9);
        assert_eq!(gps.position(), Some(Coordinate::new(43.1, 27.9)));
    }

    #[test]
    fn clearing_target_keeps_position() {
        let mut gps = GpsRecord {
            latitude: Some(43.1),
            longitude: Some(27.9),
            is_target_selected: true,
            waypoint_name: Some("Mark".into()),
            waypoint: Some(Coordinate::new(43.2, 28.0)),
            ..Default::default()
        };
        gps.clear_target();
        assert!(!gps.is_target_selected);
        assert!(gps.waypoint.is_none());
        assert!(gps.position().is_some());
    }

    #[test]
    fn optimal_tack_angle_follows_state() {
        let mut polar = PolarResult {
            optimal_up_twa: Some(42.0),
            optimal_down_twa: Some(150.0),
            sailing_state: Some(SailingState::Upwind),
            ..Default::default()
        };
        assert_eq!(polar.optimal_tack_angle(), Some(42.0));
        polar.sailing_state = Some(SailingState::Downwind);
        assert_eq!(polar.optimal_tack_angle(), Some(150.0));
        polar.reset();
        assert_eq!(polar.optimal_tack_angle(), None);
    }
}
