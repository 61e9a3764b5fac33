use chrono::{DateTime, Duration, Utc};

use crate::math::angle::{fold_to_180, normalize};
use crate::math::geodesy::{bearing, distance, METERS_TO_NAUTICAL_MILES};
use crate::prelude::{NavError, NavResult};
use crate::processing::angle_buffer::AngleBuffer;
use crate::records::{GpsRecord, PolarResult, TackSide, WaypointResult, WindRecord};
use crate::telemetry::log::LogManager;
use crate::waypoint::layline::Diamond;
use crate::waypoint::tack::{opposite_tack, relative_vmc, tack_state, vmc_performance};

/// VMC at or below this counts as no progress towards the mark.
const MIN_PROGRESS_KNOTS: f64 = 1e-9;

/// Bearing, distance, laylines and tack comparison towards the selected mark.
pub struct WaypointEngine {
    bearing_buffer: AngleBuffer,
    result: WaypointResult,
    logger: LogManager,
}

impl WaypointEngine {
    pub fn new() -> Self {
        Self {
            bearing_buffer: AngleBuffer::new(),
            result: WaypointResult::default(),
            logger: LogManager::new("waypoint"),
        }
    }

    pub fn result(&self) -> &WaypointResult {
        &self.result
    }

    pub fn reset(&mut self) {
        self.result.reset();
        self.bearing_buffer.reset();
    }

    /// Recomputes the whole result. Any missing input or degenerate geometry returns an
    /// error and leaves the previous result in place.
    pub fn compute(
        &mut self,
        gps: &GpsRecord,
        wind: &WindRecord,
        polar: &PolarResult,
        now: DateTime<Utc>,
    ) -> NavResult<&WaypointResult> {
        if !gps.is_target_selected {
            return Err(NavError::MissingInput("selected target"));
        }
        let waypoint = gps.waypoint.ok_or(NavError::MissingInput("waypoint"))?;
        let boat = gps.position().ok_or(NavError::MissingInput("boat position"))?;
        let cog = gps
            .course_over_ground
            .ok_or(NavError::MissingInput("course over ground"))?;
        let sog = gps
            .speed_over_ground
            .ok_or(NavError::MissingInput("speed over ground"))?;
        let twd = wind
            .true_direction
            .ok_or(NavError::MissingInput("true wind direction"))?;
        let target_speed = polar
            .target_speed
            .ok_or(NavError::MissingInput("target speed"))?;
        let tack_angle = polar
            .optimal_tack_angle()
            .ok_or(NavError::MissingInput("optimal tack angle"))?;
        let threshold = polar
            .sailing_state_limit
            .ok_or(NavError::MissingInput("sailing state limit"))?;

        let distance_to_mark = distance(boat, waypoint);
        let true_mark_bearing = bearing(boat, waypoint);
        let relative_bearing =
            fold_to_180(self.bearing_buffer.push(normalize(true_mark_bearing - cog)));
        let opposite = opposite_tack(cog, twd, tack_angle, true_mark_bearing);

        let current_vmc = relative_vmc(sog, relative_bearing);
        let opposite_vmc = relative_vmc(sog, opposite.relative_bearing);
        let polar_current = relative_vmc(target_speed, relative_bearing).abs();
        let polar_opposite = relative_vmc(target_speed, opposite.relative_bearing).abs();

        let distance_nm = distance_to_mark * METERS_TO_NAUTICAL_MILES;
        let trip_duration_hours =
            (current_vmc > MIN_PROGRESS_KNOTS).then(|| distance_nm / current_vmc);
        let eta = trip_duration_hours
            .and_then(|hours| Duration::try_milliseconds((hours * 3_600_000.0) as i64))
            .and_then(|span| now.checked_add_signed(span));

        let diamond = Diamond::new(boat, waypoint, twd, tack_angle, distance_to_mark);
        let intersections = diamond.intersections(boat, waypoint);
        let &[first, second] = intersections.as_slice() else {
            self.logger.debug(&format!(
                "{} tack intersections, keeping previous result",
                intersections.len()
            ));
            return Err(NavError::DegenerateGeometry(format!(
                "expected 2 tack intersections, found {}",
                intersections.len()
            )));
        };
        let state = tack_state(boat, first, second, threshold);
        let leg_hours =
            |metres: f64| (sog > 0.0).then(|| metres * METERS_TO_NAUTICAL_MILES / sog);

        let by_side =
            |side: TackSide| [first, second].into_iter().find(|corner| corner.side == side);

        self.result = WaypointResult {
            waypoint: Some(waypoint),
            distance_to_mark: Some(distance_to_mark),
            true_mark_bearing: Some(true_mark_bearing),
            trip_duration_hours,
            eta,
            current_tack: Some(state.current.side),
            opposite_tack: Some(state.opposite.side),
            next_sailing_state: Some(state.next_sailing_state),
            current_tack_relative_bearing: Some(relative_bearing),
            opposite_tack_relative_bearing: Some(opposite.relative_bearing),
            current_tack_vmc: Some(current_vmc),
            current_tack_vmc_display: Some(current_vmc.abs()),
            current_tack_vmc_performance: Some(vmc_performance(
                current_vmc,
                polar_current,
                polar_opposite,
            )),
            opposite_tack_vmc: Some(opposite_vmc),
            opposite_tack_vmc_display: Some(opposite_vmc.abs()),
            opposite_tack_vmc_performance: Some(vmc_performance(
                opposite_vmc,
                polar_current,
                polar_opposite,
            )),
            polar_vmc: Some(polar_current),
            max_tack_polar_vmc: Some(polar_current.max(polar_opposite)),
            current_tack_distance_nm: Some(
                state.current.distance_from_boat * METERS_TO_NAUTICAL_MILES,
            ),
            current_tack_duration_hours: leg_hours(state.current.distance_from_boat),
            opposite_tack_distance_nm: Some(
                state.opposite.distance_from_boat * METERS_TO_NAUTICAL_MILES,
            ),
            opposite_tack_duration_hours: leg_hours(state.opposite.distance_from_boat),
            starboard_layline: Some(diamond.starboard),
            portside_layline: Some(diamond.portside),
            extended_starboard_layline: Some(diamond.extended_starboard),
            extended_portside_layline: Some(diamond.extended_portside),
            starboard_intersection: by_side(TackSide::Starboard),
            portside_intersection: by_side(TackSide::Portside),
            is_moving_away: current_vmc < 0.0,
        };
        Ok(&self.result)
    }
}

impl Default for WaypointEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{Coordinate, SailingState};

    fn gps(cog: f64, sog: f64) -> GpsRecord {
        GpsRecord {
            latitude: Some(43.0),
            longitude: Some(28.0),
            course_over_ground: Some(cog),
            speed_over_ground: Some(sog),
            is_target_selected: true,
            waypoint_name: Some("Windward".into()),
            waypoint: Some(Coordinate::new(43.1, 28.0)),
            ..Default::default()
        }
    }

    fn wind_from_north() -> WindRecord {
        WindRecord {
            true_direction: Some(0.0),
            ..Default::default()
        }
    }

    fn upwind_polar() -> PolarResult {
        PolarResult {
            target_speed: Some(6.0),
            optimal_up_twa: Some(45.0),
            optimal_down_twa: Some(150.0),
            sailing_state: Some(SailingState::Upwind),
            sailing_state_limit: Some(90.0),
            ..Default::default()
        }
    }

    #[test]
    fn beating_to_a_windward_mark() {
        let mut engine = WaypointEngine::new();
        let now = Utc::now();
        let result = engine
            .compute(&gps(45.0, 6.0), &wind_from_north(), &upwind_polar(), now)
            .unwrap()
            .clone();

        let expected_vmc = 6.0 * 45f64.to_radians().cos();
        assert!((result.distance_to_mark.unwrap() - 11_119.49).abs() < 1.0);
        assert!(result.true_mark_bearing.unwrap() < 1e-6);
        assert!((result.current_tack_relative_bearing.unwrap() + 45.0).abs() < 1e-6);
        assert!((result.current_tack_vmc.unwrap() - expected_vmc).abs() < 1e-6);
        assert!((result.opposite_tack_vmc.unwrap() - expected_vmc).abs() < 1e-6);
        assert!((result.current_tack_vmc_performance.unwrap() - 100.0).abs() < 1e-6);
        // corners sit symmetrically either side of north, so only their pairing is fixed
        assert!(result.current_tack.is_some());
        assert_ne!(result.current_tack, result.opposite_tack);
        assert!(!result.is_moving_away);

        let hours = result.trip_duration_hours.unwrap();
        assert!((hours - 11_119.49 * METERS_TO_NAUTICAL_MILES / expected_vmc).abs() < 1e-3);
        assert!(result.eta.unwrap() > now);

        let leg = result.current_tack_distance_nm.unwrap();
        assert!((leg - 4.24).abs() < 0.05, "{leg}");
        assert!((result.current_tack_duration_hours.unwrap() - leg / 6.0).abs() < 1e-9);
        assert!(result.starboard_intersection.is_some());
        assert!(result.portside_intersection.is_some());
    }

    #[test]
    fn sailing_away_has_no_eta() {
        let mut engine = WaypointEngine::new();
        let result = engine
            .compute(&gps(180.0, 5.0), &wind_from_north(), &upwind_polar(), Utc::now())
            .unwrap()
            .clone();
        assert!(result.is_moving_away);
        assert!(result.trip_duration_hours.is_none());
        assert!(result.eta.is_none());
        assert!((result.current_tack_vmc_display.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn reaching_across_the_mark_has_no_eta() {
        let mut engine = WaypointEngine::new();
        let result = engine
            .compute(&gps(90.0, 6.0), &wind_from_north(), &upwind_polar(), Utc::now())
            .unwrap()
            .clone();
        assert!(result.current_tack_vmc.unwrap().abs() < 1e-9);
        assert!(result.trip_duration_hours.is_none());
        assert!(result.eta.is_none());
    }

    #[test]
    fn barely_closing_keeps_eta_within_range() {
        let mut engine = WaypointEngine::new();
        let result = engine
            .compute(&gps(89.99999, 6.0), &wind_from_north(), &upwind_polar(), Utc::now())
            .unwrap()
            .clone();
        assert!(result.current_tack_vmc.unwrap() > MIN_PROGRESS_KNOTS);
        assert!(result.trip_duration_hours.unwrap() > 1_000.0);
        assert!(result.eta.is_some());
    }

    #[test]
    fn boat_on_the_mark_is_degenerate() {
        let mut engine = WaypointEngine::new();
        let mut on_mark = gps(45.0, 6.0);
        on_mark.waypoint = Some(Coordinate::new(43.0, 28.0));
        assert!(matches!(
            engine.compute(&on_mark, &wind_from_north(), &upwind_polar(), Utc::now()),
            Err(NavError::DegenerateGeometry(_))
        ));
        assert_eq!(engine.result(), &WaypointResult::default());
    }

    #[test]
    fn missing_inputs_and_degenerate_geometry_keep_previous_result() {
        let mut engine = WaypointEngine::new();
        let now = Utc::now();
        engine
            .compute(&gps(45.0, 6.0), &wind_from_north(), &upwind_polar(), now)
            .unwrap();
        let before = engine.result().clone();

        let mut no_target = gps(45.0, 6.0);
        no_target.clear_target();
        assert!(matches!(
            engine.compute(&no_target, &wind_from_north(), &upwind_polar(), now),
            Err(NavError::MissingInput(_))
        ));

        let flat = PolarResult {
            optimal_up_twa: Some(0.0),
            ..upwind_polar()
        };
        assert!(matches!(
            engine.compute(&gps(45.0, 6.0), &wind_from_north(), &flat, now),
            Err(NavError::DegenerateGeometry(_))
        ));
        assert_eq!(engine.result(), &before);

        engine.reset();
        assert_eq!(engine.result(), &WaypointResult::default());
    }
}
