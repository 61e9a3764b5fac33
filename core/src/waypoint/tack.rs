use crate::math::angle::{fold_symmetric, fold_to_180, fold_to_90, normalize};
use crate::math::geodesy::{LocalProjection, PlanarPoint};
use crate::prelude::{Coordinate, SailingState};
use crate::records::TackIntersection;

/// Velocity made good on course towards `target_bearing` while sailing `boat_course`.
pub fn vmc(speed: f64, target_bearing: f64, boat_course: f64) -> f64 {
    relative_vmc(speed, target_bearing - boat_course)
}

/// VMC for a bearing already expressed relative to the course.
pub fn relative_vmc(speed: f64, relative_bearing: f64) -> f64 {
    speed * fold_symmetric(relative_bearing).to_radians().cos()
}

/// Share of the best polar VMC of either tack, in percent, capped at 100.
pub fn vmc_performance(vmc: f64, polar_current: f64, polar_opposite: f64) -> f64 {
    let best = polar_current.abs().max(polar_opposite.abs());
    if best <= 0.0 {
        return 0.0;
    }
    (vmc.abs() / best * 100.0).min(100.0)
}

/// Course and mark bearing the boat would have after tacking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OppositeTack {
    pub course: f64,
    pub relative_bearing: f64,
}

/// Mirrors the current course about the wind: the new tack angle takes the opposite
/// sign of the current offset from the true wind direction.
pub fn opposite_tack(
    course_over_ground: f64,
    true_wind_direction: f64,
    tack_angle: f64,
    true_mark_bearing: f64,
) -> OppositeTack {
    let offset = fold_to_180(course_over_ground - true_wind_direction);
    let angle = if offset > 0.0 { -tack_angle } else { tack_angle };
    let course = normalize(true_wind_direction + angle);
    OppositeTack {
        course,
        relative_bearing: fold_to_180(true_mark_bearing - course),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TackState {
    pub current: TackIntersection,
    pub opposite: TackIntersection,
    pub next_sailing_state: SailingState,
    /// Signed angle from north to the opposite intersection, in (-180, 180].
    pub angle_to_opposite: f64,
}

/// Signed angle from `from` to `to`, positive counter-clockwise, in degrees.
fn signed_angle(from: PlanarPoint, to: PlanarPoint) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.x * to.x + from.y * to.y;
    cross.atan2(dot).to_degrees()
}

/// Decides which intersection belongs to the tack the boat is on.
///
/// Angles from north to each boat-to-intersection vector are folded to (-90, 90] and the
/// smaller one is the current tack. The unfolded angle to the other intersection is
/// compared with `threshold` to predict the state on the next leg.
pub fn tack_state(
    boat: Coordinate,
    first: TackIntersection,
    second: TackIntersection,
    threshold: f64,
) -> TackState {
    let projection = LocalProjection::new(boat);
    let north = PlanarPoint { x: 0.0, y: 1.0 };
    let angle_to = |corner: &TackIntersection| {
        fold_to_180(signed_angle(north, projection.project(corner.position)))
    };
    let first_angle = angle_to(&first);
    let second_angle = angle_to(&second);

    let (current, opposite, angle_to_opposite) =
        if fold_to_90(first_angle).abs() < fold_to_90(second_angle).abs() {
            (first, second, second_angle)
        } else {
            (second, first, first_angle)
        };
    let next_sailing_state = if angle_to_opposite.abs() > threshold {
        SailingState::Downwind
    } else {
        SailingState::Upwind
    };

    TackState {
        current,
        opposite,
        next_sailing_state,
        angle_to_opposite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TackSide;

    fn corner(side: TackSide, latitude: f64, longitude: f64) -> TackIntersection {
        TackIntersection {
            side,
            position: Coordinate::new(latitude, longitude),
            distance_from_boat: 1.0,
            distance_from_waypoint: 1.0,
        }
    }

    #[test]
    fn vmc_straight_at_the_mark_is_full_speed() {
        for bearing in [0.0, 45.0, 181.0, 359.0] {
            assert!((vmc(6.5, bearing, bearing) - 6.5).abs() < 1e-12);
        }
        assert!((vmc(6.0, 90.0, 0.0)).abs() < 1e-12);
        assert!((vmc(6.0, 180.0, 0.0) + 6.0).abs() < 1e-12);
        assert!((vmc(6.0, 350.0, 10.0) - 6.0 * 20f64.to_radians().cos()).abs() < 1e-12);
    }

    #[test]
    fn performance_is_bounded() {
        assert_eq!(vmc_performance(3.0, 0.0, 0.0), 0.0);
        assert_eq!(vmc_performance(-9.0, 4.0, 2.0), 100.0);
        assert!((vmc_performance(2.0, -4.0, 1.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_tack_mirrors_about_the_wind() {
        // wind from north, boat on 45: other tack is 315
        let tack = opposite_tack(45.0, 0.0, 45.0, 0.0);
        assert!((tack.course - 315.0).abs() < 1e-9);
        assert!((tack.relative_bearing - 45.0).abs() < 1e-9);

        let tack = opposite_tack(315.0, 0.0, 45.0, 0.0);
        assert!((tack.course - 45.0).abs() < 1e-9);
        assert!((tack.relative_bearing + 45.0).abs() < 1e-9);
    }

    #[test]
    fn closer_to_north_is_the_current_tack() {
        let boat = Coordinate::new(43.0, 28.0);
        // roughly 20 degrees east of north, and 60 degrees west of north
        let near_north = corner(TackSide::Starboard, 43.05, 28.0253);
        let off_west = corner(TackSide::Portside, 43.025, 27.9408);

        let state = tack_state(boat, near_north, off_west, 90.0);
        assert_eq!(state.current.side, TackSide::Starboard);
        assert_eq!(state.opposite.side, TackSide::Portside);
        // counter-clockwise positive: west of north is positive
        assert!((state.angle_to_opposite - 60.0).abs() < 1.0, "{}", state.angle_to_opposite);
        assert_eq!(state.next_sailing_state, SailingState::Upwind);

        let swapped = tack_state(boat, off_west, near_north, 90.0);
        assert_eq!(swapped.current.side, TackSide::Starboard);
    }

    #[test]
    fn astern_corner_folds_against_north() {
        let boat = Coordinate::new(43.0, 28.0);
        // about 170 degrees clockwise from north folds to 10 off the north-south line
        let astern = corner(TackSide::Starboard, 42.95, 28.012);
        let abeam = corner(TackSide::Portside, 43.02, 28.06);

        let state = tack_state(boat, abeam, astern, 80.0);
        assert_eq!(state.current.side, TackSide::Starboard);
        assert!(state.angle_to_opposite < -60.0);
        assert_eq!(state.next_sailing_state, SailingState::Upwind);

        let state = tack_state(boat, astern, abeam, 50.0);
        assert_eq!(state.current.side, TackSide::Starboard);
        assert_eq!(state.next_sailing_state, SailingState::Downwind);
    }
}
