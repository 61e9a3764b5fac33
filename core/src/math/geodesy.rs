//! Spherical-earth geodesy and a local planar projection for short-range geometry.

use crate::math::angle::normalize;
use crate::prelude::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const METERS_TO_NAUTICAL_MILES: f64 = 0.000_539_956_803;
pub const KNOTS_TO_KMH: f64 = 1.852;
pub const KNOTS_TO_METERS_PER_SECOND: f64 = 0.514_444_444;

/// Great-circle distance in metres (haversine).
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing in [0, 360).
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let x = lat2.cos() * d_lon.sin();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    normalize(x.atan2(y).to_degrees())
}

/// Point reached from `start` after `distance_m` metres on the initial `bearing_deg`.
pub fn destination(start: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let angular = distance_m / EARTH_RADIUS_M;
    let bearing = bearing_deg.to_radians();
    let lat1 = start.latitude.to_radians();
    let lon1 = start.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Planar point in metres: `x` east, `y` north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn distance_to(&self, other: PlanarPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Equirectangular projection centred on an origin.
///
/// Distances stay within a fraction of a percent of the great-circle value for points
/// a few tens of kilometres from the origin at mid latitudes; the error grows with range
/// and towards the poles, so use it only for layline-scale geometry.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Coordinate,
    cos_lat: f64,
}

impl LocalProjection {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            cos_lat: origin.latitude.to_radians().cos(),
        }
    }

    pub fn project(&self, point: Coordinate) -> PlanarPoint {
        let d_lon = (point.longitude - self.origin.longitude).to_radians();
        let d_lat = (point.latitude - self.origin.latitude).to_radians();
        PlanarPoint {
            x: EARTH_RADIUS_M * d_lon * self.cos_lat,
            y: EARTH_RADIUS_M * d_lat,
        }
    }

    pub fn unproject(&self, point: PlanarPoint) -> Coordinate {
        let latitude = self.origin.latitude + (point.y / EARTH_RADIUS_M).to_degrees();
        let longitude =
            self.origin.longitude + (point.x / (EARTH_RADIUS_M * self.cos_lat)).to_degrees();
        Coordinate::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_minute_of_latitude_is_one_nautical_mile() {
        let a = Coordinate::new(43.0, 28.0);
        let b = Coordinate::new(43.0 + 1.0 / 60.0, 28.0);
        let nm = distance(a, b) * METERS_TO_NAUTICAL_MILES;
        assert!((nm - 1.0).abs() < 0.01, "{nm}");
        assert!(bearing(a, b) < 1e-9 || bearing(a, b) > 359.999);
    }

    #[test]
    fn bearing_due_east_and_west() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn destination_round_trips_distance_and_bearing() {
        let start = Coordinate::new(43.18447, 27.99403);
        let end = destination(start, 45.0, 5_000.0);
        assert!((distance(start, end) - 5_000.0).abs() < 0.5);
        assert!((bearing(start, end) - 45.0).abs() < 0.01);
    }

    #[test]
    fn projection_matches_great_circle_at_short_range() {
        let origin = Coordinate::new(43.18447, 27.99403);
        let projection = LocalProjection::new(origin);
        let target = destination(origin, 120.0, 3_000.0);
        let planar = projection.project(target);
        let planar_distance = PlanarPoint { x: 0.0, y: 0.0 }.distance_to(planar);
        assert!((planar_distance - 3_000.0).abs() < 3.0);
        let back = projection.unproject(planar);
        assert!((back.latitude - target.latitude).abs() < 1e-9);
        assert!((back.longitude - target.longitude).abs() < 1e-9);
    }
}
