//! Layline diamond between the boat and the mark, and its tack intersections.

use crate::math::angle::normalize;
use crate::math::geodesy::{destination, distance, LocalProjection, PlanarPoint};
use crate::prelude::Coordinate;
use crate::records::{Layline, TackIntersection, TackSide};

/// Laylines are drawn this many times the boat-to-mark distance.
pub const LAYLINE_STRETCH: f64 = 1.5;

/// Ray of `length` metres from `start` on `bearing`.
pub fn layline(start: Coordinate, bearing: f64, length: f64) -> Layline {
    Layline {
        start,
        end: destination(start, normalize(bearing), length),
    }
}

/// The four laylines: two from the boat on either tack and two reaching back from the
/// mark on the reciprocal bearings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diamond {
    pub starboard: Layline,
    pub portside: Layline,
    pub extended_starboard: Layline,
    pub extended_portside: Layline,
    pub length: f64,
}

impl Diamond {
    pub fn new(
        boat: Coordinate,
        waypoint: Coordinate,
        true_wind_direction: f64,
        tack_angle: f64,
        boat_to_waypoint: f64,
    ) -> Self {
        let length = boat_to_waypoint * LAYLINE_STRETCH;
        let starboard_bearing = true_wind_direction + tack_angle;
        let portside_bearing = true_wind_direction - tack_angle;
        Self {
            starboard: layline(boat, starboard_bearing, length),
            portside: layline(boat, portside_bearing, length),
            extended_starboard: layline(waypoint, starboard_bearing + 180.0, length),
            extended_portside: layline(waypoint, portside_bearing + 180.0, length),
            length,
        }
    }

    /// Tack intersections found from the boat's point of view: the starboard layline
    /// meets the mark's extended portside one and vice versa. Either may be missing.
    pub fn intersections(&self, boat: Coordinate, waypoint: Coordinate) -> Vec<TackIntersection> {
        let projection = LocalProjection::new(boat);
        let pairs = [
            (TackSide::Starboard, self.starboard, self.extended_portside),
            (TackSide::Portside, self.portside, self.extended_starboard),
        ];
        pairs
            .into_iter()
            .filter_map(|(side, from_boat, from_mark)| {
                let position = intersect(&projection, from_boat, from_mark, self.length)?;
                Some(TackIntersection {
                    side,
                    position,
                    distance_from_boat: distance(boat, position),
                    distance_from_waypoint: distance(waypoint, position),
                })
            })
            .collect()
    }
}

/// Line through two planar points as `a·x + b·y = c`, with `(a, b)` of unit length so
/// the determinant of two lines is the sine of the angle between them.
#[derive(Debug, Clone, Copy)]
struct Line {
    a: f64,
    b: f64,
    c: f64,
}

impl Line {
    fn through(p: PlanarPoint, q: PlanarPoint) -> Option<Self> {
        let length = p.distance_to(q);
        if length <= 0.0 {
            return None;
        }
        let a = (q.y - p.y) / length;
        let b = (p.x - q.x) / length;
        Some(Self {
            a,
            b,
            c: a * p.x + b * p.y,
        })
    }
}

/// Crossing point of two segments in the local plane.
///
/// Parallel lines, crossings outside either segment and crossings farther than
/// `max_distance` from either segment start yield `None`.
pub fn intersect(
    projection: &LocalProjection,
    first: Layline,
    second: Layline,
    max_distance: f64,
) -> Option<Coordinate> {
    let (p1, p2) = (projection.project(first.start), projection.project(first.end));
    let (p3, p4) = (projection.project(second.start), projection.project(second.end));
    let l1 = Line::through(p1, p2)?;
    let l2 = Line::through(p3, p4)?;

    let determinant = l1.a * l2.b - l2.a * l1.b;
    if determinant.abs() < f64::EPSILON {
        return None;
    }
    let crossing = PlanarPoint {
        x: (l2.b * l1.c - l1.b * l2.c) / determinant,
        y: (l1.a * l2.c - l2.a * l1.c) / determinant,
    };

    let within = |start: PlanarPoint, end: PlanarPoint| {
        let length = start.distance_to(end);
        start.distance_to(crossing) <= length && end.distance_to(crossing) <= length
    };
    if !within(p1, p2) || !within(p3, p4) {
        return None;
    }
    if p1.distance_to(crossing) > max_distance || p3.distance_to(crossing) > max_distance {
        return None;
    }
    Some(projection.unproject(crossing))
}
