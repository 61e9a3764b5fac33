use crate::math::angle::fold_symmetric;
use crate::math::spline::{cubic_spline, stencil_indices};
use crate::performance::table::PolarDiagram;

/// Bracketing pair of a query inside a sorted breakpoint list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bracket {
    pub lower: usize,
    pub u: f64,
}

/// Locates `value` between breakpoints. Values at or above the top breakpoint clamp to
/// the last pair with `u = 1`; values below the first breakpoint have no bracket.
pub(crate) fn bracket(breakpoints: &[f64], value: f64) -> Option<Bracket> {
    let len = breakpoints.len();
    if len < 2 || value < breakpoints[0] {
        return None;
    }
    let upper = breakpoints
        .iter()
        .position(|&breakpoint| breakpoint > value)
        .unwrap_or(len - 1)
        .max(1);
    let lower = upper - 1;
    let span = breakpoints[upper] - breakpoints[lower];
    let u = ((value - breakpoints[lower]) / span).clamp(0.0, 1.0);
    Some(Bracket { lower, u })
}

impl PolarDiagram {
    /// Target boat speed for a true wind force and angle.
    ///
    /// The angle is folded onto [0, 180]. Forces at or below the lowest breakpoint and
    /// angles below the first angle breakpoint give 0.
    pub fn evaluate(&self, wind_force: f64, wind_angle: f64) -> f64 {
        if wind_force <= self.wind[0] {
            return 0.0;
        }
        let angle = fold_symmetric(wind_angle);
        let (Some(force), Some(angle)) = (
            bracket(&self.wind, wind_force),
            bracket(&self.angles, angle),
        ) else {
            return 0.0;
        };

        let columns = stencil_indices(force.lower, self.wind.len());
        let rows = stencil_indices(angle.lower, self.angles.len());

        let mut along_wind = [0.0; 4];
        for (slot, &row) in along_wind.iter_mut().zip(rows.iter()) {
            let stencil = columns.map(|column| self.speeds[[row, column]]);
            *slot = cubic_spline(force.u, stencil).unwrap_or(0.0);
        }
        cubic_spline(angle.u, along_wind).unwrap_or(0.0)
    }
}
