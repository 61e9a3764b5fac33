use serde::{Deserialize, Serialize};

use crate::math::angle::fold_to_180;
use crate::math::spline::{cubic_spline, stencil_indices};
use crate::performance::polar::bracket;
use crate::performance::table::{columns, TackTable};
use crate::prelude::SailingState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TackRow {
    pub wind_speed: f64,
    pub optimal_up_twa: f64,
    pub optimal_down_twa: f64,
    pub max_up_vmg: f64,
    pub max_down_vmg: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TackInterpolation {
    pub row: TackRow,
    pub sailing_state: SailingState,
    /// Threshold the state was decided against.
    pub state_limit: f64,
}

/// Upwind while the folded true wind angle is within the threshold.
pub fn sailing_state(true_wind_angle: f64, threshold: f64) -> SailingState {
    if fold_to_180(true_wind_angle).abs() <= threshold {
        SailingState::Upwind
    } else {
        SailingState::Downwind
    }
}

impl TackTable {
    fn row_at(&self, index: usize) -> TackRow {
        let row = self.rows.row(index);
        TackRow {
            wind_speed: row[columns::WIND_SPEED],
            optimal_up_twa: row[columns::OPTIMAL_UP_TWA],
            optimal_down_twa: row[columns::OPTIMAL_DOWN_TWA],
            max_up_vmg: row[columns::MAX_UP_VMG],
            max_down_vmg: row[columns::MAX_DOWN_VMG],
            threshold: row[self.threshold_column()],
        }
    }

    /// Interpolates the table at `wind_speed` and classifies `true_wind_angle`.
    ///
    /// Outside the table the nearest edge row is returned and the state is decided
    /// against the first row's threshold. Returns `None` for an empty table.
    pub fn interpolate(&self, wind_speed: f64, true_wind_angle: f64) -> Option<TackInterpolation> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let first = self.row_at(0);
        let last = self.row_at(len - 1);

        if len == 1 || wind_speed <= first.wind_speed || wind_speed >= last.wind_speed {
            let row = if wind_speed >= last.wind_speed { last } else { first };
            return Some(TackInterpolation {
                row,
                sailing_state: sailing_state(true_wind_angle, first.threshold),
                state_limit: first.threshold,
            });
        }

        let speeds = self.rows.column(columns::WIND_SPEED).to_vec();
        let position = bracket(&speeds, wind_speed)?;
        let indices = stencil_indices(position.lower, len);
        let column = |index: usize| {
            let stencil = indices.map(|row| self.rows[[row, index]]);
            cubic_spline(position.u, stencil).unwrap_or(0.0)
        };

        let row = TackRow {
            wind_speed,
            optimal_up_twa: column(columns::OPTIMAL_UP_TWA),
            optimal_down_twa: column(columns::OPTIMAL_DOWN_TWA),
            max_up_vmg: column(columns::MAX_UP_VMG),
            max_down_vmg: column(columns::MAX_DOWN_VMG),
            threshold: column(self.threshold_column()),
        };
        Some(TackInterpolation {
            row,
            sailing_state: sailing_state(true_wind_angle, row.threshold),
            state_limit: row.threshold,
        })
    }
}
