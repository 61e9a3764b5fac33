use crate::performance::table::{PolarDiagram, TackTable};
use crate::prelude::{NavError, NavResult};
use crate::records::{GpsRecord, HydroRecord, PolarResult, WindRecord};
use crate::telemetry::log::LogManager;

/// Performance ratio in percent, capped at 100 and 0 when there is nothing to compare to.
pub fn performance_ratio(current: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    (current / max * 100.0).clamp(0.0, 100.0)
}

/// Velocity made good along the wind axis.
pub fn vmg(speed: f64, true_wind_angle: f64) -> f64 {
    speed * true_wind_angle.to_radians().cos()
}

/// Target speed, target VMG, tack angles and sailing state from the polar data.
///
/// Without a polar diagram the engine stays uninitialised and produces nothing. The tack
/// table is optional: without it the tack-related fields stay empty.
pub struct VmgEngine {
    polar: Option<PolarDiagram>,
    tack_table: Option<TackTable>,
    result: PolarResult,
    logger: LogManager,
}

impl VmgEngine {
    pub fn new(polar: Option<PolarDiagram>, tack_table: Option<TackTable>) -> Self {
        Self {
            polar,
            tack_table,
            result: PolarResult::default(),
            logger: LogManager::new("vmg"),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.polar.is_some()
    }

    pub fn set_polar(&mut self, polar: PolarDiagram) {
        self.polar = Some(polar);
    }

    pub fn set_tack_table(&mut self, table: TackTable) {
        self.tack_table = Some(table);
    }

    pub fn result(&self) -> &PolarResult {
        &self.result
    }

    pub fn reset(&mut self) {
        self.result.reset();
    }

    /// Recomputes the result from the latest records. On error the previous result is
    /// kept.
    pub fn compute(
        &mut self,
        wind: &WindRecord,
        gps: &GpsRecord,
        hydro: &HydroRecord,
    ) -> NavResult<&PolarResult> {
        let polar = self.polar.as_ref().ok_or(NavError::PolarUnavailable)?;
        let force = wind.true_force.ok_or(NavError::MissingInput("true wind force"))?;
        let angle = wind.true_angle.ok_or(NavError::MissingInput("true wind angle"))?;

        let target_speed = polar.evaluate(force, angle);
        let target_vmg = vmg(target_speed, angle);
        let mut result = PolarResult {
            target_speed: Some(target_speed),
            target_vmg: Some(target_vmg),
            ..Default::default()
        };

        if let Some(sog) = gps.speed_over_ground {
            let made_good = vmg(sog, angle).abs();
            result.vmg_over_ground = Some(made_good);
            result.vmg_over_ground_performance =
                Some(performance_ratio(made_good, target_vmg.abs()));
            result.speed_performance_over_ground = Some(performance_ratio(sog, target_speed));
        }
        if let Some(stw) = hydro.speed_through_water {
            let made_good = vmg(stw, angle).abs();
            result.vmg_through_water = Some(made_good);
            result.vmg_through_water_performance =
                Some(performance_ratio(made_good, target_vmg.abs()));
            result.speed_performance_through_water = Some(performance_ratio(stw, target_speed));
        }

        match self
            .tack_table
            .as_ref()
            .and_then(|table| table.interpolate(force, angle))
        {
            Some(tack) => {
                result.optimal_up_twa = Some(tack.row.optimal_up_twa);
                result.optimal_down_twa = Some(tack.row.optimal_down_twa);
                result.max_up_vmg = Some(tack.row.max_up_vmg);
                result.max_down_vmg = Some(tack.row.max_down_vmg);
                result.sailing_state = Some(tack.sailing_state);
                result.sailing_state_limit = Some(tack.state_limit);
            }
            None => self.logger.debug("no tack data for this cycle"),
        }

        self.result = result;
        Ok(&self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::SailingState;

    fn engine() -> VmgEngine {
        let polar = PolarDiagram::parse(
            "TWA 4 6 8 10 12\n30 2 3 4 5 6\n60 2 3 4 5 6\n90 2 3 4 5 6\n120 2 3 4 5 6\n",
        )
        .unwrap();
        let tack = TackTable::parse(
            "TWS UpTWA DnTWA UpSpd DnSpd UpVMG DnVMG Limit\n\
             6 44 150 4.0 4.5 2.9 3.9 90\n\
             8 42 155 5.0 5.5 3.7 5.0 92\n\
             10 40 160 6.0 6.5 4.6 6.1 94\n\
             12 38 165 7.0 7.5 5.5 7.2 96\n",
        )
        .unwrap();
        VmgEngine::new(Some(polar), Some(tack))
    }

    fn wind(force: f64, angle: f64) -> WindRecord {
        WindRecord {
            true_force: Some(force),
            true_angle: Some(angle),
            ..Default::default()
        }
    }

    #[test]
    fn vmg_of_a_straight_course_is_the_speed() {
        assert!((vmg(6.0, 0.0) - 6.0).abs() < 1e-12);
        assert!(vmg(6.0, 90.0).abs() < 1e-12);
        assert!((vmg(6.0, 180.0) + 6.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_clamped_and_safe() {
        assert_eq!(performance_ratio(5.0, 0.0), 0.0);
        assert_eq!(performance_ratio(12.0, 6.0), 100.0);
        assert!((performance_ratio(3.0, 6.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn computes_target_and_tack_data() {
        let mut engine = engine();
        let gps = GpsRecord {
            speed_over_ground: Some(1.75),
            ..Default::default()
        };
        let hydro = HydroRecord {
            speed_through_water: Some(3.5),
            ..Default::default()
        };
        let result = engine.compute(&wind(7.0, 60.0), &gps, &hydro).unwrap().clone();

        let target = result.target_speed.unwrap();
        assert!((target - 3.5).abs() < 1e-9);
        assert!((result.target_vmg.unwrap() - 1.75).abs() < 1e-9);
        assert!((result.speed_performance_through_water.unwrap() - 100.0).abs() < 1e-9);
        assert!((result.speed_performance_over_ground.unwrap() - 50.0).abs() < 1e-9);
        assert!((result.vmg_over_ground_performance.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(result.sailing_state, Some(SailingState::Upwind));
        assert_eq!(result.optimal_tack_angle(), result.optimal_up_twa);
    }

    #[test]
    fn missing_inputs_keep_previous_result() {
        let mut engine = engine();
        let gps = GpsRecord::default();
        let hydro = HydroRecord::default();
        engine.compute(&wind(7.0, 150.0), &gps, &hydro).unwrap();
        let before = engine.result().clone();

        assert!(matches!(
            engine.compute(&WindRecord::default(), &gps, &hydro),
            Err(NavError::MissingInput(_))
        ));
        assert_eq!(engine.result(), &before);
        assert_eq!(before.sailing_state, Some(SailingState::Downwind));
    }

    #[test]
    fn without_polar_nothing_is_produced() {
        let mut engine = VmgEngine::new(None, None);
        assert!(!engine.is_initialized());
        assert!(matches!(
            engine.compute(&wind(7.0, 60.0), &GpsRecord::default(), &HydroRecord::default()),
            Err(NavError::PolarUnavailable)
        ));
        assert_eq!(engine.result(), &PolarResult::default());
    }
}
