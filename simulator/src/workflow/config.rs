use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use log::warn;
use navcore::performance::{PolarDiagram, TackTable};
use navcore::{Coordinate, Dispatcher, NavigationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WaypointConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub polar: Option<PathBuf>,
    pub tack_table: Option<PathBuf>,
    pub waypoint: Option<WaypointConfig>,
    pub navigation: NavigationConfig,
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(polar: Option<PathBuf>, tack_table: Option<PathBuf>, seed: u64) -> Self {
        Self {
            polar,
            tack_table,
            generator: GeneratorConfig {
                seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Builds a dispatcher with tables and target applied. A table that fails to load
    /// leaves the performance engine without it; a rejected calibration is an error.
    pub fn build_dispatcher(&self) -> anyhow::Result<Dispatcher> {
        let mut dispatcher = Dispatcher::new(self.navigation.clone());
        dispatcher
            .set_calibration(self.navigation.speed_log_calibration)
            .context("applying speed log calibration")?;

        if let Some(path) = &self.polar {
            match PolarDiagram::load(path) {
                Ok(polar) => dispatcher.set_polar(polar),
                Err(err) => warn!("polar diagram {} not loaded: {}", path.display(), err),
            }
        }
        if let Some(path) = &self.tack_table {
            match TackTable::load(path) {
                Ok(table) => dispatcher.set_tack_table(table),
                Err(err) => warn!("tack table {} not loaded: {}", path.display(), err),
            }
        }
        if let Some(waypoint) = &self.waypoint {
            dispatcher.select_target(
                waypoint.name.clone(),
                Coordinate::new(waypoint.latitude, waypoint.longitude),
            );
        }
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_uses_defaults() {
        let cfg = WorkflowConfig::from_args(None, None, 3);
        assert_eq!(cfg.generator.seed, 3);
        assert_eq!(cfg.navigation.watchdog_timeout_secs, 30);
        assert!(cfg.waypoint.is_none());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"polar: data/polar.txt\n\
              waypoint:\n  name: windward\n  latitude: 43.2\n  longitude: 28.0\n\
              navigation:\n  speed_log_calibration: 1.05\n  depth_alarm_m: 3.0\n\
              generator:\n  seed: 11\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.polar, Some(PathBuf::from("data/polar.txt")));
        assert_eq!(cfg.waypoint.as_ref().unwrap().name, "windward");
        assert!((cfg.navigation.speed_log_calibration - 1.05).abs() < 1e-12);
        assert_eq!(cfg.navigation.depth_alarm_m, Some(3.0));
        assert_eq!(cfg.navigation.publish_interval_ms, 1000);
        assert_eq!(cfg.generator.seed, 11);
    }

    #[test]
    fn missing_tables_leave_engine_uninitialised() {
        let cfg = WorkflowConfig::from_args(Some(PathBuf::from("/nonexistent/polar.txt")), None, 0);
        let dispatcher = cfg.build_dispatcher().unwrap();
        assert!(!dispatcher.has_polar());
        assert!(dispatcher.polar().target_speed.is_none());
    }

    #[test]
    fn tables_and_waypoint_are_applied() {
        let mut polar = NamedTempFile::new().unwrap();
        polar
            .write_all(b"0 6 10\n30 4.0 5.0\n90 6.0 7.0\n150 5.0 6.5\n")
            .unwrap();
        let cfg = WorkflowConfig {
            polar: Some(polar.path().to_path_buf()),
            waypoint: Some(WaypointConfig {
                name: "mark".into(),
                latitude: 43.2,
                longitude: 28.0,
            }),
            ..Default::default()
        };
        let dispatcher = cfg.build_dispatcher().unwrap();
        assert!(dispatcher.has_polar());
        assert!(dispatcher.gps().is_target_selected);
        assert_eq!(dispatcher.gps().waypoint_name.as_deref(), Some("mark"));
    }

    #[test]
    fn bad_calibration_is_rejected() {
        let mut cfg = WorkflowConfig::default();
        cfg.navigation.speed_log_calibration = -1.0;
        assert!(cfg.build_dispatcher().is_err());
    }

    #[test]
    fn oversized_watchdog_timeout_still_builds() {
        let mut cfg = WorkflowConfig::default();
        cfg.navigation.watchdog_timeout_secs = u64::MAX;
        let mut dispatcher = cfg.build_dispatcher().unwrap();
        assert!(!dispatcher.check_watchdog(chrono::Utc::now()));
    }
}
