//! Single entry point for raw sentences.
//!
//! Each line runs to completion: protocol gates, the owning processor, then the VMG
//! and waypoint engines. Failures are counted and logged and never leave the call.

use chrono::{DateTime, Utc};

use crate::nmea::Sentence;
use crate::performance::{PolarDiagram, TackTable, VmgEngine};
use crate::prelude::{
    ChannelContext, Coordinate, NavError, NavResult, NavigationConfig, SentenceProcessor,
};
use crate::processing::{CompassProcessor, GpsProcessor, HydroProcessor, WindProcessor};
use crate::records::{
    CompassRecord, GpsRecord, HydroRecord, PolarResult, WaypointResult, WindRecord,
};
use crate::snapshot::Snapshot;
use crate::telemetry::{LogManager, MetricsRecorder, SentenceMetrics, WindWatchdog};
use crate::waypoint::WaypointEngine;

/// What became of one raw line.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Routed and applied; carries the sentence format.
    Accepted(String),
    /// Valid, but no processor handles the format.
    Ignored(String),
    Rejected(NavError),
}

impl DispatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchOutcome::Accepted(_))
    }
}

pub struct Dispatcher {
    config: NavigationConfig,
    compass: CompassProcessor,
    gps: GpsProcessor,
    hydro: HydroProcessor,
    wind: WindProcessor,
    vmg: VmgEngine,
    waypoint: WaypointEngine,
    metrics: MetricsRecorder,
    watchdog: WindWatchdog,
    logger: LogManager,
}

impl Dispatcher {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            compass: CompassProcessor::new(&config),
            gps: GpsProcessor::new(&config),
            hydro: HydroProcessor::new(&config),
            wind: WindProcessor::new(&config),
            vmg: VmgEngine::new(None, None),
            waypoint: WaypointEngine::new(),
            metrics: MetricsRecorder::new(),
            watchdog: WindWatchdog::new(config.watchdog_timeout_secs),
            logger: LogManager::new("dispatcher"),
            config,
        }
    }

    /// Builds a dispatcher with the performance tables already loaded.
    pub fn with_tables(
        config: NavigationConfig,
        polar: PolarDiagram,
        tack_table: TackTable,
    ) -> Self {
        let mut dispatcher = Self::new(config);
        dispatcher.vmg = VmgEngine::new(Some(polar), Some(tack_table));
        dispatcher
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Whether a polar diagram is loaded; without one no performance figures appear.
    pub fn has_polar(&self) -> bool {
        self.vmg.is_initialized()
    }

    pub fn set_polar(&mut self, polar: PolarDiagram) {
        self.vmg.set_polar(polar);
    }

    pub fn set_tack_table(&mut self, table: TackTable) {
        self.vmg.set_tack_table(table);
    }

    pub fn process_line(&mut self, line: &str) -> DispatchOutcome {
        self.process_line_at(line, Utc::now())
    }

    /// Processes one line as if it arrived at `now`.
    pub fn process_line_at(&mut self, line: &str, now: DateTime<Utc>) -> DispatchOutcome {
        let sentence = match Sentence::parse(line) {
            Ok(sentence) => sentence,
            Err(err) => return self.reject(line, err),
        };

        let context = ChannelContext {
            heading: self.compass.heading(),
            speed_through_water: self.hydro.speed_through_water(),
            received_at: Some(now),
        };

        match self.route(&sentence, &context) {
            Some(Ok(())) => {
                self.metrics.record_accepted();
                self.refresh(now);
                DispatchOutcome::Accepted(sentence.format)
            }
            Some(Err(err)) => self.reject(line, err),
            None => {
                self.metrics.record_ignored();
                self.logger
                    .debug(&format!("no processor for {}{}", sentence.talker, sentence.format));
                DispatchOutcome::Ignored(sentence.format)
            }
        }
    }

    fn route(&mut self, sentence: &Sentence, context: &ChannelContext) -> Option<NavResult<()>> {
        let format = sentence.format.as_str();
        if self.compass.accepts(format) {
            Some(self.compass.process(sentence, context))
        } else if self.gps.accepts(format) {
            Some(self.gps.process(sentence, context))
        } else if self.hydro.accepts(format) {
            Some(self.hydro.process(sentence, context))
        } else if self.wind.accepts(format) {
            Some(self.wind.process(sentence, context))
        } else {
            None
        }
    }

    fn reject(&mut self, line: &str, err: NavError) -> DispatchOutcome {
        self.metrics.record_rejected();
        self.logger
            .warn(&format!("dropped {:?}: {}", line.trim_end(), err));
        DispatchOutcome::Rejected(err)
    }

    /// Recomputes the derived engines from the current records. A failed engine keeps
    /// its previous result.
    fn refresh(&mut self, now: DateTime<Utc>) {
        if let Err(err) = self
            .vmg
            .compute(self.wind.record(), self.gps.record(), self.hydro.record())
        {
            self.logger.debug(&format!("vmg not updated: {}", err));
        }
        if !self.gps.record().is_target_selected {
            return;
        }
        if let Err(err) =
            self.waypoint
                .compute(self.gps.record(), self.wind.record(), self.vmg.result(), now)
        {
            self.logger.debug(&format!("waypoint not updated: {}", err));
        }
    }

    pub fn select_target(&mut self, name: impl Into<String>, waypoint: Coordinate) {
        self.waypoint.reset();
        self.gps.select_target(name, waypoint);
    }

    pub fn clear_target(&mut self) {
        self.gps.clear_target();
        self.waypoint.reset();
    }

    /// Applies a new speed-log calibration. An invalid coefficient is rejected and the
    /// previous one kept.
    pub fn set_calibration(&mut self, coefficient: f64) -> NavResult<()> {
        self.hydro.set_calibration(coefficient)
    }

    pub fn set_depth_alarm(&mut self, threshold_m: Option<f64>) {
        self.hydro.set_depth_alarm(threshold_m);
    }

    /// Runs the wind watchdog; returns whether the wind channel is stale.
    pub fn check_watchdog(&mut self, now: DateTime<Utc>) -> bool {
        self.watchdog.check(self.wind.record().last_updated, now)
    }

    pub fn compass(&self) -> &CompassRecord {
        self.compass.record()
    }

    pub fn gps(&self) -> &GpsRecord {
        self.gps.record()
    }

    pub fn hydro(&self) -> &HydroRecord {
        self.hydro.record()
    }

    pub fn wind(&self) -> &WindRecord {
        self.wind.record()
    }

    pub fn polar(&self) -> &PolarResult {
        self.vmg.result()
    }

    pub fn waypoint(&self) -> &WaypointResult {
        self.waypoint.result()
    }

    pub fn metrics(&self) -> SentenceMetrics {
        self.metrics.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Utc::now())
    }

    /// Copies every record and result into one consistent snapshot.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            compass: self.compass.record().clone(),
            gps: self.gps.record().clone(),
            hydro: self.hydro.record().clone(),
            wind: self.wind.record().clone(),
            polar: self.vmg.result().clone(),
            waypoint: self.waypoint.result().clone(),
            metrics: self.metrics.snapshot(),
            wind_stale: self.watchdog.is_stale(),
            taken_at: Some(now),
        }
    }

    /// Clears every record and result. Calibration, alarm threshold and tables stay.
    pub fn reset(&mut self) {
        self.compass.reset();
        self.gps.reset();
        self.hydro.reset();
        self.wind.reset();
        self.vmg.reset();
        self.waypoint.reset();
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}
