use crate::generator::profile::{GeneratorConfig, SentenceGenerator};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use log::{debug, info};
use navcore::telemetry::{SentenceMetrics, SnapshotPublisher};
use navcore::{Dispatcher, Snapshot};
use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

const LINE_QUEUE: usize = 256;

#[derive(Debug)]
pub struct WorkflowResult {
    pub lines: usize,
    pub metrics: SentenceMetrics,
    pub snapshot: Snapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Feeds a recorded NMEA log through a fresh dispatcher, one line at a time.
    pub fn replay<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<WorkflowResult> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading NMEA log {}", path_ref.display()))?;
        let mut dispatcher = self.config.build_dispatcher()?;
        let mut lines = 0;
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            dispatcher.process_line(line);
            lines += 1;
        }
        dispatcher.check_watchdog(Utc::now());
        Ok(summarize(&dispatcher, lines))
    }

    /// Runs `cycles` generator bursts on simulated time, without sleeping.
    pub fn execute_offline(&self, cycles: usize) -> anyhow::Result<WorkflowResult> {
        let mut dispatcher = self.config.build_dispatcher()?;
        let mut generator = SentenceGenerator::new(self.config.generator.clone());
        let step = ChronoDuration::milliseconds(
            i64::try_from(self.config.generator.interval_ms).context("generator interval")?,
        );
        let mut now = Utc::now();
        let mut lines = 0;
        for _ in 0..cycles {
            for line in generator.next_cycle(now) {
                dispatcher.process_line_at(&line, now);
                lines += 1;
            }
            dispatcher.check_watchdog(now);
            now += step;
        }
        Ok(summarize(&dispatcher, lines))
    }

    /// Live mode: a generator task feeds lines over a channel to this task, which owns
    /// the dispatcher and processes each line to completion. Snapshots are published and
    /// the watchdog checked on the publish interval until `shutdown` resolves.
    pub async fn run_live<F>(
        &self,
        mut publisher: SnapshotPublisher,
        shutdown: F,
    ) -> anyhow::Result<WorkflowResult>
    where
        F: Future<Output = ()>,
    {
        let mut dispatcher = self.config.build_dispatcher()?;
        let (sender, mut receiver) = mpsc::channel::<String>(LINE_QUEUE);
        let producer = tokio::spawn(produce(self.config.generator.clone(), sender));

        let mut publish_timer = interval(Duration::from_millis(
            self.config.navigation.publish_interval_ms.max(1),
        ));
        publish_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut lines = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("live run: shutdown requested");
                    break;
                }
                line = receiver.recv() => match line {
                    Some(line) => {
                        dispatcher.process_line(&line);
                        lines += 1;
                    }
                    None => {
                        info!("live run: generator stopped");
                        break;
                    }
                },
                _ = publish_timer.tick() => {
                    dispatcher.check_watchdog(Utc::now());
                    publisher.publish(dispatcher.snapshot());
                }
            }
        }

        producer.abort();
        publisher.publish(dispatcher.snapshot());
        Ok(summarize(&dispatcher, lines))
    }
}

async fn produce(config: GeneratorConfig, lines: mpsc::Sender<String>) {
    let mut timer = interval(Duration::from_millis(config.interval_ms.max(1)));
    let mut generator = SentenceGenerator::new(config);
    loop {
        timer.tick().await;
        for line in generator.next_cycle(Utc::now()) {
            if lines.send(line).await.is_err() {
                debug!("generator: dispatcher channel closed");
                return;
            }
        }
    }
}

fn summarize(dispatcher: &Dispatcher, lines: usize) -> WorkflowResult {
    WorkflowResult {
        lines,
        metrics: dispatcher.metrics(),
        snapshot: dispatcher.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn data(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../data").join(name)
    }

    #[test]
    fn offline_run_fills_records_and_targets() {
        let cfg = WorkflowConfig::from_args(
            Some(data("polar.txt")),
            Some(data("optimal_tack.txt")),
            5,
        );
        let runner = Runner::new(cfg);
        let result = runner.execute_offline(10).unwrap();

        assert_eq!(result.lines, 60);
        assert_eq!(result.metrics.accepted, 60);
        assert_eq!(result.metrics.rejected, 0);
        let snapshot = result.snapshot;
        assert!(snapshot.hydro.depth.is_some());
        assert!(snapshot.gps.is_valid);
        assert!(snapshot.wind.true_force.is_some());
        assert!(snapshot.polar.target_speed.unwrap() > 0.0);
        assert!(snapshot.polar.sailing_state.is_some());
        assert!(!snapshot.wind_stale);
    }

    #[test]
    fn replay_counts_bad_lines() {
        let mut log = NamedTempFile::new().unwrap();
        writeln!(log, "$IIDPT,7.8,,*4D").unwrap();
        writeln!(log, "$IIDPT,7.8,,*00").unwrap();
        writeln!(log).unwrap();
        writeln!(log, "garbage").unwrap();
        let runner = Runner::new(WorkflowConfig::default());
        let result = runner.replay(log.path()).unwrap();

        assert_eq!(result.lines, 3);
        assert_eq!(result.metrics.accepted, 1);
        assert_eq!(result.metrics.rejected, 2);
        assert_eq!(result.snapshot.hydro.depth, Some(7.8));
    }

    #[test]
    fn replay_of_sample_log_is_clean() {
        let runner = Runner::new(WorkflowConfig::default());
        let result = runner.replay(data("sample.nmea")).unwrap();
        assert!(result.lines > 0);
        assert_eq!(result.metrics.rejected, 0);
    }

    #[tokio::test]
    async fn live_run_publishes_snapshots() {
        let mut cfg = WorkflowConfig::default();
        cfg.generator.interval_ms = 10;
        cfg.navigation.publish_interval_ms = 20;
        let runner = Runner::new(cfg);
        let publisher = SnapshotPublisher::new();
        let snapshots = publisher.subscribe();

        let result = runner
            .run_live(publisher, tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap();

        assert!(result.lines > 0);
        assert_eq!(snapshots.borrow().metrics.accepted, result.metrics.accepted);
    }
}
