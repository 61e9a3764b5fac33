use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{default_bind_address, GuiBridge};
use log::info;
use navcore::telemetry::SnapshotPublisher;
use navcore::{DisplayChannel, WindUnits};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "NMEA replay, generator and snapshot bridge for navcore")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Polar diagram table (overrides the workflow file)
    #[arg(long)]
    polar: Option<PathBuf>,
    /// Optimal tack table (overrides the workflow file)
    #[arg(long)]
    tack_table: Option<PathBuf>,
    /// Replay a recorded NMEA log and print a summary
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Run this many generator cycles offline and print a summary
    #[arg(long)]
    offline: Option<usize>,
    /// Append the offline/replay summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Generate live traffic and serve snapshots over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    live: bool,
    #[arg(long, default_value_t = default_bind_address())]
    bind: SocketAddr,
    /// Report wind speeds in m/s on display slots
    #[arg(long, default_value_t = false)]
    metric_wind: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(None, None, args.seed)
    };
    if args.polar.is_some() {
        workflow_config.polar = args.polar.clone();
    }
    if args.tack_table.is_some() {
        workflow_config.tack_table = args.tack_table.clone();
    }
    let units = if args.metric_wind {
        WindUnits::MetersPerSecond
    } else {
        WindUnits::Knots
    };

    let runner = Runner::new(workflow_config);

    if let Some(path) = &args.replay {
        let result = runner.replay(path)?;
        report(&result, units, args.report.as_ref())?;
    }
    if let Some(cycles) = args.offline {
        let result = runner.execute_offline(cycles)?;
        report(&result, units, args.report.as_ref())?;
    }
    if args.live {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for live mode")?;
        let result = runtime.block_on(async {
            let publisher = SnapshotPublisher::new();
            let bridge = GuiBridge::new(publisher.subscribe(), units);
            tokio::spawn(bridge.serve(args.bind));
            info!("live mode running (Ctrl+C to stop)");
            runner
                .run_live(publisher, async {
                    if let Err(err) = signal::ctrl_c().await {
                        log::warn!("listening for Ctrl+C failed: {}", err);
                    }
                })
                .await
        })?;
        report(&result, units, None)?;
    }

    Ok(())
}

fn report(result: &WorkflowResult, units: WindUnits, path: Option<&PathBuf>) -> anyhow::Result<()> {
    let metrics = result.metrics;
    let mut text = format!(
        "lines={} accepted={} ignored={} rejected={} wind_stale={}\n",
        result.lines,
        metrics.accepted,
        metrics.ignored,
        metrics.rejected,
        result.snapshot.wind_stale
    );
    for channel in DisplayChannel::ALL {
        let value = result
            .snapshot
            .channel(channel, units)
            .map_or_else(|| "-".to_string(), |value| format!("{:.2}", value));
        text.push_str(&format!("  {:?}: {}\n", channel, value));
    }
    if let Some(speed) = result.snapshot.polar.target_speed {
        text.push_str(&format!("  target speed: {:.2} kn\n", speed));
    }
    if let Some(distance) = result.snapshot.waypoint.distance_to_mark {
        text.push_str(&format!("  distance to mark: {:.0} m\n", distance));
    }
    print!("{}", text);

    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening report {}", path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}
