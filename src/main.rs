/*!
 * schedsim - Main Entry Point
 *
 * Loads a workload file, plays it back tick by tick with frame logging and
 * prints the aggregate report as JSON on stdout.
 */

use miette::miette;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use schedsim::{
    init_tracing, load, Driver, PlaybackTask, RecordingSink, Report, SimError,
    SimulationConfig, TracingSink, Workload,
};

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| miette!(help = "pass a JSON workload file", "usage: schedsim <workload.json>"))?;

    info!(path = %path, "Loading workload");
    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(SimError::from)?;
    let workload = Workload::from_json_str(&json)?;

    let config = SimulationConfig::default()
        .apply_workload(&workload)?
        .apply_env()?;
    let specs = load(&workload.processes, &config)?;

    info!(
        policy = %config.policy,
        processes = specs.len(),
        context_switch = config.context_switch,
        frame_ms = config.frame_delay.as_millis() as u64,
        "Workload validated"
    );

    let driver = Driver::new(&config);
    let (task, mut frames) = PlaybackTask::spawn(driver, specs.clone(), config.frame_delay);
    let mut sinks = (RecordingSink::new(), TracingSink);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(frame) => frame.render_to(&mut sinks),
                None => break,
            },
            _ = &mut ctrl_c => {
                warn!("Interrupted, stopping playback");
                if let Some(summary) = task.stop().await {
                    info!(frames = summary.frames, tick = summary.final_tick, "Playback stopped");
                }
                return Ok(());
            }
        }
    }

    if let Some(err) = task.join().await.and_then(|summary| summary.error) {
        return Err(err.into());
    }

    let (recorder, _) = sinks;
    let trace = recorder.into_trace(config.policy, config.context_switch, specs);
    let report = Report::from_trace(&trace);

    info!(
        total_time = report.system.total_time,
        cpu_utilization = report.system.cpu_utilization,
        "Simulation complete"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report).map_err(SimError::from)?
    );

    Ok(())
}
