/*!
 * Playback Task - Paced Simulation Stepping
 *
 * Background task that decides when the step function runs and how long each
 * frame is held. The step function itself never sleeps; pacing, pausing and
 * restarting all live here.
 */

use crate::core::errors::SimError;
use crate::core::limits::FRAME_CHANNEL_CAPACITY;
use crate::core::types::{SimResult, Tick};
use crate::process::ProcessSpec;
use crate::simulation::{Driver, RenderSink, SimulationState, Snapshot, TransitionEvent};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, trace, warn};

/// Control messages for the playback task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Change how long each frame is held
    SetFrameDelay(Duration),
    /// Stop advancing on the timer
    Pause,
    /// Resume advancing on the timer
    Resume,
    /// Advance exactly one tick (works while paused)
    Step,
    /// Discard all state and reseed from the process specs
    Restart,
    /// Halt at the next tick boundary
    Stop,
}

/// Output of one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub snapshot: Snapshot,
    pub events: Vec<TransitionEvent>,
}

impl Frame {
    #[inline]
    pub fn tick(&self) -> Tick {
        self.snapshot.tick
    }

    /// Deliver the frame to a sink: events first, then the snapshot
    pub fn render_to<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for event in &self.events {
            sink.on_transition(event);
        }
        sink.on_snapshot(&self.snapshot);
    }
}

/// How a playback ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub frames: u64,
    pub restarts: u64,
    /// Clock value when the task ended
    pub final_tick: Tick,
    /// The run reached its end (as opposed to being stopped)
    pub finished: bool,
    pub error: Option<SimError>,
}

/// Handle to the playback background task
pub struct PlaybackTask {
    command_tx: mpsc::UnboundedSender<PlaybackCommand>,
    latest: Arc<RwLock<Option<Frame>>>,
    handle: Option<tokio::task::JoinHandle<PlaybackSummary>>,
}

impl PlaybackTask {
    /// Spawn a playback that starts advancing immediately
    pub fn spawn(
        driver: Driver,
        specs: Vec<ProcessSpec>,
        frame_delay: Duration,
    ) -> (Self, ReceiverStream<Frame>) {
        Self::spawn_with(driver, specs, frame_delay, true)
    }

    /// Spawn a playback that waits for `resume` or `step`
    pub fn spawn_paused(
        driver: Driver,
        specs: Vec<ProcessSpec>,
        frame_delay: Duration,
    ) -> (Self, ReceiverStream<Frame>) {
        Self::spawn_with(driver, specs, frame_delay, false)
    }

    fn spawn_with(
        driver: Driver,
        specs: Vec<ProcessSpec>,
        frame_delay: Duration,
        active: bool,
    ) -> (Self, ReceiverStream<Frame>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let latest = Arc::new(RwLock::new(None));

        let outlet = FrameOutlet {
            frame_tx,
            latest: Arc::clone(&latest),
        };
        let handle = tokio::spawn(async move {
            run_playback_loop(driver, specs, frame_delay, active, command_rx, outlet).await
        });

        info!(
            "Playback task spawned ({}, {:?} per frame)",
            if active { "running" } else { "paused" },
            frame_delay
        );

        (
            Self {
                command_tx,
                latest,
                handle: Some(handle),
            },
            ReceiverStream::new(frame_rx),
        )
    }

    /// Most recent frame produced, whether or not the stream consumer has seen it
    pub fn latest(&self) -> Option<Frame> {
        self.latest.read().clone()
    }

    pub fn set_frame_delay(&self, delay: Duration) {
        let _ = self.command_tx.send(PlaybackCommand::SetFrameDelay(delay));
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(PlaybackCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.command_tx.send(PlaybackCommand::Resume);
    }

    pub fn step(&self) {
        let _ = self.command_tx.send(PlaybackCommand::Step);
    }

    pub fn restart(&self) {
        let _ = self.command_tx.send(PlaybackCommand::Restart);
    }

    /// Stop at the next tick boundary and wait for the task
    pub async fn stop(mut self) -> Option<PlaybackSummary> {
        let _ = self.command_tx.send(PlaybackCommand::Stop);
        self.wait().await
    }

    /// Wait for the playback to end on its own
    pub async fn join(mut self) -> Option<PlaybackSummary> {
        self.wait().await
    }

    async fn wait(&mut self) -> Option<PlaybackSummary> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(summary) => {
                info!("Playback task ended after {} frames", summary.frames);
                Some(summary)
            }
            Err(e) => {
                warn!("Playback task shutdown error: {}", e);
                None
            }
        }
    }
}

impl Drop for PlaybackTask {
    fn drop(&mut self) {
        // Attempt graceful shutdown if handle still exists
        if self.handle.is_some() {
            let _ = self.command_tx.send(PlaybackCommand::Stop);
        }
    }
}

fn frame_interval(delay: Duration) -> Interval {
    // tokio rejects a zero period
    let mut interval = tokio::time::interval(delay.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Where frames go: the stream plus the shared latest-frame slot
struct FrameOutlet {
    frame_tx: mpsc::Sender<Frame>,
    latest: Arc<RwLock<Option<Frame>>>,
}

impl FrameOutlet {
    fn clear(&self) {
        *self.latest.write() = None;
    }

    /// Step once and publish the frame; false when the consumer has gone away
    async fn emit(&self, driver: &Driver, state: &mut SimulationState) -> SimResult<bool> {
        let outcome = driver.step(state)?;
        *state = outcome.state;
        let frame = Frame {
            snapshot: outcome.snapshot,
            events: outcome.events,
        };
        trace!(tick = frame.tick(), events = frame.events.len(), "frame");
        *self.latest.write() = Some(frame.clone());
        Ok(self.frame_tx.send(frame).await.is_ok())
    }
}

async fn run_playback_loop(
    driver: Driver,
    specs: Vec<ProcessSpec>,
    frame_delay: Duration,
    mut active: bool,
    mut command_rx: mpsc::UnboundedReceiver<PlaybackCommand>,
    outlet: FrameOutlet,
) -> PlaybackSummary {
    let mut state = SimulationState::seed(&specs);
    let mut summary = PlaybackSummary::default();
    let mut interval = frame_interval(frame_delay);

    info!(
        "Playback loop started: policy={}, processes={}",
        driver.policy().kind,
        specs.len()
    );

    loop {
        if state.is_finished() {
            summary.finished = true;
            info!("Playback reached the end at tick {}", state.tick());
            break;
        }

        let advance = tokio::select! {
            _ = interval.tick(), if active => true,

            cmd = command_rx.recv() => match cmd {
                Some(PlaybackCommand::SetFrameDelay(delay)) => {
                    info!("Frame delay updated: {:?}", delay);
                    interval = frame_interval(delay);
                    false
                }
                Some(PlaybackCommand::Pause) => {
                    info!("Playback paused at tick {}", state.tick());
                    active = false;
                    false
                }
                Some(PlaybackCommand::Resume) => {
                    info!("Playback resumed at tick {}", state.tick());
                    active = true;
                    false
                }
                Some(PlaybackCommand::Step) => true,
                Some(PlaybackCommand::Restart) => {
                    info!("Playback restarted from tick {}", state.tick());
                    state = SimulationState::seed(&specs);
                    outlet.clear();
                    summary.restarts += 1;
                    interval.reset();
                    false
                }
                Some(PlaybackCommand::Stop) | None => {
                    info!("Playback stopping at tick {}", state.tick());
                    break;
                }
            },
        };

        if !advance {
            continue;
        }

        match outlet.emit(&driver, &mut state).await {
            Ok(true) => summary.frames += 1,
            Ok(false) => {
                info!("Frame consumer dropped, ending playback");
                break;
            }
            Err(e) => {
                error!(error = %e, "Playback halted");
                summary.error = Some(e);
                break;
            }
        }
    }

    summary.final_tick = state.tick();
    summary
}
