/*!
 * Render Sinks
 * Consumers of transition events and per-tick snapshots
 */

use super::events::TransitionEvent;
use super::snapshot::Snapshot;
use super::trace::Trace;
use crate::core::types::Ticks;
use crate::process::ProcessSpec;
use crate::scheduler::PolicyKind;
use tracing::{debug, info};

/// Receives the output of a run as it happens
///
/// Events for a tick are delivered before that tick's snapshot.
pub trait RenderSink {
    fn on_transition(&mut self, event: &TransitionEvent);

    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn on_transition(&mut self, event: &TransitionEvent) {
        (**self).on_transition(event);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        (**self).on_snapshot(snapshot);
    }
}

/// Fan out to two sinks, left first
impl<A: RenderSink, B: RenderSink> RenderSink for (A, B) {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.0.on_transition(event);
        self.1.on_transition(event);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }
}

/// Collects everything for later inspection or reporting
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<TransitionEvent>,
    snapshots: Vec<Snapshot>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_trace(self, policy: PolicyKind, context_switch: Ticks, specs: Vec<ProcessSpec>) -> Trace {
        Trace {
            policy,
            context_switch,
            specs,
            events: self.events,
            snapshots: self.snapshots,
        }
    }
}

impl RenderSink for RecordingSink {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.events.push(event.clone());
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

/// Logs transitions and queue membership through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RenderSink for TracingSink {
    fn on_transition(&mut self, event: &TransitionEvent) {
        info!(
            tick = event.tick,
            pid = %event.pid,
            edge = %event.edge,
            "transition"
        );
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        debug!(
            tick = snapshot.tick,
            running = snapshot.running.as_deref().unwrap_or("-"),
            ready = ?snapshot.ready,
            blocked = ?snapshot.blocked,
            switching = snapshot.switching,
            "frame"
        );
    }
}
