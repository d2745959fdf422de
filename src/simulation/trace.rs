/*!
 * Run Trace
 * The complete, replayable record of one run
 */

use super::events::TransitionEvent;
use super::snapshot::Snapshot;
use crate::core::types::{Tick, Ticks};
use crate::process::{Edge, ProcessSpec};
use crate::scheduler::PolicyKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub policy: PolicyKind,
    pub context_switch: Ticks,
    pub specs: Vec<ProcessSpec>,
    pub events: Vec<TransitionEvent>,
    /// One snapshot per processed tick, starting at tick 0
    pub snapshots: Vec<Snapshot>,
}

impl Trace {
    /// Tick of the last processed tick (0 for an empty run)
    pub fn total_time(&self) -> Tick {
        self.snapshots.last().map(|s| s.tick).unwrap_or(0)
    }

    pub fn events_for<'a>(&'a self, pid: &'a str) -> impl Iterator<Item = &'a TransitionEvent> + 'a {
        self.events.iter().filter(move |e| e.pid == pid)
    }

    pub fn events_at(&self, tick: Tick) -> impl Iterator<Item = &TransitionEvent> + '_ {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn completion_tick(&self, pid: &str) -> Option<Tick> {
        self.events_for(pid)
            .find(|e| e.edge == Edge::Terminate)
            .map(|e| e.tick)
    }

    pub fn first_dispatch(&self, pid: &str) -> Option<Tick> {
        self.events_for(pid)
            .find(|e| e.edge == Edge::Dispatch)
            .map(|e| e.tick)
    }

    /// Pids in the order they terminated
    pub fn completion_order(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.edge == Edge::Terminate)
            .map(|e| e.pid.as_str())
            .collect()
    }

    /// Dispatch events in order
    pub fn dispatches(&self) -> impl Iterator<Item = &TransitionEvent> + '_ {
        self.events.iter().filter(|e| e.edge == Edge::Dispatch)
    }

    pub fn snapshot_at(&self, tick: Tick) -> Option<&Snapshot> {
        self.snapshots.get(tick as usize).filter(|s| s.tick == tick)
    }
}
