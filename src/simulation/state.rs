/*!
 * Simulation State
 * The single value the step function transforms, tick by tick
 */

use super::snapshot::{ProcessView, Queue, Snapshot};
use crate::core::types::{Tick, Ticks};
use crate::process::{Process, ProcessSpec};
use serde::Serialize;

/// Complete state of one run between two ticks
///
/// Queues hold indices into `processes`. The running slot is an `Option`,
/// so at most one process can ever occupy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationState {
    pub(crate) tick: Tick,
    pub(crate) processes: Vec<Process>,
    pub(crate) new: Vec<usize>,
    pub(crate) ready: Vec<usize>,
    pub(crate) blocked: Vec<usize>,
    pub(crate) running: Option<usize>,
    pub(crate) next_seq: u64,
    pub(crate) switch_remaining: Ticks,
}

impl SimulationState {
    /// Fresh state at tick 0 with every process in New
    pub fn seed(specs: &[ProcessSpec]) -> Self {
        let processes: Vec<Process> = specs.iter().map(Process::from_spec).collect();
        let new = (0..processes.len()).collect();
        Self {
            tick: 0,
            processes,
            new,
            ready: Vec::new(),
            blocked: Vec::new(),
            running: None,
            next_seq: 0,
            switch_remaining: 0,
        }
    }

    /// The tick the next step will process
    #[inline]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, pid: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid() == pid)
    }

    pub fn running(&self) -> Option<&Process> {
        self.running.map(|idx| &self.processes[idx])
    }

    /// Ready processes in insertion order
    pub fn ready(&self) -> impl Iterator<Item = &Process> + '_ {
        self.ready.iter().map(|&idx| &self.processes[idx])
    }

    pub fn blocked(&self) -> impl Iterator<Item = &Process> + '_ {
        self.blocked.iter().map(|&idx| &self.processes[idx])
    }

    pub fn pending(&self) -> impl Iterator<Item = &Process> + '_ {
        self.new.iter().map(|&idx| &self.processes[idx])
    }

    #[inline]
    pub const fn is_switching(&self) -> bool {
        self.switch_remaining > 0
    }

    /// No process left in New, Ready, Blocked or Running
    pub fn is_finished(&self) -> bool {
        self.new.is_empty()
            && self.ready.is_empty()
            && self.blocked.is_empty()
            && self.running.is_none()
    }

    pub(crate) fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Projection at the current clock value
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(self.tick)
    }

    pub(crate) fn snapshot_at(&self, tick: Tick) -> Snapshot {
        let pids = |queue: &[usize]| -> Vec<String> {
            queue.iter().map(|&idx| self.processes[idx].pid.clone()).collect()
        };

        Snapshot {
            tick,
            running: self.running().map(|p| p.pid.clone()),
            switching: self.is_switching(),
            ready: pids(&self.ready),
            blocked: pids(&self.blocked),
            processes: self
                .processes
                .iter()
                .map(|p| ProcessView {
                    pid: p.pid.clone(),
                    state: p.state(),
                    queue: Queue::holding(p.state()),
                    phase_index: p.phase_index(),
                    phase: p.phase(),
                    remaining: p.remaining(),
                })
                .collect(),
        }
    }
}
