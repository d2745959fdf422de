/*!
 * Tick Snapshots
 * Read-only projection of the simulation state for render sinks
 */

use crate::core::types::{Pid, Tick, Ticks};
use crate::process::{PhaseKind, ProcessState};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Queue (or slot) holding a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Queue {
    New,
    Ready,
    Running,
    Blocked,
    Done,
}

impl Queue {
    pub const fn holding(state: ProcessState) -> Self {
        match state {
            ProcessState::New => Self::New,
            ProcessState::Ready => Self::Ready,
            ProcessState::Running => Self::Running,
            ProcessState::Blocked => Self::Blocked,
            ProcessState::Terminated => Self::Done,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessView {
    pub pid: Pid,
    pub state: ProcessState,
    pub queue: Queue,
    pub phase_index: usize,
    pub phase: Option<PhaseKind>,
    pub remaining: Ticks,
}

/// State of every process once a tick's transitions have been applied
///
/// The snapshot for tick `t` describes the interval `[t, t + 1)`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub running: Option<Pid>,
    /// A context switch is occupying the processor
    pub switching: bool,
    /// Ready queue in insertion order
    pub ready: Vec<Pid>,
    pub blocked: Vec<Pid>,
    /// Every process, in source order
    pub processes: Vec<ProcessView>,
}

impl Snapshot {
    pub fn process(&self, pid: &str) -> Option<&ProcessView> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn state_of(&self, pid: &str) -> Option<ProcessState> {
        self.process(pid).map(|p| p.state)
    }

    pub fn count(&self, state: ProcessState) -> usize {
        self.processes.iter().filter(|p| p.state == state).count()
    }

    pub fn in_queue(&self, queue: Queue) -> impl Iterator<Item = &str> + '_ {
        self.processes
            .iter()
            .filter(move |p| p.queue == queue)
            .map(|p| p.pid.as_str())
    }
}
