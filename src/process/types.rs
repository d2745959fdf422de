/*!
 * Process Types
 * Simulated process record and lifecycle states
 */

use crate::core::types::{Pid, Priority, Tick, Ticks};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created from the source, not yet arrived
    New,
    /// Eligible to run, waiting for the processor
    Ready,
    /// Occupying the processor
    Running,
    /// Waiting on an IO burst
    Blocked,
    /// All bursts consumed
    Terminated,
}

impl ProcessState {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of burst a phase index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Cpu,
    Io,
}

impl PhaseKind {
    /// Bursts alternate CPU, IO, CPU, ... starting at index 0
    #[inline]
    pub const fn of(phase_index: usize) -> Self {
        if phase_index % 2 == 0 {
            Self::Cpu
        } else {
            Self::Io
        }
    }
}

/// Simulated process
///
/// Built from a validated [`ProcessSpec`](super::source::ProcessSpec); only the
/// simulation driver moves it between states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pub(crate) pid: Pid,
    pub(crate) arrival: Tick,
    pub(crate) bursts: Vec<Ticks>,
    pub(crate) priority: Option<Priority>,
    pub(crate) phase_index: usize,
    pub(crate) remaining: Ticks,
    pub(crate) state: ProcessState,
    /// Stamp taken each time the process enters Ready (insertion-order tie-break)
    pub(crate) ready_seq: u64,
}

impl Process {
    #[inline]
    pub fn pid(&self) -> &str {
        &self.pid
    }

    #[inline]
    pub const fn arrival(&self) -> Tick {
        self.arrival
    }

    #[inline]
    pub fn bursts(&self) -> &[Ticks] {
        &self.bursts
    }

    #[inline]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    #[inline]
    pub const fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Ticks left in the current phase
    #[inline]
    pub const fn remaining(&self) -> Ticks {
        self.remaining
    }

    #[inline]
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub const fn ready_seq(&self) -> u64 {
        self.ready_seq
    }

    /// Kind of the current phase, `None` once terminated
    pub fn phase(&self) -> Option<PhaseKind> {
        match self.state {
            ProcessState::Terminated => None,
            _ => Some(PhaseKind::of(self.phase_index)),
        }
    }

    /// Total CPU demand over all CPU bursts
    pub fn cpu_total(&self) -> Ticks {
        self.bursts.iter().step_by(2).fold(0, |acc, &b| acc.saturating_add(b))
    }

    /// Total IO demand over all IO bursts
    pub fn io_total(&self) -> Ticks {
        self.bursts.iter().skip(1).step_by(2).fold(0, |acc, &b| acc.saturating_add(b))
    }

    #[inline(always)]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    #[inline(always)]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }
}
