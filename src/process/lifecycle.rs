/*!
 * Process Lifecycle
 *
 * The per-process state machine. Every legal move is one [`Edge`]:
 *
 * ```text
 * New -> Ready -> Running -> Terminated
 *          ^  \______/  \
 *          |             v
 *          +-------- Blocked
 * ```
 *
 * Anything else is rejected with [`SimError::InvalidTransition`].
 */

use super::source::ProcessSpec;
use super::types::{PhaseKind, Process, ProcessState};
use crate::core::errors::SimError;
use crate::core::types::SimResult;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named logical edge of the lifecycle graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    #[serde(rename = "new->ready")]
    Admit,
    #[serde(rename = "ready->running")]
    Dispatch,
    #[serde(rename = "running->ready")]
    Preempt,
    #[serde(rename = "running->blocked")]
    Block,
    #[serde(rename = "running->terminated")]
    Terminate,
    #[serde(rename = "blocked->ready")]
    Unblock,
}

impl Edge {
    /// Every legal edge of the lifecycle graph
    pub const ALL: [Edge; 6] = [
        Edge::Admit,
        Edge::Dispatch,
        Edge::Preempt,
        Edge::Block,
        Edge::Terminate,
        Edge::Unblock,
    ];

    /// Look up the edge connecting two states
    pub fn between(from: ProcessState, to: ProcessState) -> Option<Edge> {
        Self::ALL
            .into_iter()
            .find(|edge| edge.from_state() == from && edge.to_state() == to)
    }

    pub const fn from_state(&self) -> ProcessState {
        match self {
            Self::Admit => ProcessState::New,
            Self::Dispatch => ProcessState::Ready,
            Self::Preempt | Self::Block | Self::Terminate => ProcessState::Running,
            Self::Unblock => ProcessState::Blocked,
        }
    }

    pub const fn to_state(&self) -> ProcessState {
        match self {
            Self::Admit | Self::Preempt | Self::Unblock => ProcessState::Ready,
            Self::Dispatch => ProcessState::Running,
            Self::Block => ProcessState::Blocked,
            Self::Terminate => ProcessState::Terminated,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admit => "new->ready",
            Self::Dispatch => "ready->running",
            Self::Preempt => "running->ready",
            Self::Block => "running->blocked",
            Self::Terminate => "running->terminated",
            Self::Unblock => "blocked->ready",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Process {
    /// Create the process in state New, positioned on its first CPU burst
    pub(crate) fn from_spec(spec: &ProcessSpec) -> Self {
        Self {
            pid: spec.pid.clone(),
            arrival: spec.arrival,
            bursts: spec.bursts.clone(),
            priority: spec.priority,
            phase_index: 0,
            remaining: spec.bursts[0],
            state: ProcessState::New,
            ready_seq: 0,
        }
    }

    fn transition(&mut self, to: ProcessState) -> SimResult<Edge> {
        let Some(edge) = Edge::between(self.state, to) else {
            warn!("{}: rejected transition {} -> {}", self.pid, self.state, to);
            return Err(SimError::InvalidTransition {
                pid: self.pid.clone(),
                from: self.state,
                to,
            });
        };
        trace!("{}: {}", self.pid, edge);
        self.state = to;
        Ok(edge)
    }

    fn require(&self, state: ProcessState, operation: &str) -> SimResult<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(SimError::InvalidState {
                pid: self.pid.clone(),
                state: self.state,
                operation: operation.to_string(),
            })
        }
    }

    /// New -> Ready
    pub(crate) fn admit(&mut self, seq: u64) -> SimResult<Edge> {
        let edge = self.transition(ProcessState::Ready)?;
        self.ready_seq = seq;
        Ok(edge)
    }

    /// Ready -> Running
    pub(crate) fn dispatch(&mut self) -> SimResult<Edge> {
        self.transition(ProcessState::Running)
    }

    /// Running -> Ready, keeping phase progress intact
    pub(crate) fn preempt(&mut self, seq: u64) -> SimResult<Edge> {
        let edge = self.transition(ProcessState::Ready)?;
        self.ready_seq = seq;
        Ok(edge)
    }

    /// Consume one CPU tick.
    ///
    /// Returns the edge taken when the CPU burst completes: `Block` when an IO
    /// burst follows, `Terminate` otherwise.
    pub(crate) fn execute(&mut self) -> SimResult<Option<Edge>> {
        self.require(ProcessState::Running, "execute")?;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Ok(None);
        }

        match self.bursts.get(self.phase_index + 1).copied() {
            Some(io) => {
                self.phase_index += 1;
                self.remaining = io;
                self.transition(ProcessState::Blocked).map(Some)
            }
            None => self.transition(ProcessState::Terminated).map(Some),
        }
    }

    /// Consume one IO tick; true once the IO burst is exhausted
    pub(crate) fn wait_io(&mut self) -> SimResult<bool> {
        self.require(ProcessState::Blocked, "wait on io")?;
        self.remaining = self.remaining.saturating_sub(1);
        Ok(self.remaining == 0)
    }

    /// Blocked -> Ready, moving onto the next CPU burst
    pub(crate) fn unblock(&mut self, seq: u64) -> SimResult<Edge> {
        let next = self.phase_index + 1;
        let burst = match self.bursts.get(next) {
            Some(&burst) if PhaseKind::of(next) == PhaseKind::Cpu => burst,
            _ => {
                return Err(SimError::InvalidState {
                    pid: self.pid.clone(),
                    state: self.state,
                    operation: "leave io without a following cpu burst".to_string(),
                })
            }
        };
        let edge = self.transition(ProcessState::Ready)?;
        self.phase_index = next;
        self.remaining = burst;
        self.ready_seq = seq;
        Ok(edge)
    }
}
