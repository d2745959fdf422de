/*!
 * Transition Events
 * One event per state change, in the order the tick algorithm produced them
 */

use crate::core::types::{Pid, Tick};
use crate::process::{Edge, ProcessState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A process moved along a lifecycle edge at a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub tick: Tick,
    pub pid: Pid,
    pub from: ProcessState,
    pub to: ProcessState,
    pub edge: Edge,
}

impl TransitionEvent {
    pub fn new(tick: Tick, pid: impl Into<Pid>, edge: Edge) -> Self {
        Self {
            tick,
            pid: pid.into(),
            from: edge.from_state(),
            to: edge.to_state(),
            edge,
        }
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} {} {}", self.tick, self.pid, self.edge)
    }
}
