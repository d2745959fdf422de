/*!
 * Dispatch Policy
 * Pure selection and preemption decisions over the Ready queue
 */

use super::types::PolicyKind;
use crate::core::limits::LOWEST_PRIORITY;
use crate::process::Process;
use serde::Serialize;
use std::cmp::Ordering;

/// Attribute a policy sorts Ready candidates by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKey {
    Arrival,
    /// Ticks left in the current CPU burst
    RemainingBurst,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    Ascending,
    Descending,
}

/// Outcome of one dispatch decision
///
/// `next` indexes into the Ready slice handed to [`DispatchPolicy::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub next: Option<usize>,
    pub preempt: bool,
}

/// Dispatch policy as data: a comparator plus a preemption flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchPolicy {
    pub kind: PolicyKind,
    pub key: SelectionKey,
    pub order: KeyOrder,
    pub preemptive: bool,
}

impl DispatchPolicy {
    pub const fn new(kind: PolicyKind) -> Self {
        let (key, order) = match kind {
            PolicyKind::Fcfs => (SelectionKey::Arrival, KeyOrder::Ascending),
            PolicyKind::Sjf | PolicyKind::Srtf => {
                (SelectionKey::RemainingBurst, KeyOrder::Ascending)
            }
            PolicyKind::Ljf | PolicyKind::Lrtf => {
                (SelectionKey::RemainingBurst, KeyOrder::Descending)
            }
            PolicyKind::Priority | PolicyKind::PreemptivePriority => {
                (SelectionKey::Priority, KeyOrder::Ascending)
            }
        };

        Self {
            kind,
            key,
            order,
            preemptive: kind.is_preemptive(),
        }
    }

    /// Compare two processes on the policy key alone (`Less` = runs first)
    pub fn compare(&self, a: &Process, b: &Process) -> Ordering {
        let ord = match self.key {
            SelectionKey::Arrival => a.arrival().cmp(&b.arrival()),
            SelectionKey::RemainingBurst => a.remaining().cmp(&b.remaining()),
            SelectionKey::Priority => effective_priority(a).cmp(&effective_priority(b)),
        };

        match self.order {
            KeyOrder::Ascending => ord,
            KeyOrder::Descending => ord.reverse(),
        }
    }

    /// Strict improvement on the policy key; equal keys never outrank
    #[inline]
    pub fn outranks(&self, candidate: &Process, incumbent: &Process) -> bool {
        self.compare(candidate, incumbent) == Ordering::Less
    }

    /// Position of the best candidate, earliest Ready entrant on ties
    pub fn best(&self, ready: &[&Process]) -> Option<usize> {
        ready
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                self.compare(a, b)
                    .then_with(|| a.ready_seq().cmp(&b.ready_seq()))
            })
            .map(|(pos, _)| pos)
    }

    /// Decide what to run this tick.
    ///
    /// With an empty processor the best candidate is chosen. With a running
    /// process only a preemptive policy may act, and only when the best
    /// candidate strictly outranks it.
    pub fn select(&self, ready: &[&Process], running: Option<&Process>) -> Decision {
        let best = self.best(ready);
        match (running, best) {
            (None, next) => Decision {
                next,
                preempt: false,
            },
            (Some(current), Some(pos)) if self.preemptive && self.outranks(ready[pos], current) => {
                Decision {
                    next: Some(pos),
                    preempt: true,
                }
            }
            (Some(_), _) => Decision::default(),
        }
    }
}

impl From<PolicyKind> for DispatchPolicy {
    fn from(kind: PolicyKind) -> Self {
        Self::new(kind)
    }
}

/// A missing priority only reaches a priority policy when run-last was
/// chosen at load time
#[inline]
fn effective_priority(process: &Process) -> i64 {
    process.priority().unwrap_or(LOWEST_PRIORITY)
}
