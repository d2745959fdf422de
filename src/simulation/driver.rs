/*!
 * Simulation Driver
 *
 * One driver for every policy: the dispatch policy is injected as data and
 * the tick algorithm is a pure function from one [`SimulationState`] to the
 * next. Each tick runs, in order:
 *
 * 1. execute the running process (or burn one context-switch tick)
 * 2. advance processes that were already blocked
 * 3. admit arrivals
 * 4. preempt, if the policy allows and a candidate strictly outranks
 * 5. dispatch onto an idle processor
 * 6. advance the clock
 */

use super::config::SimulationConfig;
use super::events::TransitionEvent;
use super::sink::{RecordingSink, RenderSink};
use super::snapshot::Snapshot;
use super::state::SimulationState;
use super::trace::Trace;
use crate::core::errors::SimError;
use crate::core::types::{SimResult, Tick, Ticks};
use crate::monitoring::tracer::generate_run_id;
use crate::process::{Edge, Process, ProcessSpec};
use crate::scheduler::{DispatchPolicy, PolicyKind};
use tracing::{debug, info, info_span, trace};

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// The tick that was processed
    pub tick: Tick,
    pub events: Vec<TransitionEvent>,
    pub snapshot: Snapshot,
    /// State ready for the next tick
    pub state: SimulationState,
}

impl TickOutcome {
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

/// Policy-parameterized tick driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    policy: DispatchPolicy,
    context_switch: Ticks,
    max_ticks: Tick,
}

impl Driver {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            policy: DispatchPolicy::new(config.policy),
            context_switch: config.context_switch,
            max_ticks: config.max_ticks,
        }
    }

    /// Driver with default settings for a policy
    pub fn for_policy(kind: PolicyKind) -> Self {
        Self::new(&SimulationConfig::default().with_policy(kind))
    }

    #[inline]
    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    #[inline]
    pub const fn context_switch(&self) -> Ticks {
        self.context_switch
    }

    /// Advance `state` by one tick without touching it.
    ///
    /// Stepping a finished state returns it unchanged with no events.
    pub fn step(&self, state: &SimulationState) -> SimResult<TickOutcome> {
        let tick = state.tick;
        let mut next = state.clone();

        if next.is_finished() {
            return Ok(TickOutcome {
                tick,
                events: Vec::new(),
                snapshot: next.snapshot_at(tick),
                state: next,
            });
        }

        if tick >= self.max_ticks {
            return Err(SimError::TickLimitExceeded {
                limit: self.max_ticks,
            });
        }

        let events = self.advance(&mut next)?;
        let snapshot = next.snapshot_at(tick);
        next.tick += 1;

        Ok(TickOutcome {
            tick,
            events,
            snapshot,
            state: next,
        })
    }

    fn advance(&self, s: &mut SimulationState) -> SimResult<Vec<TransitionEvent>> {
        let t = s.tick;
        let mut events = Vec::new();

        // 1. Execute Running
        let mut just_blocked = None;
        if let Some(idx) = s.running {
            let process = &mut s.processes[idx];
            if let Some(edge) = process.execute()? {
                events.push(TransitionEvent::new(t, process.pid(), edge));
                s.running = None;
                if edge == Edge::Block {
                    just_blocked = Some(idx);
                }
                s.switch_remaining = self.context_switch;
            }
        } else if s.switch_remaining > 0 {
            s.switch_remaining -= 1;
        }

        // 2. Advance Blocked (a process blocked this tick starts waiting next tick)
        let mut still_blocked = Vec::with_capacity(s.blocked.len());
        let mut woken = Vec::new();
        for &idx in &s.blocked {
            if s.processes[idx].wait_io()? {
                woken.push(idx);
            } else {
                still_blocked.push(idx);
            }
        }
        s.blocked = still_blocked;
        for idx in woken {
            let seq = s.take_seq();
            let edge = s.processes[idx].unblock(seq)?;
            events.push(TransitionEvent::new(t, s.processes[idx].pid(), edge));
            s.ready.push(idx);
        }
        if let Some(idx) = just_blocked {
            s.blocked.push(idx);
        }

        // 3. Admit New, in source order
        let (arrived, waiting): (Vec<usize>, Vec<usize>) = s
            .new
            .iter()
            .partition(|&&idx| s.processes[idx].arrival() <= t);
        s.new = waiting;
        for idx in arrived {
            let seq = s.take_seq();
            let edge = s.processes[idx].admit(seq)?;
            events.push(TransitionEvent::new(t, s.processes[idx].pid(), edge));
            s.ready.push(idx);
        }

        // 4 + 5. One policy decision covers preemption and dispatch
        let decision = {
            let ready: Vec<&Process> = s.ready.iter().map(|&idx| &s.processes[idx]).collect();
            let running = s.running.map(|idx| &s.processes[idx]);
            self.policy.select(&ready, running)
        };

        if decision.preempt {
            if let Some(idx) = s.running.take() {
                let seq = s.take_seq();
                let edge = s.processes[idx].preempt(seq)?;
                events.push(TransitionEvent::new(t, s.processes[idx].pid(), edge));
                s.ready.push(idx);
                s.switch_remaining = self.context_switch;
                debug!(tick = t, pid = s.processes[idx].pid(), "preempted");
            }
        }

        if s.running.is_none() && s.switch_remaining == 0 {
            if let Some(pos) = decision.next {
                let idx = s.ready.remove(pos);
                let edge = s.processes[idx].dispatch()?;
                events.push(TransitionEvent::new(t, s.processes[idx].pid(), edge));
                s.running = Some(idx);
            }
        }

        trace!(tick = t, events = events.len(), "tick processed");
        Ok(events)
    }

    /// Run to completion, feeding every event and snapshot to `sink`.
    ///
    /// Returns the final state.
    pub fn run_with<S>(&self, specs: &[ProcessSpec], sink: &mut S) -> SimResult<SimulationState>
    where
        S: RenderSink + ?Sized,
    {
        let span = info_span!(
            "run",
            run_id = %generate_run_id(),
            policy = %self.policy.kind,
            processes = specs.len(),
        );
        let _entered = span.enter();

        let mut state = SimulationState::seed(specs);
        while !state.is_finished() {
            let outcome = self.step(&state)?;
            for event in &outcome.events {
                sink.on_transition(event);
            }
            sink.on_snapshot(&outcome.snapshot);
            state = outcome.state;
        }

        info!(ticks = state.tick, "simulation complete");
        Ok(state)
    }

    /// Run to completion and record the full trace
    pub fn run(&self, specs: &[ProcessSpec]) -> SimResult<Trace> {
        let mut sink = RecordingSink::new();
        self.run_with(specs, &mut sink)?;
        Ok(sink.into_trace(self.policy.kind, self.context_switch, specs.to_vec()))
    }
}
