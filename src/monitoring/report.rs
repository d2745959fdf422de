/*!
 * Aggregate Report
 *
 * Gantt chart, per-process times and system metrics for a finished run.
 * Everything is derived from the recorded [`Trace`], the same events and
 * snapshots a render sink sees, so the report cannot disagree with the
 * tick-by-tick simulation.
 */

use crate::core::types::{Pid, Tick, Ticks};
use crate::scheduler::PolicyKind;
use crate::simulation::Trace;
use serde::{Serialize, Serializer};

/// What occupied the processor during a Gantt segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GanttSlot {
    Process(Pid),
    Idle,
    ContextSwitch,
}

impl GanttSlot {
    pub fn label(&self) -> &str {
        match self {
            Self::Process(pid) => pid,
            Self::Idle => "IDLE",
            Self::ContextSwitch => "CS",
        }
    }
}

impl Serialize for GanttSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Half-open interval `[start, end)` on the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttSegment {
    #[serde(rename = "pid")]
    pub slot: GanttSlot,
    pub start: Tick,
    pub end: Tick,
}

impl GanttSegment {
    pub fn new(slot: GanttSlot, start: Tick, end: Tick) -> Self {
        Self { slot, start, end }
    }

    #[inline]
    pub const fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival: Tick,
    /// Total CPU ticks
    pub burst_time: Ticks,
    pub io_time: Ticks,
    pub completion_time: Tick,
    #[serde(rename = "tat")]
    pub turnaround: Ticks,
    #[serde(rename = "wt")]
    pub waiting: Ticks,
    #[serde(rename = "rt")]
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    pub tat: f64,
    pub wt: f64,
    pub rt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub total_time: Tick,
    pub busy_time: Ticks,
    /// Fraction of `total_time` spent executing processes (0.0 - 1.0)
    pub cpu_utilization: f64,
    /// Completed processes per tick
    pub throughput: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub policy: PolicyKind,
    pub gantt: Vec<GanttSegment>,
    /// Rows in completion order
    pub processes: Vec<ProcessMetrics>,
    pub average: Averages,
    pub system: SystemMetrics,
}

impl Report {
    pub fn from_trace(trace: &Trace) -> Self {
        let total_time = trace.total_time();
        let gantt = build_gantt(trace, total_time);
        let busy_time: Ticks = gantt
            .iter()
            .filter(|seg| matches!(seg.slot, GanttSlot::Process(_)))
            .map(GanttSegment::duration)
            .sum();

        let processes: Vec<ProcessMetrics> = trace
            .completion_order()
            .into_iter()
            .filter_map(|pid| process_metrics(trace, pid))
            .collect();

        let n = processes.len();
        let mean = |f: fn(&ProcessMetrics) -> Ticks| -> f64 {
            if n == 0 {
                0.0
            } else {
                processes.iter().map(f).sum::<Ticks>() as f64 / n as f64
            }
        };
        let average = Averages {
            tat: mean(|p| p.turnaround),
            wt: mean(|p| p.waiting),
            rt: mean(|p| p.response),
        };

        let (cpu_utilization, throughput) = if total_time > 0 {
            (
                busy_time as f64 / total_time as f64,
                n as f64 / total_time as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            policy: trace.policy,
            gantt,
            processes,
            average,
            system: SystemMetrics {
                total_time,
                busy_time,
                cpu_utilization,
                throughput,
            },
        }
    }

    pub fn process(&self, pid: &str) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}

/// One slot per tick below `total_time`, merged into runs
fn build_gantt(trace: &Trace, total_time: Tick) -> Vec<GanttSegment> {
    let mut gantt: Vec<GanttSegment> = Vec::new();

    for snapshot in trace.snapshots.iter().take_while(|s| s.tick < total_time) {
        let slot = match &snapshot.running {
            Some(pid) => GanttSlot::Process(pid.clone()),
            None if snapshot.switching => GanttSlot::ContextSwitch,
            None => GanttSlot::Idle,
        };

        match gantt.last_mut() {
            Some(last) if last.slot == slot && last.end == snapshot.tick => last.end += 1,
            _ => gantt.push(GanttSegment::new(slot, snapshot.tick, snapshot.tick + 1)),
        }
    }

    gantt
}

fn process_metrics(trace: &Trace, pid: &str) -> Option<ProcessMetrics> {
    let spec = trace.specs.iter().find(|s| s.pid == pid)?;
    let completion_time = trace.completion_tick(pid)?;
    let first_dispatch = trace.first_dispatch(pid)?;

    let burst_time = spec.cpu_total();
    let io_time = spec.io_total();
    let turnaround = completion_time.saturating_sub(spec.arrival);

    Some(ProcessMetrics {
        pid: spec.pid.clone(),
        arrival: spec.arrival,
        burst_time,
        io_time,
        completion_time,
        turnaround,
        waiting: turnaround.saturating_sub(burst_time + io_time),
        response: first_dispatch.saturating_sub(spec.arrival),
    })
}
