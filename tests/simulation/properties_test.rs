/*!
 * Run-wide Property Tests
 * Invariants that hold for every policy and every valid workload
 */

use proptest::prelude::*;
use schedsim::process::Edge;
use schedsim::{Driver, PolicyKind, ProcessSpec, ProcessState, SimulationConfig, Trace};
use std::collections::HashMap;

fn workload() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec(
        (0u64..12, prop::collection::vec(1u64..6, 1..=5), 0i64..4),
        1..6,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (arrival, mut bursts, priority))| {
                if bursts.len() % 2 == 0 {
                    bursts.pop();
                }
                ProcessSpec::new(format!("P{}", i + 1), arrival, bursts, Some(priority)).unwrap()
            })
            .collect()
    })
}

fn policy() -> impl Strategy<Value = PolicyKind> {
    prop::sample::select(PolicyKind::ALL.to_vec())
}

fn simulate(kind: PolicyKind, context_switch: u64, specs: &[ProcessSpec]) -> Trace {
    let config = SimulationConfig::default()
        .with_policy(kind)
        .with_context_switch(context_switch);
    Driver::new(&config).run(specs).unwrap()
}

proptest! {
    #[test]
    fn prop_at_most_one_running(kind in policy(), cs in 0u64..3, specs in workload()) {
        let trace = simulate(kind, cs, &specs);
        for snapshot in &trace.snapshots {
            prop_assert!(snapshot.count(ProcessState::Running) <= 1);
            prop_assert_eq!(
                snapshot.running.is_some(),
                snapshot.count(ProcessState::Running) == 1
            );
        }
    }

    #[test]
    fn prop_every_process_terminates(kind in policy(), cs in 0u64..3, specs in workload()) {
        let trace = simulate(kind, cs, &specs);
        for spec in &specs {
            let terminations = trace
                .events_for(&spec.pid)
                .filter(|e| e.edge == Edge::Terminate)
                .count();
            prop_assert_eq!(terminations, 1);
        }
    }

    #[test]
    fn prop_turnaround_identity(kind in policy(), cs in 0u64..3, specs in workload()) {
        let trace = simulate(kind, cs, &specs);

        let mut counts: HashMap<(&str, ProcessState), u64> = HashMap::new();
        for snapshot in &trace.snapshots {
            for view in &snapshot.processes {
                *counts.entry((view.pid.as_str(), view.state)).or_default() += 1;
            }
        }
        let count = |pid: &str, state| counts.get(&(pid, state)).copied().unwrap_or(0);

        for spec in &specs {
            let pid = spec.pid.as_str();
            let completion = trace.completion_tick(pid).unwrap();
            let running = count(pid, ProcessState::Running);
            let blocked = count(pid, ProcessState::Blocked);
            let waiting = count(pid, ProcessState::Ready);

            prop_assert_eq!(running, spec.cpu_total());
            prop_assert_eq!(blocked, spec.io_total());
            prop_assert_eq!(waiting + running + blocked, completion - spec.arrival);
        }
    }

    #[test]
    fn prop_runs_are_deterministic(kind in policy(), cs in 0u64..3, specs in workload()) {
        prop_assert_eq!(simulate(kind, cs, &specs), simulate(kind, cs, &specs));
    }

    #[test]
    fn prop_shortest_remaining_is_dispatched(
        kind in prop::sample::select(vec![PolicyKind::Sjf, PolicyKind::Srtf]),
        specs in workload(),
    ) {
        let trace = simulate(kind, 0, &specs);
        for event in trace.dispatches() {
            let snapshot = trace.snapshot_at(event.tick).unwrap();
            let chosen = snapshot.process(&event.pid).unwrap().remaining;
            for pid in &snapshot.ready {
                prop_assert!(chosen <= snapshot.process(pid).unwrap().remaining);
            }
        }
    }

    #[test]
    fn prop_fcfs_cpu_only_keeps_input_order(
        bursts in prop::collection::vec(1u64..8, 1..8),
    ) {
        let specs: Vec<ProcessSpec> = bursts
            .iter()
            .enumerate()
            .map(|(i, &b)| ProcessSpec::new(format!("P{}", i + 1), 0, vec![b], None).unwrap())
            .collect();
        let trace = simulate(PolicyKind::Fcfs, 0, &specs);

        let expected: Vec<&str> = specs.iter().map(|s| s.pid.as_str()).collect();
        prop_assert_eq!(trace.completion_order(), expected);
    }

    #[test]
    fn prop_equal_priority_never_preempts(specs in workload()) {
        let specs: Vec<ProcessSpec> = specs
            .into_iter()
            .map(|s| ProcessSpec { priority: Some(1), ..s })
            .collect();
        let trace = simulate(PolicyKind::PreemptivePriority, 0, &specs);
        prop_assert!(trace.events.iter().all(|e| e.edge != Edge::Preempt));
    }
}
