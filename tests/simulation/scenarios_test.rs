/*!
 * Scenario Tests
 * Hand-traced runs for every dispatch policy
 */

use pretty_assertions::assert_eq;
use schedsim::core::types::Tick;
use schedsim::process::{prepare, Edge};
use schedsim::{
    Driver, MissingPriority, PolicyKind, ProcessSpec, ProcessState, SimError, SimulationConfig,
    Trace,
};

fn spec(pid: &str, arrival: Tick, bursts: &[u64]) -> ProcessSpec {
    ProcessSpec::new(pid, arrival, bursts.to_vec(), None).unwrap()
}

fn prio(pid: &str, arrival: Tick, bursts: &[u64], priority: i64) -> ProcessSpec {
    ProcessSpec::new(pid, arrival, bursts.to_vec(), Some(priority)).unwrap()
}

fn run(kind: PolicyKind, specs: &[ProcessSpec]) -> Trace {
    Driver::for_policy(kind).run(specs).unwrap()
}

fn edges(trace: &Trace, pid: &str) -> Vec<(Tick, Edge)> {
    trace.events_for(pid).map(|e| (e.tick, e.edge)).collect()
}

#[test]
fn test_srtf_preempts_longer_job() {
    let trace = run(PolicyKind::Srtf, &[spec("P1", 0, &[5]), spec("P2", 1, &[3])]);

    assert_eq!(
        edges(&trace, "P1"),
        vec![
            (0, Edge::Admit),
            (0, Edge::Dispatch),
            (1, Edge::Preempt),
            (4, Edge::Dispatch),
            (8, Edge::Terminate),
        ]
    );
    assert_eq!(
        edges(&trace, "P2"),
        vec![(1, Edge::Admit), (1, Edge::Dispatch), (4, Edge::Terminate)]
    );
    assert_eq!(trace.total_time(), 8);
}

#[test]
fn test_fcfs_single_process_with_io() {
    let trace = run(PolicyKind::Fcfs, &[spec("P1", 0, &[4, 2, 3])]);

    assert_eq!(
        edges(&trace, "P1"),
        vec![
            (0, Edge::Admit),
            (0, Edge::Dispatch),
            (4, Edge::Block),
            (6, Edge::Unblock),
            (6, Edge::Dispatch),
            (9, Edge::Terminate),
        ]
    );

    let states: Vec<ProcessState> = trace
        .snapshots
        .iter()
        .map(|s| s.state_of("P1").unwrap())
        .collect();
    use ProcessState::*;
    assert_eq!(
        states,
        vec![
            Running, Running, Running, Running, Blocked, Blocked, Running, Running, Running,
            Terminated
        ]
    );

    // IO countdown is visible in the snapshots
    let blocked = trace.snapshot_at(4).unwrap().process("P1").unwrap();
    assert_eq!(blocked.phase_index, 1);
    assert_eq!(blocked.remaining, 2);
    assert_eq!(trace.snapshot_at(5).unwrap().process("P1").unwrap().remaining, 1);
}

#[test]
fn test_fcfs_completion_follows_input_order() {
    let specs = [
        spec("P1", 0, &[3]),
        spec("P2", 0, &[1]),
        spec("P3", 0, &[2]),
    ];
    let trace = run(PolicyKind::Fcfs, &specs);

    assert_eq!(trace.completion_order(), vec!["P1", "P2", "P3"]);
    assert_eq!(trace.completion_tick("P3"), Some(6));
}

#[test]
fn test_fcfs_runs_other_work_during_io() {
    let trace = run(
        PolicyKind::Fcfs,
        &[spec("P1", 0, &[2, 3, 1]), spec("P2", 0, &[2])],
    );

    assert_eq!(
        edges(&trace, "P1"),
        vec![
            (0, Edge::Admit),
            (0, Edge::Dispatch),
            (2, Edge::Block),
            (5, Edge::Unblock),
            (5, Edge::Dispatch),
            (6, Edge::Terminate),
        ]
    );
    assert_eq!(trace.first_dispatch("P2"), Some(2));
    assert_eq!(trace.completion_tick("P2"), Some(4));

    // Nothing runnable at tick 4
    let idle = trace.snapshot_at(4).unwrap();
    assert_eq!(idle.running, None);
    assert_eq!(idle.blocked, vec!["P1".to_string()]);
}

#[test]
fn test_sjf_picks_shortest_ready_job() {
    let specs = [
        spec("P1", 0, &[6]),
        spec("P2", 1, &[8]),
        spec("P3", 2, &[2]),
        spec("P4", 3, &[3]),
    ];
    let trace = run(PolicyKind::Sjf, &specs);

    assert_eq!(trace.completion_order(), vec!["P1", "P3", "P4", "P2"]);
    let completions: Vec<_> = ["P1", "P3", "P4", "P2"]
        .iter()
        .map(|pid| trace.completion_tick(pid).unwrap())
        .collect();
    assert_eq!(completions, vec![6, 8, 11, 19]);
    assert_eq!(trace.events.iter().filter(|e| e.edge == Edge::Preempt).count(), 0);
}

#[test]
fn test_sjf_ties_go_to_earliest_ready_entrant() {
    let trace = run(
        PolicyKind::Sjf,
        &[spec("A", 0, &[1]), spec("B", 0, &[2]), spec("C", 0, &[2])],
    );

    assert_eq!(trace.completion_order(), vec!["A", "B", "C"]);
}

#[test]
fn test_ljf_picks_longest_ready_job() {
    let trace = run(
        PolicyKind::Ljf,
        &[spec("P1", 0, &[2]), spec("P2", 0, &[5]), spec("P3", 0, &[3])],
    );

    assert_eq!(trace.completion_order(), vec!["P2", "P3", "P1"]);
    assert_eq!(trace.completion_tick("P2"), Some(5));
    assert_eq!(trace.completion_tick("P3"), Some(8));
    assert_eq!(trace.completion_tick("P1"), Some(10));
}

#[test]
fn test_lrtf_preempts_on_strictly_longer_remaining() {
    let trace = run(PolicyKind::Lrtf, &[spec("P1", 0, &[3]), spec("P2", 0, &[2])]);

    assert_eq!(
        edges(&trace, "P1"),
        vec![
            (0, Edge::Admit),
            (0, Edge::Dispatch),
            (2, Edge::Preempt),
            (4, Edge::Dispatch),
            (5, Edge::Terminate),
        ]
    );
    // Equal remaining at tick 1 and tick 3 never preempts
    assert!(trace.events_at(1).next().is_none());
    assert!(trace.events_at(3).next().is_none());
}

#[test]
fn test_preemptive_priority() {
    let specs = [
        prio("P1", 0, &[5], 3),
        prio("P2", 2, &[2], 1),
        prio("P3", 3, &[1], 1),
    ];
    let trace = run(PolicyKind::PreemptivePriority, &specs);

    assert_eq!(
        edges(&trace, "P1"),
        vec![
            (0, Edge::Admit),
            (0, Edge::Dispatch),
            (2, Edge::Preempt),
            (5, Edge::Dispatch),
            (8, Edge::Terminate),
        ]
    );
    assert_eq!(
        edges(&trace, "P2"),
        vec![(2, Edge::Admit), (2, Edge::Dispatch), (4, Edge::Terminate)]
    );
    // Equal priority arrives while P2 runs: no preemption
    assert_eq!(
        edges(&trace, "P3"),
        vec![(3, Edge::Admit), (4, Edge::Dispatch), (5, Edge::Terminate)]
    );
}

#[test]
fn test_non_preemptive_priority() {
    let specs = [
        prio("P1", 0, &[5], 3),
        prio("P2", 2, &[2], 1),
        prio("P3", 3, &[1], 1),
    ];
    let trace = run(PolicyKind::Priority, &specs);

    assert_eq!(trace.completion_order(), vec!["P1", "P2", "P3"]);
    assert_eq!(trace.completion_tick("P1"), Some(5));
    assert_eq!(trace.completion_tick("P2"), Some(7));
    assert_eq!(trace.completion_tick("P3"), Some(8));
}

#[test]
fn test_missing_priority_runs_last_when_lowest() {
    let config = SimulationConfig::default()
        .with_policy(PolicyKind::Priority)
        .with_missing_priority(MissingPriority::Lowest);
    let specs = prepare(
        vec![
            ProcessSpec::new("P1", 0, vec![2], None).unwrap(),
            prio("P2", 0, &[2], 5),
        ],
        &config,
    )
    .unwrap();

    let trace = Driver::new(&config).run(&specs).unwrap();
    assert_eq!(trace.completion_order(), vec!["P2", "P1"]);
}

#[test]
fn test_idle_until_first_arrival() {
    let trace = run(PolicyKind::Fcfs, &[spec("P1", 3, &[2])]);

    for tick in 0..3 {
        let snapshot = trace.snapshot_at(tick).unwrap();
        assert_eq!(snapshot.running, None);
        assert_eq!(snapshot.state_of("P1"), Some(ProcessState::New));
    }
    assert_eq!(edges(&trace, "P1")[0], (3, Edge::Admit));
    assert_eq!(trace.completion_tick("P1"), Some(5));
}

#[test]
fn test_context_switch_delays_next_dispatch() {
    let config = SimulationConfig::default().with_context_switch(1);
    let trace = Driver::new(&config)
        .run(&[spec("P1", 0, &[2]), spec("P2", 0, &[2])])
        .unwrap();

    let switching = trace.snapshot_at(2).unwrap();
    assert!(switching.switching);
    assert_eq!(switching.running, None);
    assert_eq!(trace.first_dispatch("P2"), Some(3));
    assert_eq!(trace.completion_tick("P2"), Some(5));
}

#[test]
fn test_tick_limit_halts_runaway_run() {
    let config = SimulationConfig::default().with_max_ticks(3);
    let err = Driver::new(&config)
        .run(&[spec("P1", 0, &[10])])
        .unwrap_err();

    assert_eq!(err, SimError::TickLimitExceeded { limit: 3 });
}

#[test]
fn test_empty_workload() {
    let trace = run(PolicyKind::Srtf, &[]);

    assert!(trace.events.is_empty());
    assert_eq!(trace.total_time(), 0);
}
