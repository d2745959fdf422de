/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::{Pid, Tick, Ticks};
use crate::process::types::ProcessState;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Simulator errors with serialization support
///
/// Every input-time variant is raised before tick 0; only the
/// consistency guards can surface mid-run.
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Process descriptor has an empty pid")]
    #[diagnostic(
        code(source::empty_pid),
        help("Every process needs a non-blank identifier such as \"P1\".")
    )]
    EmptyPid,

    #[error("Duplicate pid '{pid}'")]
    #[diagnostic(
        code(source::duplicate_pid),
        help("Pids must be unique within a run. Rename one of the processes.")
    )]
    DuplicatePid { pid: Pid },

    #[error("Process {pid} has a negative arrival time ({arrival})")]
    #[diagnostic(
        code(source::negative_arrival),
        help("Arrival times are ticks counted from 0.")
    )]
    NegativeArrival { pid: Pid, arrival: i64 },

    #[error("Process {pid} has no numeric bursts")]
    #[diagnostic(
        code(source::empty_bursts),
        help("Provide a comma-separated burst list such as \"4, 2, 3\" (CPU, IO, CPU).")
    )]
    EmptyBursts { pid: Pid },

    #[error("Process {pid} has a non-positive burst ({value})")]
    #[diagnostic(
        code(source::non_positive_burst),
        help("Every CPU and IO burst must last at least one tick.")
    )]
    NonPositiveBurst { pid: Pid, value: i64 },

    #[error("Process {pid} has a burst of {value} ticks, above the limit of {max}")]
    #[diagnostic(
        code(source::burst_too_long),
        help("Split the work into shorter bursts or scale the workload down.")
    )]
    BurstTooLong { pid: Pid, value: Ticks, max: Ticks },

    #[error("Process {pid} ends on an IO burst ({len} bursts given)")]
    #[diagnostic(
        code(source::unterminated_bursts),
        help("Burst lists alternate CPU and IO and must start and end with CPU, so their length is odd.")
    )]
    UnterminatedBursts { pid: Pid, len: usize },

    #[error("Process {pid} has no priority but the policy is priority-based")]
    #[diagnostic(
        code(source::missing_priority),
        help("Set a priority for every process, or set SCHEDSIM_MISSING_PRIORITY=lowest to run them last.")
    )]
    MissingPriority { pid: Pid },

    #[error("Unknown scheduling policy '{name}'")]
    #[diagnostic(
        code(config::unknown_policy),
        help("Use one of: fcfs, sjf, srtf, ljf, lrtf, priority, preemptive_priority.")
    )]
    UnknownPolicy { name: String },

    #[error("Invalid configuration value for {key}: '{value}'")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variables and workload file for typos.")
    )]
    InvalidConfig { key: String, value: String },

    #[error("Invalid state transition for {pid}: {from:?} -> {to:?}")]
    #[diagnostic(
        code(engine::invalid_transition),
        help("The simulation state is inconsistent. Please report this issue.")
    )]
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Process {pid} cannot {operation} while {state:?}")]
    #[diagnostic(
        code(engine::invalid_state),
        help("The simulation state is inconsistent. Please report this issue.")
    )]
    InvalidState {
        pid: Pid,
        state: ProcessState,
        operation: String,
    },

    #[error("Simulation exceeded {limit} ticks")]
    #[diagnostic(
        code(engine::tick_limit),
        help("Raise max_ticks or shorten the workload bursts.")
    )]
    TickLimitExceeded { limit: Tick },

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(workload::io_error),
        help("Check that the workload file exists and is readable.")
    )]
    Io(String),

    #[error("JSON error: {0}")]
    #[diagnostic(
        code(workload::json_error),
        help("The workload must be a JSON object with a \"processes\" array.")
    )]
    Json(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Json(err.to_string())
    }
}
