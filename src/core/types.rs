/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process identifier as supplied by the process source
pub type Pid = String;

/// Simulation clock value (discrete ticks since the run started)
pub type Tick = u64;

/// A duration measured in ticks
pub type Ticks = u64;

/// Priority value (lower is more important)
pub type Priority = i64;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
