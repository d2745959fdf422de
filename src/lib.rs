/*!
 * schedsim Library
 * Tick-by-tick CPU scheduling simulation exposed as a library
 */

pub mod core;
pub mod monitoring;
pub mod playback;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::errors::SimError;
pub use crate::core::types::{Pid, Priority, SimResult, Tick, Ticks};
pub use monitoring::{init_tracing, Report};
pub use playback::{Frame, PlaybackCommand, PlaybackSummary, PlaybackTask};
pub use process::{load, ProcessDescriptor, ProcessSpec, ProcessState, Workload};
pub use scheduler::{DispatchPolicy, PolicyKind};
pub use simulation::{
    Driver, MissingPriority, RecordingSink, RenderSink, SimulationConfig, SimulationState,
    Snapshot, TracingSink, Trace, TransitionEvent,
};
