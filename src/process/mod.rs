/*!
 * Process Module
 * Simulated processes, their lifecycle, and the process source
 */

pub mod lifecycle;
pub mod source;
pub mod types;
pub mod validation;

pub use lifecycle::Edge;
pub use source::{load, prepare, ProcessDescriptor, ProcessSpec, Workload};
pub use types::{PhaseKind, Process, ProcessState};
pub use validation::RawBursts;
