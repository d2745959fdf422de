/*!
 * Simulation Module
 * Tick driver, simulation state, and the event/snapshot contract
 */

pub mod config;
pub mod driver;
pub mod events;
pub mod sink;
pub mod snapshot;
pub mod state;
pub mod trace;

pub use config::{MissingPriority, SimulationConfig};
pub use driver::{Driver, TickOutcome};
pub use events::TransitionEvent;
pub use sink::{RecordingSink, RenderSink, TracingSink};
pub use snapshot::{ProcessView, Queue, Snapshot};
pub use state::SimulationState;
pub use trace::Trace;
