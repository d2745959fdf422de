/*!
 * Playback Module
 * Paced, controllable stepping of a simulation for display
 */

pub mod task;

pub use task::{Frame, PlaybackCommand, PlaybackSummary, PlaybackTask};
