/*!
 * Simulation Limits and Defaults
 *
 * Centralized location for simulator-wide limits, defaults, and magic numbers.
 */

use crate::core::types::{Priority, Tick, Ticks};
use std::time::Duration;

// =============================================================================
// ENGINE
// =============================================================================

/// Upper bound on ticks a single run may execute before it is halted
pub const DEFAULT_MAX_TICKS: Tick = 1_000_000;

/// Context switch overhead applied when nothing else is configured
pub const DEFAULT_CONTEXT_SWITCH: Ticks = 0;

/// Longest single CPU or IO burst accepted from a descriptor
pub const MAX_BURST: Ticks = u32::MAX as Ticks;

/// Effective priority of a process without one when the run-last policy is selected
pub const LOWEST_PRIORITY: Priority = Priority::MAX;

// =============================================================================
// PLAYBACK
// =============================================================================

/// How long each frame is held for display
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(500);

/// Frames buffered between the playback task and its consumer
/// Small on purpose: a slow consumer applies backpressure to the simulation
pub const FRAME_CHANNEL_CAPACITY: usize = 16;
