/*!
 * Scheduler Module
 * Dispatch policy catalogue and decision function
 */

pub mod policy;
pub mod types;

// Re-export public API
pub use policy::{Decision, DispatchPolicy, KeyOrder, SelectionKey};
pub use types::PolicyKind;
