/*!
 * Monitoring
 * Structured tracing and aggregate run reports
 */

pub mod report;
pub mod tracer;

pub use report::{Averages, GanttSegment, GanttSlot, ProcessMetrics, Report, SystemMetrics};
pub use tracer::{generate_run_id, init_tracing};
