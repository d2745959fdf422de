/*!
 * Process Source
 * Descriptors, validated process specs and workload files
 */

use super::validation::{
    validate_arrival, validate_burst_ticks, validate_bursts, validate_pid, RawBursts,
};
use crate::core::errors::SimError;
use crate::core::types::{Pid, Priority, SimResult, Tick, Ticks};
use crate::simulation::config::{MissingPriority, SimulationConfig};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unvalidated process descriptor as supplied by a process table or file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessDescriptor {
    pub pid: String,
    #[serde(default)]
    pub arrival: i64,
    pub bursts: RawBursts,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl ProcessDescriptor {
    pub fn new(pid: impl Into<String>, arrival: i64, bursts: impl Into<RawBursts>) -> Self {
        Self {
            pid: pid.into(),
            arrival,
            bursts: bursts.into(),
            priority: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sanitize and validate into a spec
    pub fn validate(&self) -> SimResult<ProcessSpec> {
        let pid = validate_pid(&self.pid)?;
        let arrival = validate_arrival(&pid, self.arrival)?;
        let bursts = validate_bursts(&pid, &self.bursts.tokens())?;
        Ok(ProcessSpec {
            pid,
            arrival,
            bursts,
            priority: self.priority,
        })
    }
}

/// Validated process description
///
/// Invariants: non-blank pid, odd number of bursts, every burst >= 1.
/// Deserializing goes through [`ProcessDescriptor`] so the same rules apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProcessDescriptor")]
pub struct ProcessSpec {
    pub pid: Pid,
    pub arrival: Tick,
    pub bursts: Vec<Ticks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ProcessSpec {
    pub fn new(
        pid: impl Into<Pid>,
        arrival: Tick,
        bursts: Vec<Ticks>,
        priority: Option<Priority>,
    ) -> SimResult<Self> {
        let pid = validate_pid(&pid.into())?;
        validate_burst_ticks(&pid, &bursts)?;
        Ok(Self {
            pid,
            arrival,
            bursts,
            priority,
        })
    }

    /// Total CPU demand
    pub fn cpu_total(&self) -> Ticks {
        self.bursts.iter().step_by(2).fold(0, |acc, &b| acc.saturating_add(b))
    }

    /// Total IO demand
    pub fn io_total(&self) -> Ticks {
        self.bursts.iter().skip(1).step_by(2).fold(0, |acc, &b| acc.saturating_add(b))
    }
}

impl TryFrom<ProcessDescriptor> for ProcessSpec {
    type Error = SimError;

    fn try_from(descriptor: ProcessDescriptor) -> Result<Self, Self::Error> {
        descriptor.validate()
    }
}

/// Workload file: the process table plus optional run settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workload {
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub context_switch: Option<Ticks>,
    pub processes: Vec<ProcessDescriptor>,
}

impl Workload {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let workload = Self::from_json_str(&json)?;
        info!(
            "Loaded workload from {} ({} processes)",
            path.display(),
            workload.processes.len()
        );
        Ok(workload)
    }
}

/// Validate descriptors for a run. Fails fast on the first bad descriptor.
pub fn load(descriptors: &[ProcessDescriptor], config: &SimulationConfig) -> SimResult<Vec<ProcessSpec>> {
    let specs = descriptors
        .iter()
        .map(ProcessDescriptor::validate)
        .collect::<SimResult<Vec<_>>>()?;
    prepare(specs, config)
}

/// Run-level checks over already validated specs: unique pids and the
/// missing-priority rule for priority-based policies
pub fn prepare(specs: Vec<ProcessSpec>, config: &SimulationConfig) -> SimResult<Vec<ProcessSpec>> {
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in &specs {
        if !seen.insert(spec.pid.as_str()) {
            return Err(SimError::DuplicatePid {
                pid: spec.pid.clone(),
            });
        }
    }

    if config.policy.is_priority_based() && config.missing_priority == MissingPriority::Reject {
        if let Some(spec) = specs.iter().find(|s| s.priority.is_none()) {
            return Err(SimError::MissingPriority {
                pid: spec.pid.clone(),
            });
        }
    }

    debug!("{} process specs ready for policy {}", specs.len(), config.policy);
    Ok(specs)
}
