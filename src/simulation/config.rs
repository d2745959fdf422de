/*!
 * Simulation Configuration
 *
 * Defaults come from `core::limits`; a workload file may set the policy and
 * context switch; `SCHEDSIM_*` environment variables override both.
 *
 * Environment variables:
 * - SCHEDSIM_POLICY: policy name (default: fcfs)
 * - SCHEDSIM_CONTEXT_SWITCH: ticks of switch overhead (default: 0)
 * - SCHEDSIM_MISSING_PRIORITY: reject | lowest (default: reject)
 * - SCHEDSIM_MAX_TICKS: tick limit per run (default: 1000000)
 * - SCHEDSIM_FRAME_MS: playback frame delay in milliseconds (default: 500)
 */

use crate::core::errors::SimError;
use crate::core::limits::{DEFAULT_CONTEXT_SWITCH, DEFAULT_FRAME_DELAY, DEFAULT_MAX_TICKS};
use crate::core::types::{SimResult, Tick, Ticks};
use crate::process::Workload;
use crate::scheduler::PolicyKind;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_POLICY: &str = "SCHEDSIM_POLICY";
pub const ENV_CONTEXT_SWITCH: &str = "SCHEDSIM_CONTEXT_SWITCH";
pub const ENV_MISSING_PRIORITY: &str = "SCHEDSIM_MISSING_PRIORITY";
pub const ENV_MAX_TICKS: &str = "SCHEDSIM_MAX_TICKS";
pub const ENV_FRAME_MS: &str = "SCHEDSIM_FRAME_MS";

/// What a priority policy does with a process that has no priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPriority {
    /// Refuse to start the run
    #[default]
    Reject,
    /// Treat as the lowest possible priority (runs last)
    Lowest,
}

impl FromStr for MissingPriority {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "lowest" | "last" | "run_last" => Ok(Self::Lowest),
            _ => Err(SimError::InvalidConfig {
                key: ENV_MISSING_PRIORITY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::Lowest => "lowest",
        })
    }
}

/// Settings for one simulation run
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub policy: PolicyKind,
    /// Idle ticks after the processor is vacated before the next dispatch
    pub context_switch: Ticks,
    pub missing_priority: MissingPriority,
    pub max_ticks: Tick,
    /// How long playback holds each frame
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub frame_delay: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            context_switch: DEFAULT_CONTEXT_SWITCH,
            missing_priority: MissingPriority::default(),
            max_ticks: DEFAULT_MAX_TICKS,
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }
}

impl SimulationConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> SimResult<Self> {
        Self::default().apply_env()
    }

    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_context_switch(mut self, ticks: Ticks) -> Self {
        self.context_switch = ticks;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_missing_priority(mut self, missing: MissingPriority) -> Self {
        self.missing_priority = missing;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: Tick) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Take the policy and context switch a workload file specifies
    pub fn apply_workload(mut self, workload: &Workload) -> SimResult<Self> {
        if let Some(name) = &workload.policy {
            self.policy = name.parse()?;
        }
        if let Some(ticks) = workload.context_switch {
            self.context_switch = ticks;
        }
        Ok(self)
    }

    pub fn apply_env(self) -> SimResult<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay settings from a variable lookup (unset keys keep their value)
    pub fn apply_vars<F>(mut self, lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_POLICY) {
            self.policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_CONTEXT_SWITCH) {
            self.context_switch = parse_number(ENV_CONTEXT_SWITCH, &value)?;
        }
        if let Some(value) = lookup(ENV_MISSING_PRIORITY) {
            self.missing_priority = value.parse()?;
        }
        if let Some(value) = lookup(ENV_MAX_TICKS) {
            self.max_ticks = parse_number(ENV_MAX_TICKS, &value)?;
        }
        if let Some(value) = lookup(ENV_FRAME_MS) {
            self.frame_delay = Duration::from_millis(parse_number(ENV_FRAME_MS, &value)?);
        }
        Ok(self)
    }
}

fn parse_number(key: &str, value: &str) -> SimResult<u64> {
    value.trim().parse().map_err(|_| SimError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}
