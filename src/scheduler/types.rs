/*!
 * Scheduler Types
 * Policy catalogue and name parsing
 */

use crate::core::errors::SimError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Dispatch policy catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    /// First come, first served
    #[default]
    Fcfs,
    /// Shortest job first
    Sjf,
    /// Shortest remaining time first (preemptive SJF)
    Srtf,
    /// Longest job first
    Ljf,
    /// Longest remaining time first (preemptive LJF)
    Lrtf,
    /// Non-preemptive priority
    Priority,
    /// Preemptive priority
    PreemptivePriority,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjf,
        PolicyKind::Srtf,
        PolicyKind::Ljf,
        PolicyKind::Lrtf,
        PolicyKind::Priority,
        PolicyKind::PreemptivePriority,
    ];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Srtf => "srtf",
            Self::Ljf => "ljf",
            Self::Lrtf => "lrtf",
            Self::Priority => "priority",
            Self::PreemptivePriority => "preemptive_priority",
        }
    }

    #[inline]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::Srtf | Self::Lrtf | Self::PreemptivePriority)
    }

    #[inline]
    pub const fn is_priority_based(&self) -> bool {
        matches!(self, Self::Priority | Self::PreemptivePriority)
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "srtf" | "srtn" => Ok(Self::Srtf),
            "ljf" => Ok(Self::Ljf),
            "lrtf" => Ok(Self::Lrtf),
            "priority" | "prio" => Ok(Self::Priority),
            "preemptive_priority" | "prtf" | "ppriority" => Ok(Self::PreemptivePriority),
            _ => Err(SimError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PolicyKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PolicyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
