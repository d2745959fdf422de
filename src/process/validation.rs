/*!
 * Process Descriptor Validation
 * Sanitation of raw descriptor fields before a process may enter a run
 */

use crate::core::errors::SimError;
use crate::core::limits::MAX_BURST;
use crate::core::types::{Pid, SimResult, Tick, Ticks};
use serde::Deserialize;
use serde_json::Value;

/// Burst list as typed by the user: a comma-separated string or a JSON array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawBursts {
    Text(String),
    List(Vec<Value>),
}

impl RawBursts {
    /// Integer tokens in order.
    ///
    /// A token counts when it starts with an integer: `"2.5"` reads as 2 and
    /// `"4ms"` as 4. Only tokens with no leading integer are dropped. Zero and
    /// negative values are kept so validation can reject them.
    pub fn tokens(&self) -> Vec<i64> {
        match self {
            Self::Text(text) => text.split(',').filter_map(parse_token).collect(),
            Self::List(values) => values.iter().filter_map(value_token).collect(),
        }
    }
}

impl From<Vec<i64>> for RawBursts {
    fn from(values: Vec<i64>) -> Self {
        Self::List(values.into_iter().map(Value::from).collect())
    }
}

impl From<&str> for RawBursts {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Leading integer of a token (optional sign, then digits).
/// Saturates at the `i64` bounds so an oversized burst is still seen and rejected.
fn parse_token(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, rest) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

fn value_token(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            // `as` saturates; fractions truncate toward zero
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_token(s),
        _ => None,
    }
}

/// Validate and normalize a pid
pub(super) fn validate_pid(pid: &str) -> SimResult<Pid> {
    let pid = pid.trim();
    if pid.is_empty() {
        return Err(SimError::EmptyPid);
    }
    Ok(pid.to_string())
}

pub(super) fn validate_arrival(pid: &str, arrival: i64) -> SimResult<Tick> {
    Tick::try_from(arrival).map_err(|_| SimError::NegativeArrival {
        pid: pid.to_string(),
        arrival,
    })
}

/// Validate sanitized burst tokens
///
/// Zero and negative values are rejected, never filtered, since dropping one
/// would shift the CPU/IO alternation.
pub(super) fn validate_bursts(pid: &str, tokens: &[i64]) -> SimResult<Vec<Ticks>> {
    if let Some(&value) = tokens.iter().find(|&&v| v <= 0) {
        return Err(SimError::NonPositiveBurst {
            pid: pid.to_string(),
            value,
        });
    }

    let bursts: Vec<Ticks> = tokens.iter().map(|&v| v.unsigned_abs()).collect();
    validate_burst_ticks(pid, &bursts)?;
    Ok(bursts)
}

/// Validate burst durations that are already unsigned
pub(super) fn validate_burst_ticks(pid: &str, bursts: &[Ticks]) -> SimResult<()> {
    if bursts.is_empty() {
        return Err(SimError::EmptyBursts {
            pid: pid.to_string(),
        });
    }

    if bursts.contains(&0) {
        return Err(SimError::NonPositiveBurst {
            pid: pid.to_string(),
            value: 0,
        });
    }

    if let Some(&value) = bursts.iter().find(|&&b| b > MAX_BURST) {
        return Err(SimError::BurstTooLong {
            pid: pid.to_string(),
            value,
            max: MAX_BURST,
        });
    }

    if bursts.len() % 2 == 0 {
        return Err(SimError::UnterminatedBursts {
            pid: pid.to_string(),
            len: bursts.len(),
        });
    }

    Ok(())
}
